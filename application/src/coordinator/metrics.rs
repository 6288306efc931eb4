//! Coordinator counters and health reports

use serde::Serialize;
use std::collections::BTreeMap;
use verdict_domain::{AgentHealth, BreakerSnapshot, BreakerState};

/// Mutable counters owned by the coordinator
#[derive(Debug, Default)]
pub(crate) struct CoordinatorStats {
    pub total_coordinations: u64,
    pub successful_invocations: u64,
    pub failed_invocations: u64,
    pub breaker_rejections: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub average_latency_ms: f64,
    latency_samples: u64,
}

impl CoordinatorStats {
    /// Fold one coordination latency into the running mean
    pub fn record_latency(&mut self, elapsed_ms: u64) {
        self.latency_samples += 1;
        self.average_latency_ms +=
            (elapsed_ms as f64 - self.average_latency_ms) / self.latency_samples as f64;
    }
}

/// Point-in-time copy of the coordinator counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatorMetrics {
    pub total_coordinations: u64,
    pub successful_invocations: u64,
    pub failed_invocations: u64,
    /// Calls refused by an open breaker; not counted as failures
    pub breaker_rejections: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub average_latency_ms: f64,
    pub cache_size: usize,
    pub breakers: BTreeMap<String, BreakerState>,
}

impl CoordinatorMetrics {
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentHealthReport {
    pub name: String,
    pub health: AgentHealth,
    pub weight: f64,
    pub success_count: u64,
    pub failure_count: u64,
    pub breaker: BreakerSnapshot,
    pub last_used_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_latency() {
        let mut stats = CoordinatorStats::default();
        stats.record_latency(10);
        stats.record_latency(20);
        stats.record_latency(30);
        assert!((stats.average_latency_ms - 20.0).abs() < 1e-9);
    }
}
