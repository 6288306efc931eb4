//! Coordinator parameters: breaker thresholds, deadlines and caching.

use std::time::Duration;
use verdict_domain::CircuitBreakerConfig;

/// Resilience and caching parameters for [`Coordinator`](crate::coordinator::Coordinator).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorParams {
    /// Per-agent circuit breaker thresholds.
    pub breaker: CircuitBreakerConfig,
    /// Deadline every agent call races against.
    pub invocation_timeout: Duration,
    /// Lifetime of a cached synthesized decision.
    pub cache_ttl: Duration,
    /// Cache capacity; the oldest entry is evicted on overflow.
    pub cache_max_entries: usize,
    /// Period of the background expired-entry sweep.
    pub sweep_interval: Duration,
}

impl Default for CoordinatorParams {
    fn default() -> Self {
        Self {
            breaker: CircuitBreakerConfig::default(),
            invocation_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
            cache_max_entries: 1000,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CoordinatorParams {
    // ==================== Builder Methods ====================

    pub fn with_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_max_entries(mut self, max: usize) -> Self {
        self.cache_max_entries = max.max(1);
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
