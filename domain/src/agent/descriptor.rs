//! Registry bookkeeping for a registered agent

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed health of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentHealth {
    #[default]
    Healthy,
    Degraded,
}

impl fmt::Display for AgentHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentHealth::Healthy => write!(f, "healthy"),
            AgentHealth::Degraded => write!(f, "degraded"),
        }
    }
}

/// Registry entry describing an agent and its invocation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentDescriptor {
    pub name: String,
    /// Vote multiplier used during synthesis
    pub weight: f64,
    pub dependencies: Vec<String>,
    pub health: AgentHealth,
    pub success_count: u64,
    pub failure_count: u64,
    /// Epoch millis of the last completed invocation
    pub last_used_at: Option<u64>,
}

impl AgentDescriptor {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: Self::DEFAULT_WEIGHT,
            dependencies: Vec::new(),
            health: AgentHealth::Healthy,
            success_count: 0,
            failure_count: 0,
            last_used_at: None,
        }
    }

    /// Non-finite or negative weights fall back to the default
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = if weight.is_finite() && weight >= 0.0 {
            weight
        } else {
            Self::DEFAULT_WEIGHT
        };
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn record_success(&mut self, at_millis: u64) {
        self.success_count += 1;
        self.health = AgentHealth::Healthy;
        self.last_used_at = Some(at_millis);
    }

    pub fn record_failure(&mut self, at_millis: u64) {
        self.failure_count += 1;
        self.health = AgentHealth::Degraded;
        self.last_used_at = Some(at_millis);
    }

    pub fn total_invocations(&self) -> u64 {
        self.success_count + self.failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_descriptor_defaults() {
        let descriptor = AgentDescriptor::new("policy");
        assert_eq!(descriptor.weight, 1.0);
        assert_eq!(descriptor.health, AgentHealth::Healthy);
        assert_eq!(descriptor.total_invocations(), 0);
        assert!(descriptor.last_used_at.is_none());
    }

    #[test]
    fn test_invalid_weight_falls_back() {
        assert_eq!(AgentDescriptor::new("a").with_weight(2.5).weight, 2.5);
        assert_eq!(AgentDescriptor::new("a").with_weight(-1.0).weight, 1.0);
        assert_eq!(AgentDescriptor::new("a").with_weight(f64::NAN).weight, 1.0);
    }

    #[test]
    fn test_health_follows_last_outcome() {
        let mut descriptor = AgentDescriptor::new("policy");
        descriptor.record_failure(10);
        assert_eq!(descriptor.health, AgentHealth::Degraded);
        assert_eq!(descriptor.last_used_at, Some(10));

        descriptor.record_success(20);
        assert_eq!(descriptor.health, AgentHealth::Healthy);
        assert_eq!(descriptor.success_count, 1);
        assert_eq!(descriptor.failure_count, 1);
        assert_eq!(descriptor.last_used_at, Some(20));
    }
}
