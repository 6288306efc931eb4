//! Raw TOML configuration data types
//!
//! These structs mirror the TOML file exactly. Conversion into application
//! parameters falls back to defaults for any value [`FileConfig::validate`]
//! flags.

mod resilience;
mod workflow;

pub use resilience::{FileCacheConfig, FileCircuitBreakerConfig, FileCoordinatorConfig};
pub use workflow::{FileAgentsConfig, FileAuditConfig, FileWorkflowConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use verdict_application::{CoordinatorParams, WorkflowParams};
use verdict_domain::{CircuitBreakerConfig, WorkflowCatalog};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub circuit_breaker: FileCircuitBreakerConfig,
    pub coordinator: FileCoordinatorConfig,
    pub cache: FileCacheConfig,
    pub workflow: FileWorkflowConfig,
    pub agents: FileAgentsConfig,
    pub audit: FileAuditConfig,
}

/// A configuration value that will be replaced by its default
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let breaker = &self.circuit_breaker;
        if breaker.failure_threshold == 0 {
            issues.push(ConfigIssue::new(
                "circuit_breaker.failure_threshold",
                "must be at least 1",
            ));
        }
        if breaker.recovery_timeout_secs == 0 {
            issues.push(ConfigIssue::new(
                "circuit_breaker.recovery_timeout_secs",
                "must be at least 1",
            ));
        }
        if breaker.half_open_max_calls == 0 {
            issues.push(ConfigIssue::new(
                "circuit_breaker.half_open_max_calls",
                "must be at least 1",
            ));
        }
        if self.coordinator.invocation_timeout_ms == 0 {
            issues.push(ConfigIssue::new(
                "coordinator.invocation_timeout_ms",
                "must be at least 1",
            ));
        }
        if self.cache.ttl_secs == 0 {
            issues.push(ConfigIssue::new("cache.ttl_secs", "must be at least 1"));
        }
        if self.cache.max_entries == 0 {
            issues.push(ConfigIssue::new("cache.max_entries", "must be at least 1"));
        }
        if self.cache.sweep_interval_secs == 0 {
            issues.push(ConfigIssue::new("cache.sweep_interval_secs", "must be at least 1"));
        }

        let threshold = self.workflow.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            issues.push(ConfigIssue::new(
                "workflow.confidence_threshold",
                format!("{} is outside [0, 1]", threshold),
            ));
        }
        if !WorkflowCatalog::builtin().is_known(&self.workflow.default_workflow) {
            issues.push(ConfigIssue::new(
                "workflow.default_workflow",
                format!("unknown workflow '{}'", self.workflow.default_workflow),
            ));
        }

        for (agent, weight) in &self.agents.weights {
            if !weight.is_finite() || *weight <= 0.0 {
                issues.push(ConfigIssue::new(
                    &format!("agents.weights.{}", agent),
                    format!("weight {} must be positive", weight),
                ));
            }
        }

        issues
    }

    /// Coordinator parameters; zero values fall back to defaults
    pub fn coordinator_params(&self) -> CoordinatorParams {
        let defaults = CoordinatorParams::default();
        let breaker_defaults = CircuitBreakerConfig::default();
        let breaker = &self.circuit_breaker;

        let mut breaker_config = breaker_defaults;
        if breaker.failure_threshold > 0 {
            breaker_config = breaker_config.with_failure_threshold(breaker.failure_threshold);
        }
        if breaker.recovery_timeout_secs > 0 {
            breaker_config = breaker_config
                .with_recovery_timeout(Duration::from_secs(breaker.recovery_timeout_secs));
        }
        if breaker.half_open_max_calls > 0 {
            breaker_config = breaker_config.with_half_open_max_calls(breaker.half_open_max_calls);
        }

        let positive_secs = |secs: u64, fallback: Duration| {
            if secs > 0 {
                Duration::from_secs(secs)
            } else {
                fallback
            }
        };

        CoordinatorParams {
            breaker: breaker_config,
            invocation_timeout: if self.coordinator.invocation_timeout_ms > 0 {
                Duration::from_millis(self.coordinator.invocation_timeout_ms)
            } else {
                defaults.invocation_timeout
            },
            cache_ttl: positive_secs(self.cache.ttl_secs, defaults.cache_ttl),
            cache_max_entries: if self.cache.max_entries > 0 {
                self.cache.max_entries
            } else {
                defaults.cache_max_entries
            },
            sweep_interval: positive_secs(self.cache.sweep_interval_secs, defaults.sweep_interval),
        }
    }

    /// Workflow parameters; out-of-range values fall back to defaults
    pub fn workflow_params(&self) -> WorkflowParams {
        let mut params = WorkflowParams::default();
        if (0.0..=1.0).contains(&self.workflow.confidence_threshold) {
            params = params.with_confidence_threshold(self.workflow.confidence_threshold);
        }
        if WorkflowCatalog::builtin().is_known(&self.workflow.default_workflow) {
            params = params.with_default_workflow(self.workflow.default_workflow.clone());
        }
        params
    }
}
