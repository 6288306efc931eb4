//! `[workflow]`, `[agents]` and `[audit]` sections

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use verdict_domain::workflow::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_WORKFLOW};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    pub confidence_threshold: f64,
    pub default_workflow: String,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            default_workflow: DEFAULT_WORKFLOW.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Agent name to synthesis weight; unlisted agents weigh 1.0
    pub weights: BTreeMap<String, f64>,
}

impl FileAgentsConfig {
    pub fn weight_of(&self, agent: &str) -> f64 {
        self.weights
            .get(agent)
            .copied()
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// JSONL audit trail destination
    pub path: Option<PathBuf>,
}
