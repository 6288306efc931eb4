//! Workflow engine parameters.

use verdict_domain::workflow::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_WORKFLOW};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowParams {
    /// Agent confidence below this flags the run for human review.
    pub confidence_threshold: f64,
    /// Workflow used when classification fails or names an unknown workflow.
    pub default_workflow: String,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            default_workflow: DEFAULT_WORKFLOW.to_string(),
        }
    }
}

impl WorkflowParams {
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_default_workflow(mut self, name: impl Into<String>) -> Self {
        self.default_workflow = name.into();
        self
    }
}
