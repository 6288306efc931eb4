//! Progress notification port
//!
//! Defines the interface for reporting progress during a workflow run.

use verdict_domain::{StepResult, WorkflowSummary};

/// Callback for progress updates during workflow execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait WorkflowProgress: Send + Sync {
    /// Called once the workflow has been resolved
    fn on_workflow_start(&self, workflow: &str, total_agents: usize);

    /// Called when an agent is about to run
    fn on_agent_start(&self, _agent: &str) {}

    /// Called for every recorded step, including skips
    fn on_step_complete(&self, step: &StepResult);

    /// Called when the run finishes
    fn on_workflow_complete(&self, _summary: &WorkflowSummary) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl WorkflowProgress for NoProgress {
    fn on_workflow_start(&self, _workflow: &str, _total_agents: usize) {}
    fn on_step_complete(&self, _step: &StepResult) {}
}
