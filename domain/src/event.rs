//! Workflow lifecycle events

use crate::core::time::now_millis;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    WorkflowStarted,
    AgentStarted,
    AgentCompleted,
    AgentFailed,
    AgentSkipped,
    HumanReviewRequested,
    WorkflowCompleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::WorkflowStarted => "workflow-started",
            EventKind::AgentStarted => "agent-started",
            EventKind::AgentCompleted => "agent-completed",
            EventKind::AgentFailed => "agent-failed",
            EventKind::AgentSkipped => "agent-skipped",
            EventKind::HumanReviewRequested => "human-review-requested",
            EventKind::WorkflowCompleted => "workflow-completed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One lifecycle transition. `submission_id` is absent when the run
/// failed before a submission was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub kind: EventKind,
    pub submission_id: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub payload: Value,
}

impl WorkflowEvent {
    pub fn new(kind: EventKind, submission_id: Option<&str>, payload: Value) -> Self {
        Self {
            kind,
            submission_id: submission_id.map(str::to_string),
            timestamp: now_millis(),
            payload,
        }
    }

    /// `workflow-completed` with `status: "failed"`
    pub fn workflow_failed(submission_id: Option<&str>, error: &str) -> Self {
        Self::new(
            EventKind::WorkflowCompleted,
            submission_id,
            serde_json::json!({ "status": "failed", "error": error }),
        )
    }

    pub fn is_failure(&self) -> bool {
        self.kind == EventKind::AgentFailed
            || (self.kind == EventKind::WorkflowCompleted
                && self.payload.get("status").and_then(Value::as_str) == Some("failed"))
    }
}
