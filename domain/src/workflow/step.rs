//! Per-agent step records of a workflow run

use crate::agent::invocation::{AgentInvocationResult, FailureKind, InvocationOutcome};
use crate::agent::outcome::AgentOutcome;
use serde::{Deserialize, Serialize};

pub const NOT_REGISTERED_REASON: &str = "agent not registered";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed { value: AgentOutcome },
    Failed { kind: FailureKind, error: String },
    Skipped { reason: String },
    NotAttempted { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub agent_name: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub elapsed_ms: u64,
}

impl StepResult {
    pub fn skipped(agent_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            outcome: StepOutcome::Skipped {
                reason: reason.into(),
            },
            elapsed_ms: 0,
        }
    }

    pub fn not_attempted(agent_name: impl Into<String>, halted_by: &str) -> Self {
        Self {
            agent_name: agent_name.into(),
            outcome: StepOutcome::NotAttempted {
                reason: format!("halted by blocker from {}", halted_by),
            },
            elapsed_ms: 0,
        }
    }

    pub fn value(&self) -> Option<&AgentOutcome> {
        match &self.outcome {
            StepOutcome::Completed { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, StepOutcome::Completed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, StepOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, StepOutcome::Skipped { .. })
    }

    pub fn is_not_attempted(&self) -> bool {
        matches!(self.outcome, StepOutcome::NotAttempted { .. })
    }

    pub fn has_blockers(&self) -> bool {
        self.value().is_some_and(AgentOutcome::has_blockers)
    }

    pub fn status_str(&self) -> &'static str {
        match self.outcome {
            StepOutcome::Completed { .. } => "completed",
            StepOutcome::Failed { .. } => "failed",
            StepOutcome::Skipped { .. } => "skipped",
            StepOutcome::NotAttempted { .. } => "not_attempted",
        }
    }
}

impl From<AgentInvocationResult> for StepResult {
    fn from(result: AgentInvocationResult) -> Self {
        let outcome = match result.outcome {
            InvocationOutcome::Success { value } => StepOutcome::Completed { value },
            InvocationOutcome::Failure { kind, error } => StepOutcome::Failed { kind, error },
        };
        Self {
            agent_name: result.agent_name,
            outcome,
            elapsed_ms: result.elapsed_ms,
        }
    }
}
