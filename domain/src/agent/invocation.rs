//! Result of a single resilient agent invocation

use crate::agent::outcome::AgentOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an invocation produced no outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The agent returned an error
    Error,
    /// The agent exceeded its deadline
    Timeout,
    /// The circuit breaker refused the call
    BreakerOpen,
    /// The agent task panicked
    Panicked,
    /// No agent is registered under the requested name
    NotRegistered,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Error => "error",
            FailureKind::Timeout => "timeout",
            FailureKind::BreakerOpen => "breaker_open",
            FailureKind::Panicked => "panicked",
            FailureKind::NotRegistered => "not_registered",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Success { value: AgentOutcome },
    Failure { kind: FailureKind, error: String },
}

/// Immutable record of one agent call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInvocationResult {
    pub agent_name: String,
    #[serde(flatten)]
    pub outcome: InvocationOutcome,
    pub elapsed_ms: u64,
}

impl AgentInvocationResult {
    pub fn success(agent_name: impl Into<String>, value: AgentOutcome, elapsed_ms: u64) -> Self {
        Self {
            agent_name: agent_name.into(),
            outcome: InvocationOutcome::Success { value },
            elapsed_ms,
        }
    }

    pub fn failure(
        agent_name: impl Into<String>,
        kind: FailureKind,
        error: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            outcome: InvocationOutcome::Failure {
                kind,
                error: error.into(),
            },
            elapsed_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, InvocationOutcome::Success { .. })
    }

    pub fn value(&self) -> Option<&AgentOutcome> {
        match &self.outcome {
            InvocationOutcome::Success { value } => Some(value),
            InvocationOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            InvocationOutcome::Success { .. } => None,
            InvocationOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            InvocationOutcome::Success { .. } => None,
            InvocationOutcome::Failure { error, .. } => Some(error),
        }
    }
}
