//! Agent request and feedback value objects

use crate::agent::outcome::DecisionLabel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a coordination batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRequest {
    pub agent_name: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub context: Value,
}

impl AgentRequest {
    pub fn new(agent_name: impl Into<String>, input: Value) -> Self {
        Self {
            agent_name: agent_name.into(),
            input,
            context: Value::Object(Default::default()),
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// Feedback on a past decision, forwarded to `Agent::learn`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    /// Whether the reviewer agreed with the agent's decision
    pub accepted: bool,
    /// Decision the reviewer would have made instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_decision: Option<DecisionLabel>,
    #[serde(default)]
    pub notes: String,
}

impl AgentFeedback {
    pub fn accepted() -> Self {
        Self {
            submission_id: None,
            accepted: true,
            corrected_decision: None,
            notes: String::new(),
        }
    }

    pub fn corrected(decision: DecisionLabel, notes: impl Into<String>) -> Self {
        Self {
            submission_id: None,
            accepted: false,
            corrected_decision: Some(decision),
            notes: notes.into(),
        }
    }

    pub fn for_submission(mut self, submission_id: impl Into<String>) -> Self {
        self.submission_id = Some(submission_id.into());
        self
    }
}
