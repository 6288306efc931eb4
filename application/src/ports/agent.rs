//! Agent port
//!
//! Every decision-making unit implements [`Agent`]. The coordinator only
//! sees this trait; concrete agents live in the infrastructure layer.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use verdict_domain::{AgentFeedback, AgentOutcome};

/// Errors an agent may return from `process`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Processing failed: {0}")]
    Failed(String),
}

/// A unit of decision-making work
#[async_trait]
pub trait Agent: Send + Sync {
    /// Evaluate `input` under `context` and return a normalized outcome
    async fn process(&self, input: &Value, context: &Value) -> Result<AgentOutcome, AgentError>;

    /// Receive feedback on an earlier decision. No-op by default.
    async fn learn(&self, _feedback: &AgentFeedback) {}
}
