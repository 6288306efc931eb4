//! Triage classification port

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use verdict_domain::Classification;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Nothing to classify: {0}")]
    EmptyRequest(String),

    #[error("Classification failed: {0}")]
    Failed(String),
}

/// Recommends a workflow for an incoming request.
///
/// Failures are recoverable: the workflow engine falls back to its
/// default workflow.
#[async_trait]
pub trait TriageClassifier: Send + Sync {
    async fn classify(&self, input: &Value) -> Result<Classification, ClassifierError>;
}
