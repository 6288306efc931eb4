//! Submission state store port

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Rejected submission: {0}")]
    Rejected(String),
}

/// Opaque store that records each incoming submission
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist `data` and return the new submission id
    async fn create(&self, data: &Value) -> Result<String, StoreError>;
}
