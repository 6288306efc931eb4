//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown decision label: {0}")]
    UnknownDecision(String),

    #[error("Unknown risk tier: {0}")]
    UnknownTier(String),

    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    #[error("Invalid agent request: {0}")]
    InvalidRequest(String),
}

impl DomainError {
    /// Check if this error was caused by an unrecognized label
    pub fn is_unknown_label(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownDecision(_) | DomainError::UnknownTier(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::UnknownWorkflow("nightly".to_string());
        assert_eq!(error.to_string(), "Unknown workflow: nightly");
    }

    #[test]
    fn test_is_unknown_label() {
        assert!(DomainError::UnknownDecision("maybe".into()).is_unknown_label());
        assert!(DomainError::UnknownTier("extreme".into()).is_unknown_label());
        assert!(!DomainError::InvalidRequest("empty".into()).is_unknown_label());
    }
}
