//! Gatekeeper that stops empty submissions before any scoring runs

use super::{policy_documents, request_text};
use async_trait::async_trait;
use serde_json::{Value, json};
use verdict_application::{Agent, AgentError};
use verdict_domain::AgentOutcome;

pub struct PreFlightAgent;

#[async_trait]
impl Agent for PreFlightAgent {
    async fn process(&self, input: &Value, _context: &Value) -> Result<AgentOutcome, AgentError> {
        let text = request_text(input);
        if text.trim().is_empty() {
            return Ok(AgentOutcome::rejected()
                .with_status("incomplete_submission")
                .with_confidence(1.0)
                .with_blocker("request has no content to evaluate"));
        }

        let policies = policy_documents(input).len();
        Ok(AgentOutcome::informational()
            .with_status("ready")
            .with_payload(json!({ "characters": text.chars().count(), "policies": policies })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_domain::DecisionLabel;

    #[tokio::test]
    async fn test_empty_request_is_blocked() {
        let outcome = PreFlightAgent
            .process(&json!({ "message": "  " }), &json!({}))
            .await
            .unwrap();
        assert_eq!(outcome.decision, DecisionLabel::Rejected);
        assert!(outcome.has_blockers());
    }

    #[tokio::test]
    async fn test_request_with_content_passes() {
        let outcome = PreFlightAgent
            .process(&json!({ "message": "Use Copilot", "policies": ["a"] }), &json!({}))
            .await
            .unwrap();
        assert!(!outcome.has_blockers());
        assert!(!outcome.decision.is_vote());
        assert_eq!(outcome.payload["policies"], 1);
    }
}
