//! Multi-client negotiation over the request text

use super::request_text;
use async_trait::async_trait;
use serde_json::Value;
use verdict_application::{Agent, AgentError};
use verdict_domain::negotiation::outcome::Feasibility;
use verdict_domain::{AgentOutcome, negotiate};

pub struct NegotiationAgent;

impl NegotiationAgent {
    fn confidence(feasibility: Feasibility) -> f64 {
        match feasibility {
            Feasibility::Feasible => 0.8,
            Feasibility::Challenging => 0.6,
            Feasibility::Infeasible => 0.9,
        }
    }
}

#[async_trait]
impl Agent for NegotiationAgent {
    async fn process(&self, input: &Value, _context: &Value) -> Result<AgentOutcome, AgentError> {
        let text = request_text(input);
        if text.trim().is_empty() {
            return Err(AgentError::InvalidInput("no request text to negotiate".to_string()));
        }

        let negotiation = negotiate(&text);
        let mut outcome = AgentOutcome::new(negotiation.status.decision_label())
            .with_status(negotiation.status.as_str())
            .with_confidence(Self::confidence(negotiation.solution.feasibility));
        if negotiation.status.requires_human() {
            outcome = outcome.requiring_human();
        }
        for conflict in &negotiation.conflicts {
            outcome = outcome.with_finding(conflict.description.clone());
        }

        let payload =
            serde_json::to_value(&negotiation).map_err(|e| AgentError::Failed(e.to_string()))?;
        Ok(outcome.with_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verdict_domain::DecisionLabel;

    #[tokio::test]
    async fn test_competing_pharma_clients_escalate() {
        let outcome = NegotiationAgent
            .process(
                &json!({ "message": "Using Midjourney for campaign images serving Pfizer and Novartis" }),
                &json!({}),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.status.as_deref(),
            Some("conditional_approval_with_escalation")
        );
        assert_eq!(outcome.decision, DecisionLabel::Conditional);
        assert!(outcome.requires_human);
        assert_eq!(outcome.findings.len(), 3);
        assert_eq!(outcome.payload["status"], "conditional_approval_with_escalation");
    }

    #[tokio::test]
    async fn test_no_clients_is_approved() {
        let outcome = NegotiationAgent
            .process(&json!({ "message": "Internal brainstorm with ChatGPT" }), &json!({}))
            .await
            .unwrap();
        assert_eq!(outcome.decision, DecisionLabel::Approved);
        assert!(!outcome.requires_human);
    }

    #[tokio::test]
    async fn test_empty_text_is_invalid() {
        let result = NegotiationAgent.process(&json!({}), &json!({})).await;
        assert!(matches!(result, Err(AgentError::InvalidInput(_))));
    }
}
