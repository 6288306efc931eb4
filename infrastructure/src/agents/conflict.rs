//! Pairwise conflict detection across the submitted policy documents

use super::policy_documents;
use async_trait::async_trait;
use serde_json::{Value, json};
use verdict_application::{Agent, AgentError};
use verdict_domain::{AgentOutcome, ResolutionPlan, ResolutionStrategy, detect_conflicts};

pub struct ConflictDetectionAgent;

#[async_trait]
impl Agent for ConflictDetectionAgent {
    async fn process(&self, input: &Value, _context: &Value) -> Result<AgentOutcome, AgentError> {
        let documents = policy_documents(input);
        if documents.len() < 2 {
            return Ok(AgentOutcome::informational()
                .with_status("insufficient_policies")
                .with_payload(json!({ "policies": documents.len() })));
        }

        let assessment = detect_conflicts(&documents);
        if !assessment.has_conflicts() {
            return Ok(AgentOutcome::approved()
                .with_status("no_conflicts")
                .with_confidence(0.9)
                .with_payload(json!({ "policies": documents.len(), "assessment": assessment })));
        }

        let plan = ResolutionPlan::for_assessment(&assessment);
        let mut outcome = match plan.strategy {
            ResolutionStrategy::AutomatedResolution => AgentOutcome::approved(),
            ResolutionStrategy::GuidedResolution | ResolutionStrategy::ExpertMediation => {
                AgentOutcome::conditional()
            }
        }
        .with_status(plan.strategy.as_str())
        .with_confidence(1.0 - assessment.average_severity / 2.0);
        if plan.requires_human_review {
            outcome = outcome.requiring_human();
        }
        for conflict in &assessment.conflicts {
            outcome = outcome.with_finding(conflict.description.clone());
        }

        Ok(outcome.with_payload(json!({
            "policies": documents.len(),
            "assessment": assessment,
            "resolution": plan,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_domain::DecisionLabel;

    #[tokio::test]
    async fn test_fewer_than_two_policies_casts_no_vote() {
        let outcome = ConflictDetectionAgent
            .process(&json!({ "policies": ["Only one"] }), &json!({}))
            .await
            .unwrap();
        assert!(!outcome.decision.is_vote());
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn test_contradicting_policies_are_reported() {
        let input = json!({
            "policies": [
                { "name": "Brand", "content": "Client approval is mandatory for generated imagery" },
                { "name": "Legal", "content": "Generated imagery is prohibited without legal approval" }
            ]
        });
        let outcome = ConflictDetectionAgent
            .process(&input, &json!({}))
            .await
            .unwrap();

        assert!(!outcome.findings.is_empty());
        assert!(
            outcome
                .findings
                .iter()
                .any(|f| f.contains("Direct contradiction found between Brand and Legal"))
        );
        assert!(outcome.decision.is_vote());
        assert_eq!(
            outcome.payload["assessment"]["conflicts"].as_array().unwrap().len(),
            outcome.findings.len()
        );
    }

    #[tokio::test]
    async fn test_compatible_policies_are_approved() {
        let input = json!({
            "policies": ["Logos stay blue", "Fonts stay serif"]
        });
        let outcome = ConflictDetectionAgent
            .process(&input, &json!({}))
            .await
            .unwrap();
        assert_eq!(outcome.decision, DecisionLabel::Approved);
        assert_eq!(outcome.status.as_deref(), Some("no_conflicts"));
    }
}
