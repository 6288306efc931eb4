//! Audit trail of the steps that ran before this agent

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::sync::Mutex;
use tracing::info;
use verdict_application::{Agent, AgentError};
use verdict_domain::{AgentFeedback, AgentOutcome};

/// Records prior step outcomes and retains feedback for later review.
#[derive(Default)]
pub struct AuditAgent {
    feedback: Mutex<Vec<AgentFeedback>>,
}

impl AuditAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback received so far, oldest first
    pub fn feedback(&self) -> Vec<AgentFeedback> {
        self.feedback
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Agent for AuditAgent {
    async fn process(&self, _input: &Value, context: &Value) -> Result<AgentOutcome, AgentError> {
        let prior = context
            .get("previousResults")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let trail: Vec<Value> = prior
            .iter()
            .map(|step| {
                json!({
                    "agent": step.get("agent_name").cloned().unwrap_or(Value::Null),
                    "status": step.get("status").cloned().unwrap_or(Value::Null),
                    "elapsed_ms": step.get("elapsed_ms").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        let mut outcome = AgentOutcome::informational().with_status("recorded");
        for step in prior {
            if step.get("status").and_then(Value::as_str) == Some("failed") {
                let agent = step.get("agent_name").and_then(Value::as_str).unwrap_or("?");
                outcome = outcome.with_finding(format!("{} failed", agent));
            }
        }

        Ok(outcome.with_payload(json!({
            "submission_id": context.get("submissionId").cloned().unwrap_or(Value::Null),
            "workflow": context.get("workflow").cloned().unwrap_or(Value::Null),
            "recorded_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "trail": trail,
        })))
    }

    async fn learn(&self, feedback: &AgentFeedback) {
        info!(
            "Audit feedback for {:?}: accepted={}",
            feedback.submission_id, feedback.accepted
        );
        if let Ok(mut items) = self.feedback.lock() {
            items.push(feedback.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_domain::DecisionLabel;

    #[tokio::test]
    async fn test_trail_reflects_previous_results() {
        let context = json!({
            "submissionId": "sub-7",
            "workflow": "enterprise-policy-creation",
            "previousResults": [
                { "agent_name": "context", "status": "completed", "elapsed_ms": 3 },
                { "agent_name": "policy", "status": "failed", "kind": "timeout", "error": "late", "elapsed_ms": 10 }
            ]
        });

        let outcome = AuditAgent::new().process(&json!({}), &context).await.unwrap();

        assert!(!outcome.decision.is_vote());
        assert_eq!(outcome.findings, vec!["policy failed".to_string()]);
        assert_eq!(outcome.payload["submission_id"], "sub-7");
        let trail = outcome.payload["trail"].as_array().unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0]["agent"], "context");
    }

    #[tokio::test]
    async fn test_empty_trail_without_previous_results() {
        let outcome = AuditAgent::new().process(&json!({}), &json!({})).await.unwrap();
        assert!(outcome.payload["trail"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_learn_retains_feedback() {
        let agent = AuditAgent::new();
        agent.learn(&AgentFeedback::accepted().for_submission("a")).await;
        agent
            .learn(&AgentFeedback::corrected(DecisionLabel::Rejected, "missed a clause"))
            .await;

        let feedback = agent.feedback();
        assert_eq!(feedback.len(), 2);
        assert!(feedback[0].accepted);
        assert_eq!(feedback[1].corrected_decision, Some(DecisionLabel::Rejected));
    }
}
