//! Request context: triage classification surfaced as a workflow step

use super::request_text;
use async_trait::async_trait;
use serde_json::Value;
use verdict_application::{Agent, AgentError};
use verdict_domain::{AgentOutcome, Classification, classify};

pub struct ContextAgent;

impl ContextAgent {
    /// Reuse the workflow's classification when present
    fn classification(input: &Value, context: &Value) -> Classification {
        context
            .get("classification")
            .and_then(|c| serde_json::from_value(c.clone()).ok())
            .unwrap_or_else(|| {
                classify(
                    &request_text(input),
                    input.get("type").and_then(Value::as_str),
                )
            })
    }
}

#[async_trait]
impl Agent for ContextAgent {
    async fn process(&self, input: &Value, context: &Value) -> Result<AgentOutcome, AgentError> {
        let classification = Self::classification(input, context);
        let complexity = &classification.complexity;

        let mut outcome = AgentOutcome::informational()
            .with_status(complexity.level.as_str())
            .with_confidence(classification.confidence);

        if !complexity.clients.is_empty() {
            outcome = outcome.with_finding(format!("clients: {}", complexity.clients.join(", ")));
        }
        if let Some(tool) = &complexity.tool.name {
            outcome = outcome.with_finding(format!("tool: {}", tool));
        }
        if complexity.has_escalation_keywords() {
            outcome = outcome.with_finding(format!(
                "escalation keywords: {}",
                complexity.escalation_keywords.join(", ")
            ));
        }
        if classification.internal_only {
            outcome = outcome.with_finding("internal use only");
        }

        let payload = serde_json::to_value(&classification)
            .map_err(|e| AgentError::Failed(e.to_string()))?;
        Ok(outcome.with_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_context_reports_clients_and_tool() {
        let outcome = ContextAgent
            .process(
                &json!({ "message": "Using Midjourney for campaign images serving Pfizer and Novartis" }),
                &json!({}),
            )
            .await
            .unwrap();

        assert_eq!(outcome.confidence, Some(0.7));
        assert!(outcome.findings.iter().any(|f| f.contains("Pfizer")));
        assert!(outcome.findings.iter().any(|f| f.starts_with("tool:")));
        assert_eq!(
            outcome.payload["recommended_workflow"],
            "multi-client-conflict-resolution"
        );
    }

    #[tokio::test]
    async fn test_context_prefers_supplied_classification() {
        let mut supplied = classify("internal team update", None);
        supplied.confidence = 0.42;
        let context = json!({ "classification": supplied });

        let outcome = ContextAgent
            .process(&json!({ "message": "client pitch" }), &context)
            .await
            .unwrap();

        assert_eq!(outcome.confidence, Some(0.42));
        assert!(outcome.findings.contains(&"internal use only".to_string()));
    }
}
