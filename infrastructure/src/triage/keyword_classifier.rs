//! Rule-based triage over the request text

use crate::agents::request_text;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use verdict_application::{ClassifierError, TriageClassifier};
use verdict_domain::{Classification, classify};

/// Classifies requests with the keyword rules in [`verdict_domain::routing`].
///
/// An explicit `type` field on the input overrides the recommendation
/// when it names a known request type.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordTriageClassifier;

impl KeywordTriageClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TriageClassifier for KeywordTriageClassifier {
    async fn classify(&self, input: &Value) -> Result<Classification, ClassifierError> {
        let text = request_text(input);
        if text.trim().is_empty() {
            return Err(ClassifierError::EmptyRequest(
                "no message, request, description or text field".to_string(),
            ));
        }

        let request_type = input.get("type").and_then(Value::as_str);
        let classification = classify(&text, request_type);
        debug!(
            "Triage recommends {} (confidence {:.2}, complexity {:?})",
            classification.recommended_workflow,
            classification.confidence,
            classification.complexity.level
        );
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_multi_client_request_routes_to_conflict_resolution() {
        let classifier = KeywordTriageClassifier::new();
        let classification = classifier
            .classify(&json!({
                "message": "Using Midjourney for campaign images serving Pfizer and Novartis"
            }))
            .await
            .unwrap();

        assert_eq!(
            classification.recommended_workflow,
            "multi-client-conflict-resolution"
        );
        assert!(classification.complexity.requires_negotiation);
    }

    #[tokio::test]
    async fn test_explicit_type_is_honored() {
        let classifier = KeywordTriageClassifier::new();
        let classification = classifier
            .classify(&json!({ "description": "quarterly check", "type": "compliance_audit" }))
            .await
            .unwrap();

        assert_eq!(classification.recommended_workflow, "compliance-audit-workflow");
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let classifier = KeywordTriageClassifier::new();
        let result = classifier.classify(&json!({ "message": "   " })).await;
        assert!(matches!(result, Err(ClassifierError::EmptyRequest(_))));
    }
}
