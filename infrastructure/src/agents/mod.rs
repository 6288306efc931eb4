//! Built-in leaf agents
//!
//! Each agent wraps one of the domain scoring routines behind the
//! [`Agent`](verdict_application::Agent) port. [`register_default_agents`]
//! installs the full set on a coordinator.

mod audit;
mod completion_review;
mod conflict;
mod context;
mod negotiation;
mod policy;
mod pre_flight;

pub use audit::AuditAgent;
pub use completion_review::CompletionReviewAgent;
pub use conflict::ConflictDetectionAgent;
pub use context::ContextAgent;
pub use negotiation::NegotiationAgent;
pub use policy::PolicyAgent;
pub use pre_flight::PreFlightAgent;

use crate::config::FileAgentsConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use verdict_application::{Agent, Coordinator, TextCompletion};
use verdict_domain::PolicyDocument;

pub const PRE_FLIGHT: &str = "pre-flight";
pub const CONTEXT: &str = "context";
pub const POLICY: &str = "policy";
pub const CONFLICT_DETECTION: &str = "conflict-detection";
pub const NEGOTIATION: &str = "negotiation";
pub const AUDIT: &str = "audit";
pub const COMPLETION_REVIEW: &str = "completion-review";

/// Agents that cast a vote in an ad-hoc coordination
pub const SCORING_AGENTS: [&str; 3] = [POLICY, CONFLICT_DETECTION, NEGOTIATION];

const TEXT_FIELDS: [&str; 4] = ["message", "request", "description", "text"];

/// Register the built-in agents, weighted from configuration.
///
/// The completion review agent is only installed when a text completion
/// backend is supplied. Returns the shared audit agent so callers can
/// inspect feedback it received.
pub fn register_default_agents(
    coordinator: &Coordinator,
    weights: &FileAgentsConfig,
    completion: Option<Arc<dyn TextCompletion>>,
) -> Arc<AuditAgent> {
    let audit = Arc::new(AuditAgent::new());

    let register = |name: &str, agent: Arc<dyn Agent>, dependencies: &[&str]| {
        let dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        coordinator.register_agent(name, agent, weights.weight_of(name), dependencies);
    };
    register(PRE_FLIGHT, Arc::new(PreFlightAgent), &[]);
    register(CONTEXT, Arc::new(ContextAgent), &[]);
    register(POLICY, Arc::new(PolicyAgent), &[CONTEXT]);
    register(CONFLICT_DETECTION, Arc::new(ConflictDetectionAgent), &[]);
    register(NEGOTIATION, Arc::new(NegotiationAgent), &[CONFLICT_DETECTION]);
    register(AUDIT, audit.clone(), &[]);
    if let Some(completion) = completion {
        register(
            COMPLETION_REVIEW,
            Arc::new(CompletionReviewAgent::new(completion)),
            &[],
        );
    }
    info!("Registered {} agents", coordinator.agent_names().len());

    audit
}

/// Concatenated request text from the well-known input fields
pub fn request_text(input: &Value) -> String {
    if let Some(text) = input.as_str() {
        return text.to_string();
    }
    TEXT_FIELDS
        .iter()
        .filter_map(|field| input.get(*field).and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Policy documents from `input.policies`.
///
/// Entries may be plain strings or objects with `content` (or `text`)
/// and optional `id` and `name`. Entries without content are dropped.
pub fn policy_documents(input: &Value) -> Vec<PolicyDocument> {
    let Some(items) = input.get("policies").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let fallback_id = format!("policy-{}", i + 1);
            let (id, name, content) = match item {
                Value::String(content) => (fallback_id.clone(), fallback_id, content.as_str()),
                Value::Object(map) => {
                    let content = map
                        .get("content")
                        .or_else(|| map.get("text"))
                        .and_then(Value::as_str)?;
                    let id = map
                        .get("id")
                        .and_then(Value::as_str)
                        .map_or(fallback_id, str::to_string);
                    let name = map
                        .get("name")
                        .and_then(Value::as_str)
                        .map_or_else(|| id.clone(), str::to_string);
                    (id, name, content)
                }
                _ => return None,
            };
            (!content.trim().is_empty()).then(|| PolicyDocument::new(id, name, content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySubmissionStore;
    use crate::triage::KeywordTriageClassifier;
    use serde_json::json;
    use verdict_application::{
        CoordinatorParams, ExecuteWorkflowInput, ExecuteWorkflowUseCase, NoEventPublisher,
    };
    use verdict_domain::workflow::catalog::MULTI_CLIENT_CONFLICT_RESOLUTION;

    #[test]
    fn test_request_text_joins_known_fields() {
        let input = json!({
            "message": "Use ChatGPT",
            "description": "for the Pfizer deck",
            "other": "ignored"
        });
        assert_eq!(request_text(&input), "Use ChatGPT\nfor the Pfizer deck");
        assert_eq!(request_text(&json!("plain")), "plain");
        assert_eq!(request_text(&json!({ "count": 3 })), "");
    }

    #[test]
    fn test_policy_documents_accepts_strings_and_objects() {
        let input = json!({
            "policies": [
                "All uploads must be reviewed",
                { "id": "p2", "name": "Data", "content": "Uploads prohibited" },
                { "name": "Empty" },
                { "text": "   " },
                42
            ]
        });
        let docs = policy_documents(&input);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "policy-1");
        assert_eq!(docs[0].name, "policy-1");
        assert_eq!(docs[1].id, "p2");
        assert_eq!(docs[1].name, "Data");
    }

    #[test]
    fn test_register_default_agents() {
        let coordinator = Coordinator::new(CoordinatorParams::default());
        let mut weights = FileAgentsConfig::default();
        weights.weights.insert(POLICY.to_string(), 2.5);

        register_default_agents(&coordinator, &weights, None);

        assert_eq!(
            coordinator.agent_names(),
            vec![AUDIT, CONFLICT_DETECTION, CONTEXT, NEGOTIATION, POLICY, PRE_FLIGHT]
        );
        assert_eq!(coordinator.descriptor(POLICY).unwrap().weight, 2.5);
        assert_eq!(coordinator.descriptor(AUDIT).unwrap().weight, 1.0);
        assert_eq!(
            coordinator.descriptor(NEGOTIATION).unwrap().dependencies,
            vec![CONFLICT_DETECTION.to_string()]
        );
        assert!(!coordinator.is_registered(COMPLETION_REVIEW));
    }

    #[tokio::test]
    async fn test_competing_clients_with_image_tool_route_to_negotiation() {
        let coordinator = Arc::new(Coordinator::new(CoordinatorParams::default()));
        register_default_agents(&coordinator, &FileAgentsConfig::default(), None);
        let use_case = ExecuteWorkflowUseCase::new(
            coordinator,
            Arc::new(InMemorySubmissionStore::new()),
            Arc::new(KeywordTriageClassifier::new()),
            Arc::new(NoEventPublisher),
        );

        let input = ExecuteWorkflowInput::new(json!({
            "message": "Using Midjourney for campaign images serving Pfizer and Novartis"
        }));
        let output = use_case.execute(input).await.unwrap();

        assert_eq!(output.workflow, MULTI_CLIENT_CONFLICT_RESOLUTION);
        assert!(!output.fell_back);
        let complexity = &output.classification.as_ref().unwrap().complexity;
        assert!(complexity.conflicts_detected);
        assert!(complexity.requires_negotiation);

        assert_eq!(output.results.len(), 4);
        assert!(output.results.iter().all(|step| step.is_completed()));
        let status = output.summary.decision_status.as_deref();
        assert!(matches!(
            status,
            Some("conditional_approval_with_escalation") | Some("escalation_required")
        ));
        assert!(output.human_review_required);
    }
}
