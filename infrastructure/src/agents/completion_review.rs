//! Free-text review through a text completion backend

use super::request_text;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use verdict_application::{Agent, AgentError, CompletionError, CompletionOptions, TextCompletion};
use verdict_domain::{AgentOutcome, embedded_record, parse_confidence, parse_decision_text};

const REVIEW_PROMPT: &str = "You review requests to use generative tools for client work. \
Reply with a JSON object {\"status\": \"approved\" | \"rejected\" | \"conditional\", \
\"confidence\": <0..1>, \"requires_human\": <bool>, \"blockers\": [...], \"reasoning\": \"...\"}.";

/// Asks a language model for a decision and extracts the vote from its reply.
pub struct CompletionReviewAgent {
    completion: Arc<dyn TextCompletion>,
    options: CompletionOptions,
}

impl CompletionReviewAgent {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            completion,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(text: &str, context: &Value) -> String {
        let mut prompt = format!("{}\n\nRequest:\n{}", REVIEW_PROMPT, text);
        if let Some(workflow) = context.get("workflow").and_then(Value::as_str) {
            prompt.push_str(&format!("\n\nWorkflow: {}", workflow));
        }
        prompt
    }

    /// A JSON reply goes through the legacy record adapter; anything the
    /// adapter cannot read as a vote falls back to free-text parsing.
    fn outcome_from(response: &str) -> AgentOutcome {
        if let Some(record) = embedded_record(response) {
            let outcome = AgentOutcome::from_legacy(record);
            if outcome.decision.is_vote() {
                return outcome;
            }
        }

        let outcome = AgentOutcome::new(parse_decision_text(response));
        match parse_confidence(response) {
            Some(confidence) => outcome.with_confidence(confidence),
            None => outcome,
        }
    }
}

#[async_trait]
impl Agent for CompletionReviewAgent {
    async fn process(&self, input: &Value, context: &Value) -> Result<AgentOutcome, AgentError> {
        let text = request_text(input);
        if text.trim().is_empty() {
            return Err(AgentError::InvalidInput("no request text to review".to_string()));
        }

        let response = self
            .completion
            .complete(&Self::prompt(&text, context), self.options)
            .await
            .map_err(|e| match e {
                CompletionError::Timeout => {
                    AgentError::Unavailable("completion timed out".to_string())
                }
                CompletionError::RequestFailed(message) => AgentError::Unavailable(message),
            })?;

        let mut outcome = Self::outcome_from(&response);
        if !outcome.decision.is_vote() {
            outcome = outcome.with_finding("completion contained no recognizable decision");
        }
        Ok(outcome.with_payload(json!({ "response": response })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use verdict_domain::DecisionLabel;

    struct ScriptedCompletion {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompletion {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextCompletion for ScriptedCompletion {
        async fn complete(
            &self,
            prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| CompletionError::RequestFailed("backend down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_json_reply_is_parsed() {
        let backend = ScriptedCompletion::replying(
            r#"Here you go: {"decision": "conditional", "confidence": 0.65}"#,
        );
        let agent = CompletionReviewAgent::new(backend.clone());

        let outcome = agent
            .process(
                &json!({ "message": "Use DALL-E for Toyota ads" }),
                &json!({ "workflow": "agency-tool-submission" }),
            )
            .await
            .unwrap();

        assert_eq!(outcome.decision, DecisionLabel::Conditional);
        assert_eq!(outcome.confidence, Some(0.65));
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Use DALL-E for Toyota ads"));
        assert!(prompts[0].contains("agency-tool-submission"));
    }

    #[tokio::test]
    async fn test_structured_reply_keeps_status_and_flags() {
        let backend = ScriptedCompletion::replying(
            r#"{"status": "conditional_approval", "confidence": 0.7,
                "requires_human": true, "blockers": ["missing disclosure"]}"#,
        );
        let agent = CompletionReviewAgent::new(backend);

        let outcome = agent
            .process(&json!({ "message": "Use Runway for Ford teaser" }), &json!({}))
            .await
            .unwrap();

        assert_eq!(outcome.decision, DecisionLabel::Conditional);
        assert_eq!(outcome.status.as_deref(), Some("conditional_approval"));
        assert_eq!(outcome.confidence, Some(0.7));
        assert!(outcome.requires_human);
        assert_eq!(outcome.blockers, vec!["missing disclosure".to_string()]);
        assert!(outcome.payload["response"].is_string());
    }

    #[tokio::test]
    async fn test_nested_decision_record_is_adapted() {
        let backend = ScriptedCompletion::replying(
            r#"Result: {"decision": {"decision": "denied", "confidence": 0.9}}"#,
        );
        let agent = CompletionReviewAgent::new(backend);

        let outcome = agent
            .process(&json!({ "message": "Upload client data to a public model" }), &json!({}))
            .await
            .unwrap();

        assert_eq!(outcome.decision, DecisionLabel::Rejected);
        assert_eq!(outcome.confidence, Some(0.9));
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let backend = Arc::new(ScriptedCompletion {
            reply: Err(()),
            prompts: Mutex::new(Vec::new()),
        });
        let agent = CompletionReviewAgent::new(backend);

        let result = agent.process(&json!({ "message": "x" }), &json!({})).await;
        assert_eq!(
            result.unwrap_err(),
            AgentError::Unavailable("backend down".to_string())
        );
    }
}
