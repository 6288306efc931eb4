//! Risk-tier policy evaluation of a tool usage profile

use super::request_text;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use verdict_application::{Agent, AgentError};
use verdict_domain::negotiation::tool::detect_tool;
use verdict_domain::{AgentOutcome, RiskTier, UsageProfile, assess};

const POLICY_CONFIDENCE: f64 = 0.85;

pub struct PolicyAgent;

impl PolicyAgent {
    /// Explicit `input.profile`, or one derived from the request text
    fn profile(input: &Value) -> Result<UsageProfile, AgentError> {
        if let Some(profile) = input.get("profile") {
            return serde_json::from_value(profile.clone())
                .map_err(|e| AgentError::InvalidInput(format!("profile: {}", e)));
        }

        let text = request_text(input);
        if text.trim().is_empty() {
            return Err(AgentError::InvalidInput(
                "neither a profile nor request text was supplied".to_string(),
            ));
        }
        let name = detect_tool(&text)
            .name
            .unwrap_or_else(|| "unspecified tool".to_string());
        Ok(UsageProfile::new(name)
            .with_usage(text.clone())
            .with_purpose(text.clone())
            .with_audience(text.clone())
            .with_data_handling(text))
    }

    fn outcome_for_tier(tier: RiskTier) -> AgentOutcome {
        match tier {
            RiskTier::Minimal | RiskTier::Low => AgentOutcome::approved(),
            RiskTier::Medium => AgentOutcome::conditional(),
            RiskTier::High => AgentOutcome::conditional().requiring_human(),
            RiskTier::Critical => AgentOutcome::rejected()
                .requiring_human()
                .with_blocker("critical risk tier requires executive sign-off"),
        }
    }
}

#[async_trait]
impl Agent for PolicyAgent {
    async fn process(&self, input: &Value, _context: &Value) -> Result<AgentOutcome, AgentError> {
        let profile = Self::profile(input)?;
        let assessment = assess(&profile);
        debug!(
            "Risk for {}: {} ({}/100)",
            assessment.tool_name,
            assessment.tier.as_str(),
            assessment.aggregate_score
        );

        let mut outcome = Self::outcome_for_tier(assessment.tier)
            .with_status(format!("{}_risk", assessment.tier.as_str()))
            .with_confidence(POLICY_CONFIDENCE);
        for score in assessment.dimension_scores.values() {
            if score.level.is_elevated() {
                outcome = outcome.with_finding(format!(
                    "{}: {}/{}",
                    score.dimension.display_name(),
                    score.score,
                    score.max_score
                ));
            }
        }

        let payload =
            serde_json::to_value(&assessment).map_err(|e| AgentError::Failed(e.to_string()))?;
        Ok(outcome.with_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verdict_domain::DecisionLabel;

    #[test]
    fn test_tier_mapping() {
        assert_eq!(
            PolicyAgent::outcome_for_tier(RiskTier::Low).decision,
            DecisionLabel::Approved
        );
        let high = PolicyAgent::outcome_for_tier(RiskTier::High);
        assert_eq!(high.decision, DecisionLabel::Conditional);
        assert!(high.requires_human);
        let critical = PolicyAgent::outcome_for_tier(RiskTier::Critical);
        assert_eq!(critical.decision, DecisionLabel::Rejected);
        assert!(critical.has_blockers());
    }

    #[tokio::test]
    async fn test_explicit_profile_is_scored() {
        let profile = json!({
            "name": "Copilot",
            "vendor": "Microsoft",
            "usage": "internal drafting",
            "dataHandling": "no client data"
        });
        let expected = assess(&serde_json::from_value(profile.clone()).unwrap());

        let outcome = PolicyAgent
            .process(&json!({ "profile": profile }), &json!({}))
            .await
            .unwrap();

        assert_eq!(
            outcome.decision,
            PolicyAgent::outcome_for_tier(expected.tier).decision
        );
        assert_eq!(outcome.payload["aggregate_score"], expected.aggregate_score);
        assert_eq!(outcome.confidence, Some(POLICY_CONFIDENCE));
    }

    #[tokio::test]
    async fn test_profile_derived_from_text() {
        let outcome = PolicyAgent
            .process(
                &json!({ "message": "Using Midjourney for campaign images serving Pfizer" }),
                &json!({}),
            )
            .await
            .unwrap();
        assert_eq!(outcome.payload["tool_name"], "midjourney");
    }

    #[tokio::test]
    async fn test_missing_input_is_invalid() {
        let result = PolicyAgent.process(&json!({}), &json!({})).await;
        assert!(matches!(result, Err(AgentError::InvalidInput(_))));

        let result = PolicyAgent
            .process(&json!({ "profile": "not an object" }), &json!({}))
            .await;
        assert!(matches!(result, Err(AgentError::InvalidInput(_))));
    }
}
