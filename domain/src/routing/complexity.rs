//! Request complexity assessment
//!
//! Derives negotiation and conflict signals from the free text of a
//! request before any agent runs.

use crate::negotiation::directory::{Industry, detect_industry, discover_clients};
use crate::negotiation::tool::{ToolInfo, detect_tool, mentions_high_risk_tool};
use serde::{Deserialize, Serialize};

const ESCALATION_KEYWORDS: [&str; 4] = ["urgent", "asap", "emergency", "critical"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Simple => "simple",
            ComplexityLevel::Moderate => "moderate",
            ComplexityLevel::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestComplexity {
    pub clients: Vec<String>,
    pub industry: Industry,
    pub tool: ToolInfo,
    pub multi_client: bool,
    pub competitive_industry: bool,
    pub high_risk_tool: bool,
    pub escalation_keywords: Vec<String>,
    pub conflicts_detected: bool,
    pub requires_negotiation: bool,
    pub level: ComplexityLevel,
}

impl RequestComplexity {
    pub fn assess(text: &str) -> Self {
        let lower = text.to_lowercase();
        let clients = discover_clients(text);
        let industry = detect_industry(text, &clients);
        let tool = detect_tool(text);

        let multi_client = clients.len() >= 2;
        let competitive_industry = industry.is_competitive();
        let high_risk_tool = mentions_high_risk_tool(text);
        let escalation_keywords: Vec<String> = ESCALATION_KEYWORDS
            .iter()
            .filter(|k| lower.contains(*k))
            .map(|k| k.to_string())
            .collect();

        let conflicts_detected = multi_client && competitive_industry;
        let requires_negotiation = conflicts_detected || (multi_client && high_risk_tool);

        let level = if requires_negotiation {
            ComplexityLevel::Complex
        } else if multi_client || high_risk_tool || !escalation_keywords.is_empty() {
            ComplexityLevel::Moderate
        } else {
            ComplexityLevel::Simple
        };

        Self {
            clients,
            industry,
            tool,
            multi_client,
            competitive_industry,
            high_risk_tool,
            escalation_keywords,
            conflicts_detected,
            requires_negotiation,
            level,
        }
    }

    pub fn has_escalation_keywords(&self) -> bool {
        !self.escalation_keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competing_clients_with_high_risk_tool() {
        let c = RequestComplexity::assess(
            "Using Midjourney for campaign images serving Pfizer and Novartis",
        );
        assert!(c.multi_client);
        assert!(c.competitive_industry);
        assert!(c.high_risk_tool);
        assert!(c.conflicts_detected);
        assert!(c.requires_negotiation);
        assert_eq!(c.level, ComplexityLevel::Complex);
    }

    #[test]
    fn test_single_client_is_moderate_with_urgency() {
        let c = RequestComplexity::assess("URGENT: ChatGPT copy for Toyota");
        assert!(!c.multi_client);
        assert!(!c.requires_negotiation);
        assert_eq!(c.escalation_keywords, vec!["urgent"]);
        assert_eq!(c.level, ComplexityLevel::Moderate);
    }

    #[test]
    fn test_plain_request_is_simple() {
        let c = RequestComplexity::assess("Summarise meeting notes");
        assert!(c.clients.is_empty());
        assert_eq!(c.industry, Industry::General);
        assert!(!c.conflicts_detected);
        assert_eq!(c.level, ComplexityLevel::Simple);
    }
}
