//! Normalized agent outcome schema
//!
//! Every agent reports an [`AgentOutcome`]. Agents that produce loosely
//! structured records go through [`AgentOutcome::from_legacy`] once, at the
//! agent boundary, so downstream code never probes alternative field names.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Decision label an agent votes with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLabel {
    Approved,
    Rejected,
    Conditional,
    /// The agent produced no usable vote
    #[default]
    Unknown,
}

impl DecisionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionLabel::Approved => "approved",
            DecisionLabel::Rejected => "rejected",
            DecisionLabel::Conditional => "conditional",
            DecisionLabel::Unknown => "unknown",
        }
    }

    /// Lenient parse: unrecognized labels become [`DecisionLabel::Unknown`].
    pub fn parse(label: &str) -> Self {
        label.parse().unwrap_or(DecisionLabel::Unknown)
    }

    /// Whether this label lands in one of the three voting buckets
    pub fn is_vote(&self) -> bool {
        !matches!(self, DecisionLabel::Unknown)
    }
}

impl fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecisionLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "approved" | "approve" | "auto_approved" | "accepted" | "allow" | "allowed"
            | "pass" | "passed" => Ok(DecisionLabel::Approved),
            "rejected" | "reject" | "denied" | "deny" | "blocked" | "fail" | "failed" => {
                Ok(DecisionLabel::Rejected)
            }
            "conditional"
            | "conditional_approval"
            | "conditional_approval_with_escalation"
            | "approved_with_conditions"
            | "needs_changes"
            | "requires_changes" => Ok(DecisionLabel::Conditional),
            "unknown" => Ok(DecisionLabel::Unknown),
            _ => Err(DomainError::UnknownDecision(s.to_string())),
        }
    }
}

/// Result record every agent must populate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AgentOutcome {
    /// Normalized vote
    pub decision: DecisionLabel,
    /// Agent-specific status label (e.g. "conditional_approval_with_escalation")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Confidence in [0, 1]; `None` when the agent does not report one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Agent asks for a human reviewer regardless of the vote
    #[serde(default)]
    pub requires_human: bool,
    /// Findings that must stop a sequential workflow
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<String>,
    /// Informational findings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<String>,
    /// Agent-specific details
    #[serde(default)]
    pub payload: Value,
}

impl AgentOutcome {
    pub fn new(decision: DecisionLabel) -> Self {
        Self {
            decision,
            ..Default::default()
        }
    }

    pub fn approved() -> Self {
        Self::new(DecisionLabel::Approved)
    }

    pub fn rejected() -> Self {
        Self::new(DecisionLabel::Rejected)
    }

    pub fn conditional() -> Self {
        Self::new(DecisionLabel::Conditional)
    }

    /// An outcome that carries information but casts no vote
    pub fn informational() -> Self {
        Self::new(DecisionLabel::Unknown)
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn requiring_human(mut self) -> Self {
        self.requires_human = true;
        self
    }

    pub fn with_blocker(mut self, blocker: impl Into<String>) -> Self {
        self.blockers.push(blocker.into());
        self
    }

    pub fn with_finding(mut self, finding: impl Into<String>) -> Self {
        self.findings.push(finding.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn has_blockers(&self) -> bool {
        !self.blockers.is_empty()
    }

    /// Label used for reporting: the raw status when present, else the vote
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(self.decision.as_str())
    }

    /// Adapt a loosely structured record into the normalized schema.
    ///
    /// Decision lookup order: `decision.decision`, `decision.status`,
    /// `status`. Confidence lookup order: `decision.confidence`,
    /// `confidence`, `context.confidence`. Blockers are read from a
    /// top-level `blockers` string array and `requires_human` from either
    /// `requiresHuman` or `requires_human`.
    pub fn from_legacy(record: Value) -> Self {
        let raw_status = record
            .pointer("/decision/decision")
            .and_then(Value::as_str)
            .or_else(|| record.pointer("/decision/status").and_then(Value::as_str))
            .or_else(|| record.get("status").and_then(Value::as_str))
            .map(str::to_string);

        let confidence = record
            .pointer("/decision/confidence")
            .and_then(Value::as_f64)
            .or_else(|| record.get("confidence").and_then(Value::as_f64))
            .or_else(|| record.pointer("/context/confidence").and_then(Value::as_f64))
            .map(|c| c.clamp(0.0, 1.0));

        let requires_human = ["requiresHuman", "requires_human"]
            .iter()
            .any(|key| record.get(*key).and_then(Value::as_bool).unwrap_or(false));

        let blockers = record
            .get("blockers")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            decision: raw_status
                .as_deref()
                .map(DecisionLabel::parse)
                .unwrap_or_default(),
            status: raw_status,
            confidence,
            requires_human,
            blockers,
            findings: Vec::new(),
            payload: record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decision_label_synonyms() {
        assert_eq!(DecisionLabel::parse("APPROVE"), DecisionLabel::Approved);
        assert_eq!(DecisionLabel::parse("auto-approved"), DecisionLabel::Approved);
        assert_eq!(DecisionLabel::parse("denied"), DecisionLabel::Rejected);
        assert_eq!(
            DecisionLabel::parse("conditional_approval_with_escalation"),
            DecisionLabel::Conditional
        );
        assert_eq!(DecisionLabel::parse("needs changes"), DecisionLabel::Conditional);
        assert_eq!(DecisionLabel::parse("maybe"), DecisionLabel::Unknown);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!("maybe".parse::<DecisionLabel>().is_err());
        assert_eq!("unknown".parse::<DecisionLabel>(), Ok(DecisionLabel::Unknown));
    }

    #[test]
    fn test_with_confidence_clamps() {
        let outcome = AgentOutcome::approved().with_confidence(1.4);
        assert_eq!(outcome.confidence, Some(1.0));
        let outcome = AgentOutcome::approved().with_confidence(-0.2);
        assert_eq!(outcome.confidence, Some(0.0));
    }

    #[test]
    fn test_from_legacy_prefers_nested_decision() {
        let outcome = AgentOutcome::from_legacy(json!({
            "decision": {"decision": "rejected", "status": "approved", "confidence": 0.8},
            "status": "approved",
            "confidence": 0.2
        }));
        assert_eq!(outcome.decision, DecisionLabel::Rejected);
        assert_eq!(outcome.confidence, Some(0.8));
    }

    #[test]
    fn test_from_legacy_falls_back_through_fields() {
        let outcome = AgentOutcome::from_legacy(json!({
            "decision": {"status": "conditional"},
            "context": {"confidence": 0.65}
        }));
        assert_eq!(outcome.decision, DecisionLabel::Conditional);
        assert_eq!(outcome.confidence, Some(0.65));

        let outcome = AgentOutcome::from_legacy(json!({"status": "approved"}));
        assert_eq!(outcome.decision, DecisionLabel::Approved);
        assert_eq!(outcome.confidence, None);
    }

    #[test]
    fn test_from_legacy_without_decision_is_unknown() {
        let outcome = AgentOutcome::from_legacy(json!({"analysis": "nothing to say"}));
        assert_eq!(outcome.decision, DecisionLabel::Unknown);
        assert_eq!(outcome.status, None);
        assert_eq!(outcome.status_label(), "unknown");
    }

    #[test]
    fn test_from_legacy_reads_flags() {
        let outcome = AgentOutcome::from_legacy(json!({
            "status": "approved",
            "requiresHuman": true,
            "blockers": ["missing owner", 3]
        }));
        assert!(outcome.requires_human);
        assert_eq!(outcome.blockers, vec!["missing owner".to_string()]);
        assert!(outcome.has_blockers());
    }
}
