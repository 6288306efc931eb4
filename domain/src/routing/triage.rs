//! Workflow recommendation for incoming requests

use crate::routing::complexity::RequestComplexity;
use crate::workflow::catalog::{
    AGENCY_TOOL_SUBMISSION, COMPLIANCE_AUDIT, DEFAULT_WORKFLOW, ENTERPRISE_POLICY_CREATION,
    HUMAN_OVERRIDE_REVIEW, MULTI_CLIENT_CONFLICT_RESOLUTION, POLICY_DISTRIBUTION_SYNC,
};
use serde::{Deserialize, Serialize};

/// Confidence used when no presentation signal matches
pub const DEFAULT_CLASSIFICATION_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationType {
    ClientPresentation,
    CreativePitch,
    InternalReview,
    DataAnalysis,
}

impl PresentationType {
    const ALL: [PresentationType; 4] = [
        PresentationType::ClientPresentation,
        PresentationType::CreativePitch,
        PresentationType::InternalReview,
        PresentationType::DataAnalysis,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            PresentationType::ClientPresentation => &["client", "pitch", "proposal", "deliverable"],
            PresentationType::CreativePitch => &["creative", "concept", "idea", "design"],
            PresentationType::InternalReview => &["team", "internal", "review", "update"],
            PresentationType::DataAnalysis => &["data", "analytics", "metrics", "report"],
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            PresentationType::ClientPresentation => 0.8,
            PresentationType::CreativePitch => 0.7,
            PresentationType::InternalReview => 0.6,
            PresentationType::DataAnalysis => 0.5,
        }
    }

    /// Type with the most keyword hits; earlier types win ties
    pub fn detect(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let mut best: Option<(PresentationType, usize)> = None;
        for kind in Self::ALL {
            let hits = kind.keywords().iter().filter(|k| lower.contains(*k)).count();
            if hits > 0 && best.is_none_or(|(_, most)| hits > most) {
                best = Some((kind, hits));
            }
        }
        best.map(|(kind, _)| kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub recommended_workflow: String,
    pub confidence: f64,
    pub presentation: Option<PresentationType>,
    pub internal_only: bool,
    pub complexity: RequestComplexity,
}

/// Map an explicit request type to its workflow
pub fn workflow_for_type(request_type: &str) -> Option<&'static str> {
    match request_type {
        "tool_submission" => Some(AGENCY_TOOL_SUBMISSION),
        "policy_creation" => Some(ENTERPRISE_POLICY_CREATION),
        "conflict_resolution" => Some(MULTI_CLIENT_CONFLICT_RESOLUTION),
        "compliance_audit" => Some(COMPLIANCE_AUDIT),
        "human_override" => Some(HUMAN_OVERRIDE_REVIEW),
        "policy_distribution" => Some(POLICY_DISTRIBUTION_SYNC),
        _ => None,
    }
}

pub fn recommend_workflow(request_type: Option<&str>, complexity: &RequestComplexity) -> &'static str {
    if let Some(workflow) = request_type.and_then(workflow_for_type) {
        return workflow;
    }
    if complexity.requires_negotiation {
        MULTI_CLIENT_CONFLICT_RESOLUTION
    } else if complexity.tool.is_known() {
        AGENCY_TOOL_SUBMISSION
    } else {
        DEFAULT_WORKFLOW
    }
}

/// Classify a request from its text and optional explicit type
pub fn classify(text: &str, request_type: Option<&str>) -> Classification {
    let complexity = RequestComplexity::assess(text);
    let presentation = PresentationType::detect(text);
    let confidence = presentation
        .map(|p| p.confidence())
        .unwrap_or(DEFAULT_CLASSIFICATION_CONFIDENCE);

    let lower = text.to_lowercase();
    let external = ["client", "external", "public", "customer"]
        .iter()
        .any(|k| lower.contains(k));
    let internal_only = lower.contains("internal") && !external && complexity.clients.is_empty();

    Classification {
        recommended_workflow: recommend_workflow(request_type, &complexity).to_string(),
        confidence,
        presentation,
        internal_only,
        complexity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiation_bearing_route() {
        let c = classify(
            "Using Midjourney for campaign images serving Pfizer and Novartis",
            None,
        );
        assert_eq!(c.recommended_workflow, MULTI_CLIENT_CONFLICT_RESOLUTION);
        assert_eq!(c.confidence, DEFAULT_CLASSIFICATION_CONFIDENCE);
        assert!(!c.internal_only);
    }

    #[test]
    fn test_explicit_type_wins() {
        let c = classify("Pfizer and Novartis midjourney", Some("compliance_audit"));
        assert_eq!(c.recommended_workflow, COMPLIANCE_AUDIT);
    }

    #[test]
    fn test_unknown_type_falls_through() {
        let c = classify("Need ChatGPT for the client pitch", Some("weird"));
        assert_eq!(c.recommended_workflow, AGENCY_TOOL_SUBMISSION);
        assert_eq!(c.presentation, Some(PresentationType::ClientPresentation));
        assert_eq!(c.confidence, 0.8);
    }

    #[test]
    fn test_internal_only() {
        let c = classify("internal team update notes", None);
        assert!(c.internal_only);
        assert_eq!(c.presentation, Some(PresentationType::InternalReview));
        assert_eq!(c.recommended_workflow, DEFAULT_WORKFLOW);

        assert!(!classify("internal draft for a client", None).internal_only);
    }
}
