//! Dimension-weighted risk assessment
//!
//! Each dimension is a sequence of keyword rules over the [`UsageProfile`].
//! Additive rules raise the score, reductions lower it (never below zero),
//! and the final value is capped at the dimension maximum. The aggregate is
//! the plain sum of the six capped scores, so it always lands in `[0, 100]`.

use crate::risk::dimension::{DimensionScore, RiskDimension};
use crate::risk::profile::UsageProfile;
use crate::risk::tier::{AuditFrequency, RiskTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRequirements {
    pub frequency: AuditFrequency,
    pub scope: Vec<String>,
    pub documentation: Vec<String>,
    pub reviewers: Vec<String>,
}

impl AuditRequirements {
    pub fn for_tier(tier: RiskTier) -> Self {
        let mut scope = vec!["usage_logs", "access_logs"];
        let (extra_scope, documentation, reviewers): (&[&str], &[&str], &[&str]) = match tier {
            RiskTier::Critical => (
                &[
                    "model_performance",
                    "bias_metrics",
                    "explainability_reports",
                    "incident_logs",
                    "compliance_attestations",
                ],
                &[
                    "full_model_card",
                    "risk_assessment",
                    "mitigation_plans",
                    "incident_response_procedures",
                ],
                &[
                    "compliance_officer",
                    "legal_counsel",
                    "security_team",
                    "business_owner",
                ],
            ),
            RiskTier::High => (
                &["model_performance", "bias_metrics", "incident_logs"],
                &["model_card", "risk_assessment", "control_implementation"],
                &["compliance_officer", "security_team", "business_owner"],
            ),
            RiskTier::Medium => (
                &["error_rates", "user_feedback"],
                &["risk_summary", "control_checklist"],
                &["compliance_officer", "business_owner"],
            ),
            RiskTier::Low => (&["basic_metrics"], &["usage_summary"], &["business_owner"]),
            RiskTier::Minimal => (&[], &["basic_attestation"], &["team_lead"]),
        };
        scope.extend_from_slice(extra_scope);

        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            frequency: tier.audit_frequency(),
            scope: owned(&scope),
            documentation: owned(documentation),
            reviewers: owned(reviewers),
        }
    }
}

/// Complete risk profile of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tool_name: String,
    pub vendor_name: String,
    pub dimension_scores: BTreeMap<RiskDimension, DimensionScore>,
    pub aggregate_score: u8,
    pub tier: RiskTier,
    pub risk_multiplier: f64,
    pub recommended_controls: Vec<String>,
    pub audit_requirements: AuditRequirements,
    pub rationale: String,
}

impl RiskAssessment {
    /// Scale a downstream base-risk score by this tier's multiplier
    pub fn apply_multiplier(&self, base_score: f64) -> f64 {
        base_score * self.risk_multiplier
    }

    pub fn score_of(&self, dimension: RiskDimension) -> u8 {
        self.dimension_scores
            .get(&dimension)
            .map(|d| d.score)
            .unwrap_or(0)
    }
}

/// Assess a usage profile across all six dimensions
pub fn assess(profile: &UsageProfile) -> RiskAssessment {
    let dimension_scores: BTreeMap<RiskDimension, DimensionScore> = RiskDimension::ALL
        .iter()
        .map(|&dimension| (dimension, score_dimension(dimension, profile)))
        .collect();

    let aggregate: u32 = dimension_scores.values().map(|d| u32::from(d.score)).sum();
    let aggregate_score = aggregate.min(100) as u8;
    let tier = RiskTier::from_score(aggregate_score);

    RiskAssessment {
        tool_name: profile.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        vendor_name: profile.vendor.clone().unwrap_or_else(|| "Unknown".to_string()),
        recommended_controls: recommended_controls(tier, &dimension_scores),
        audit_requirements: AuditRequirements::for_tier(tier),
        rationale: rationale(tier, aggregate_score, &dimension_scores),
        dimension_scores,
        aggregate_score,
        tier,
        risk_multiplier: tier.multiplier(),
    }
}

/// Base controls, then elevated-dimension controls, then tier controls;
/// duplicates removed keeping first occurrence.
pub fn recommended_controls(
    tier: RiskTier,
    dimension_scores: &BTreeMap<RiskDimension, DimensionScore>,
) -> Vec<String> {
    let elevated = RiskDimension::ALL.iter().filter(|d| {
        dimension_scores
            .get(d)
            .is_some_and(|score| score.level.is_elevated())
    });

    let mut controls: Vec<String> = Vec::new();
    let candidates = ["usage_tracking", "basic_logging"]
        .into_iter()
        .chain(elevated.flat_map(|d| d.elevated_controls().iter().copied()))
        .chain(tier.controls().iter().copied());
    for control in candidates {
        if !controls.iter().any(|c| c == control) {
            controls.push(control.to_string());
        }
    }
    controls
}

fn rationale(
    tier: RiskTier,
    aggregate_score: u8,
    dimension_scores: &BTreeMap<RiskDimension, DimensionScore>,
) -> String {
    let mut lines = vec![
        format!(
            "Overall Risk Profile: {} (Aggregate Score: {}/100)",
            tier.as_str().to_uppercase(),
            aggregate_score
        ),
        String::new(),
        "Dimension Analysis:".to_string(),
    ];
    for score in dimension_scores.values() {
        lines.push(format!(
            "  {}: {} ({}/{})",
            score.dimension.display_name(),
            score.level.as_str().to_uppercase(),
            score.score,
            score.max_score
        ));
        lines.extend(score.findings.iter().map(|f| format!("    - {}", f)));
    }
    lines.join("\n")
}

/// Accumulates one dimension's score and findings
struct Scorer {
    score: i32,
    findings: Vec<String>,
}

impl Scorer {
    fn new() -> Self {
        Self {
            score: 0,
            findings: Vec::new(),
        }
    }

    fn add(&mut self, matched: bool, points: i32, finding: &str) -> bool {
        if matched {
            self.score += points;
            self.findings.push(finding.to_string());
        }
        matched
    }

    fn reduce(&mut self, matched: bool, points: i32, finding: &str) -> bool {
        if matched {
            self.score = (self.score - points).max(0);
            self.findings.push(finding.to_string());
        }
        matched
    }

    fn finish(self, dimension: RiskDimension) -> DimensionScore {
        let max_score = dimension.max_score();
        let score = self.score.clamp(0, i32::from(max_score)) as u8;
        DimensionScore {
            dimension,
            score,
            max_score,
            findings: self.findings,
            level: RiskTier::from_percentage(f64::from(score) / f64::from(max_score) * 100.0),
        }
    }
}

fn any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn score_dimension(dimension: RiskDimension, profile: &UsageProfile) -> DimensionScore {
    let usage = UsageProfile::text(&profile.usage);
    let mut s = Scorer::new();

    match dimension {
        RiskDimension::DataSensitivity => {
            let data = UsageProfile::text(&profile.data_handling);
            s.add(
                any(&data, &["phi", "medical", "ssn", "health"]),
                25,
                "Processes protected health information or medical data",
            );
            s.add(
                any(&data, &["pii", "customer data", "personal"]),
                15,
                "Handles personally identifiable information",
            );
            s.add(
                any(&data, &["stores", "permanently", "retention"]),
                10,
                "Stores or retains user data",
            );
            s.add(
                any(&data, &["financial", "payment", "legal"]),
                15,
                "Processes regulated financial or legal data",
            );
            s.reduce(
                (data.contains("no") && data.contains("data")) || data.contains("public only"),
                10,
                "Minimal or no sensitive data handling",
            );
        }
        RiskDimension::ExternalExposure => {
            let audience = UsageProfile::text(&profile.audience);
            let purpose = UsageProfile::text(&profile.purpose);
            s.add(
                any(&audience, &["customer", "client", "external", "public"]),
                12,
                "Output exposed to external audiences",
            );
            s.add(
                any(
                    &purpose,
                    &["decision", "diagnosis", "legal advice", "financial advice"],
                ),
                15,
                "Feeds into high-stakes decisions",
            );
            if !s.add(
                any(&usage, &["automated", "autonomous"]),
                8,
                "Automated decision-making without human review",
            ) {
                s.reduce(
                    any(&usage, &["human review", "assisted"]),
                    5,
                    "Human review in the loop",
                );
            }
            s.add(
                any(&purpose, &["marketing", "content creation"]),
                5,
                "Marketing or content creation use case",
            );
            s.reduce(
                audience.contains("internal") && !audience.contains("external"),
                8,
                "Internal use only",
            );
        }
        RiskDimension::ModelTransparency => {
            let model = UsageProfile::text(&profile.model_type);
            let vendor = UsageProfile::text(&profile.vendor);
            let explainability = UsageProfile::text(&profile.explainability);
            s.add(
                any(
                    &model,
                    &["llm", "large language model", "neural network", "deep learning"],
                ),
                12,
                "Complex black box model (LLM or deep neural network)",
            );
            s.add(
                any(&model, &["fine-tuned", "custom"]),
                5,
                "Custom or fine-tuned model",
            );
            s.reduce(
                model.contains("prompt") && !model.contains("fine-tuned"),
                5,
                "Prompt-based interaction (more interpretable)",
            );
            if !s.reduce(
                any(&explainability, &["explainable", "interpretable"]),
                5,
                "Provides explainability features",
            ) {
                s.add(
                    any(&explainability, &["none", "black box"]),
                    5,
                    "No explainability features",
                );
            }
            s.add(
                vendor.is_empty() || vendor.contains("unknown"),
                8,
                "Unknown vendor reduces transparency",
            );
        }
        RiskDimension::MisuseVectors => {
            let model = UsageProfile::text(&profile.model_type);
            let controls = UsageProfile::text(&profile.controls);
            s.add(
                any(&model, &["llm", "chatbot", "conversational"]),
                8,
                "Susceptible to prompt injection attacks",
            );
            s.add(
                any(&model, &["generative", "generation"]),
                7,
                "Generative model with hallucination risk",
            );
            s.add(
                any(&usage, &["user input", "chat", "interactive"]),
                5,
                "Processes user input (attack vector)",
            );
            s.add(
                any(&usage, &["training", "learning from user data"]),
                8,
                "Model may learn from sensitive user data",
            );
            s.reduce(
                any(
                    &controls,
                    &["input filtering", "output filtering", "guardrails"],
                ),
                5,
                "Input/output filtering controls in place",
            );
            s.reduce(
                any(&controls, &["sandboxed", "isolated"]),
                3,
                "Sandboxed execution environment",
            );
        }
        RiskDimension::LegalRisk => {
            let industry = UsageProfile::text(&profile.industry);
            let content = UsageProfile::text(&profile.content_type);
            let disclaimers = UsageProfile::text(&profile.disclaimers);
            s.add(
                any(
                    &usage,
                    &[
                        "content creation",
                        "writing",
                        "image generation",
                        "code generation",
                    ],
                ),
                8,
                "Content creation poses copyright/IP risk",
            );
            s.add(
                any(
                    &industry,
                    &["healthcare", "pharmaceutical", "financial", "legal"],
                ),
                10,
                "Operates in highly regulated industry",
            );
            s.add(
                any(&usage, &["legal advice", "medical advice", "diagnosis"]),
                12,
                "Provides professional advice (liability risk)",
            );
            s.add(
                any(&content, &["public", "published"]),
                5,
                "Generates public-facing content",
            );
            s.reduce(
                disclaimers.contains("yes"),
                5,
                "Disclaimers and terms of use in place",
            );
        }
        RiskDimension::OperationalCriticality => {
            let criticality = UsageProfile::text(&profile.criticality);
            let fallback = UsageProfile::text(&profile.fallback);
            s.add(
                criticality.contains("critical"),
                10,
                "Mission-critical system",
            );
            s.add(
                criticality.contains("high availability")
                    || profile.sla_uptime.is_some_and(|uptime| uptime >= 99.9),
                5,
                "High availability requirement",
            );
            s.add(
                any(&usage, &["customer support", "customer service"]),
                7,
                "Customer-facing operations",
            );
            s.reduce(fallback.contains("yes"), 4, "Fallback mechanisms available");
            s.reduce(
                any(&usage, &["productivity", "internal tool"]),
                3,
                "Internal productivity tool (lower criticality)",
            );
        }
    }

    s.finish(dimension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinical_chatbot() -> UsageProfile {
        UsageProfile::new("ClinicBot")
            .with_vendor("Unknown Labs")
            .with_usage("automated patient chat and diagnosis, medical advice")
            .with_data_handling("stores PHI and personal data with permanent retention")
            .with_audience("external patients and public")
            .with_purpose("diagnosis decision support")
            .with_model_type("LLM generative conversational")
            .with_industry("healthcare")
            .with_criticality("mission-critical, high availability")
    }

    #[test]
    fn test_dimension_caps() {
        let assessment = assess(&clinical_chatbot());
        for dimension in RiskDimension::ALL {
            let score = &assessment.dimension_scores[&dimension];
            assert!(score.score <= dimension.max_score());
        }
        assert_eq!(assessment.score_of(RiskDimension::DataSensitivity), 25);
    }

    #[test]
    fn test_critical_profile() {
        let assessment = assess(&clinical_chatbot());
        assert_eq!(assessment.tier, RiskTier::Critical);
        assert!(assessment.aggregate_score >= 81);
        assert_eq!(assessment.risk_multiplier, 2.0);
        assert_eq!(
            assessment.audit_requirements.frequency,
            AuditFrequency::Continuous
        );
        assert!(
            assessment
                .recommended_controls
                .contains(&"human_in_the_loop".to_string())
        );
        assert!(
            assessment
                .recommended_controls
                .contains(&"data_encryption".to_string())
        );
    }

    #[test]
    fn test_benign_profile_is_minimal() {
        let profile = UsageProfile::new("Grammar helper")
            .with_vendor("Acme")
            .with_usage("internal tool for productivity, human review of drafts")
            .with_data_handling("no customer data, public only")
            .with_audience("internal team")
            .with_model_type("prompt-based rules");
        let assessment = assess(&profile);
        assert_eq!(assessment.tier, RiskTier::Minimal);
        assert_eq!(
            assessment.recommended_controls,
            vec!["usage_tracking".to_string(), "basic_logging".to_string()]
        );
        assert_eq!(assessment.audit_requirements.reviewers, vec!["team_lead"]);
    }

    #[test]
    fn test_reductions_floor_at_zero() {
        let profile = UsageProfile::new("x")
            .with_vendor("Acme")
            .with_data_handling("no data")
            .with_controls("guardrails, sandboxed");
        let assessment = assess(&profile);
        assert_eq!(assessment.score_of(RiskDimension::DataSensitivity), 0);
        assert_eq!(assessment.score_of(RiskDimension::MisuseVectors), 0);
    }

    #[test]
    fn test_automated_usage_skips_human_review_reduction() {
        let profile = UsageProfile::new("x")
            .with_vendor("Acme")
            .with_usage("automated with human review")
            .with_audience("customer");
        let assessment = assess(&profile);
        assert_eq!(assessment.score_of(RiskDimension::ExternalExposure), 20);
    }

    #[test]
    fn test_unknown_vendor_penalized() {
        let known = assess(&UsageProfile::new("x").with_vendor("Acme"));
        let unknown = assess(&UsageProfile::new("x"));
        assert_eq!(known.score_of(RiskDimension::ModelTransparency), 0);
        assert_eq!(unknown.score_of(RiskDimension::ModelTransparency), 8);
        assert_eq!(unknown.vendor_name, "Unknown");
    }

    #[test]
    fn test_assessment_is_deterministic() {
        let profile = clinical_chatbot();
        assert_eq!(assess(&profile), assess(&profile));
    }

    #[test]
    fn test_aggregate_is_sum_of_dimensions() {
        let assessment = assess(&clinical_chatbot());
        let sum: u32 = assessment
            .dimension_scores
            .values()
            .map(|d| u32::from(d.score))
            .sum();
        assert_eq!(u32::from(assessment.aggregate_score), sum);
    }

    #[test]
    fn test_controls_are_deduplicated() {
        let assessment = assess(&clinical_chatbot());
        let mut seen = std::collections::HashSet::new();
        for control in &assessment.recommended_controls {
            assert!(seen.insert(control.clone()), "duplicate control {}", control);
        }
    }

    #[test]
    fn test_apply_multiplier() {
        let assessment = assess(&clinical_chatbot());
        assert_eq!(assessment.apply_multiplier(10.0), 20.0);
    }

    #[test]
    fn test_rationale_mentions_tier() {
        let assessment = assess(&clinical_chatbot());
        assert!(assessment.rationale.starts_with("Overall Risk Profile: CRITICAL"));
        assert!(assessment.rationale.contains("Data Sensitivity & Privacy"));
    }
}
