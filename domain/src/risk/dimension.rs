//! The six scored risk dimensions

use crate::risk::tier::RiskTier;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDimension {
    DataSensitivity,
    ExternalExposure,
    ModelTransparency,
    MisuseVectors,
    LegalRisk,
    OperationalCriticality,
}

impl RiskDimension {
    pub const ALL: [RiskDimension; 6] = [
        RiskDimension::DataSensitivity,
        RiskDimension::ExternalExposure,
        RiskDimension::ModelTransparency,
        RiskDimension::MisuseVectors,
        RiskDimension::LegalRisk,
        RiskDimension::OperationalCriticality,
    ];

    /// Per-dimension cap; the six caps sum to 100
    pub fn max_score(&self) -> u8 {
        match self {
            RiskDimension::DataSensitivity => 25,
            RiskDimension::ExternalExposure => 20,
            RiskDimension::ModelTransparency => 15,
            RiskDimension::MisuseVectors => 15,
            RiskDimension::LegalRisk => 15,
            RiskDimension::OperationalCriticality => 10,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RiskDimension::DataSensitivity => "Data Sensitivity & Privacy",
            RiskDimension::ExternalExposure => "External Exposure & Decision Impact",
            RiskDimension::ModelTransparency => "Model Transparency",
            RiskDimension::MisuseVectors => "Misuse / Adversarial Vectors",
            RiskDimension::LegalRisk => "Legal / IP Risk",
            RiskDimension::OperationalCriticality => "Operational Criticality",
        }
    }

    /// Controls added when this dimension scores high or critical
    pub fn elevated_controls(&self) -> &'static [&'static str] {
        match self {
            RiskDimension::DataSensitivity => &[
                "data_encryption",
                "access_controls",
                "data_minimization",
                "redaction_protocols",
            ],
            RiskDimension::ExternalExposure => {
                &["human_review", "output_validation", "liability_disclaimers"]
            }
            RiskDimension::ModelTransparency => &[
                "explainability_requirements",
                "model_documentation",
                "decision_tracing",
            ],
            RiskDimension::MisuseVectors => &[
                "input_filtering",
                "output_filtering",
                "prompt_injection_detection",
                "rate_limiting",
            ],
            RiskDimension::LegalRisk => &[
                "legal_review",
                "compliance_audit",
                "copyright_screening",
                "professional_liability_insurance",
            ],
            RiskDimension::OperationalCriticality => &[
                "sla_monitoring",
                "failover_systems",
                "incident_response_plan",
                "business_continuity_plan",
            ],
        }
    }
}

impl fmt::Display for RiskDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Capped score of one dimension with the findings that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: RiskDimension,
    pub score: u8,
    pub max_score: u8,
    pub findings: Vec<String>,
    pub level: RiskTier,
}

impl DimensionScore {
    pub fn percentage(&self) -> f64 {
        f64::from(self.score) / f64::from(self.max_score) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maxima_sum_to_one_hundred() {
        let total: u32 = RiskDimension::ALL
            .iter()
            .map(|d| u32::from(d.max_score()))
            .sum();
        assert_eq!(total, 100);
    }
}
