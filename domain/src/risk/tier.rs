//! Risk tiers and tier-keyed policy tables

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Five contiguous tiers over the aggregate score `[0, 100]`
///
/// Ordering follows severity: `Minimal < Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub const ALL: [RiskTier; 5] = [
        RiskTier::Minimal,
        RiskTier::Low,
        RiskTier::Medium,
        RiskTier::High,
        RiskTier::Critical,
    ];

    /// Tier for an aggregate score. Scores above 100 are treated as 100.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => RiskTier::Minimal,
            21..=40 => RiskTier::Low,
            41..=60 => RiskTier::Medium,
            61..=80 => RiskTier::High,
            _ => RiskTier::Critical,
        }
    }

    /// Level for a dimension score expressed as a percentage of its maximum
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            RiskTier::Critical
        } else if percentage >= 60.0 {
            RiskTier::High
        } else if percentage >= 40.0 {
            RiskTier::Medium
        } else if percentage >= 20.0 {
            RiskTier::Low
        } else {
            RiskTier::Minimal
        }
    }

    /// Inclusive score band
    pub fn band(&self) -> (u8, u8) {
        match self {
            RiskTier::Minimal => (0, 20),
            RiskTier::Low => (21, 40),
            RiskTier::Medium => (41, 60),
            RiskTier::High => (61, 80),
            RiskTier::Critical => (81, 100),
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            RiskTier::Minimal => 0.5,
            RiskTier::Low => 0.75,
            RiskTier::Medium => 1.0,
            RiskTier::High => 1.5,
            RiskTier::Critical => 2.0,
        }
    }

    pub fn audit_frequency(&self) -> AuditFrequency {
        match self {
            RiskTier::Minimal => AuditFrequency::Annual,
            RiskTier::Low => AuditFrequency::SemiAnnual,
            RiskTier::Medium => AuditFrequency::Quarterly,
            RiskTier::High => AuditFrequency::Monthly,
            RiskTier::Critical => AuditFrequency::Continuous,
        }
    }

    /// Controls required by the tier itself
    pub fn controls(&self) -> &'static [&'static str] {
        match self {
            RiskTier::Minimal => &[],
            RiskTier::Low => &["quarterly_review", "basic_monitoring"],
            RiskTier::Medium => &["content_review", "periodic_spot_checks", "user_feedback_loops"],
            RiskTier::High => &[
                "enhanced_monitoring",
                "periodic_audits",
                "bias_detection",
                "escalation_protocols",
            ],
            RiskTier::Critical => &[
                "full_model_audit",
                "continuous_monitoring",
                "human_in_the_loop",
                "regular_bias_testing",
            ],
        }
    }

    pub fn is_elevated(&self) -> bool {
        *self >= RiskTier::High
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Minimal => "minimal",
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(RiskTier::Minimal),
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            "critical" => Ok(RiskTier::Critical),
            _ => Err(DomainError::UnknownTier(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditFrequency {
    Continuous,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl fmt::Display for AuditFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AuditFrequency::Continuous => "continuous",
            AuditFrequency::Monthly => "monthly",
            AuditFrequency::Quarterly => "quarterly",
            AuditFrequency::SemiAnnual => "semi-annual",
            AuditFrequency::Annual => "annual",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Minimal);
        assert_eq!(RiskTier::from_score(20), RiskTier::Minimal);
        assert_eq!(RiskTier::from_score(21), RiskTier::Low);
        assert_eq!(RiskTier::from_score(40), RiskTier::Low);
        assert_eq!(RiskTier::from_score(41), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(60), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(61), RiskTier::High);
        assert_eq!(RiskTier::from_score(80), RiskTier::High);
        assert_eq!(RiskTier::from_score(81), RiskTier::Critical);
        assert_eq!(RiskTier::from_score(100), RiskTier::Critical);
    }

    #[test]
    fn test_monotonic_over_full_range() {
        for s in 0..100u8 {
            assert!(RiskTier::from_score(s) <= RiskTier::from_score(s + 1));
        }
    }

    #[test]
    fn test_bands_are_contiguous() {
        let mut expected_min = 0u8;
        for tier in RiskTier::ALL {
            let (min, max) = tier.band();
            assert_eq!(min, expected_min);
            assert_eq!(RiskTier::from_score(min), tier);
            assert_eq!(RiskTier::from_score(max), tier);
            expected_min = max.saturating_add(1);
        }
        assert_eq!(RiskTier::Critical.band().1, 100);
    }

    #[test]
    fn test_multipliers_and_frequencies() {
        assert_eq!(RiskTier::Minimal.multiplier(), 0.5);
        assert_eq!(RiskTier::Critical.multiplier(), 2.0);
        assert_eq!(RiskTier::High.audit_frequency(), AuditFrequency::Monthly);
        assert_eq!(RiskTier::Low.audit_frequency().to_string(), "semi-annual");
    }

    #[test]
    fn test_from_percentage() {
        assert_eq!(RiskTier::from_percentage(100.0), RiskTier::Critical);
        assert_eq!(RiskTier::from_percentage(60.0), RiskTier::High);
        assert_eq!(RiskTier::from_percentage(19.9), RiskTier::Minimal);
    }

    #[test]
    fn test_parse() {
        assert_eq!("HIGH".parse::<RiskTier>(), Ok(RiskTier::High));
        assert!("extreme".parse::<RiskTier>().is_err());
    }
}
