//! Resolution strategy selection for a conflict assessment

use crate::conflict::detection::ConflictAssessment;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    AutomatedResolution,
    GuidedResolution,
    ExpertMediation,
}

impl ResolutionStrategy {
    /// `<= 0.3` automated, `<= 0.7` guided, otherwise expert mediation
    pub fn for_average_severity(average: f64) -> Self {
        if average <= 0.3 {
            ResolutionStrategy::AutomatedResolution
        } else if average <= 0.7 {
            ResolutionStrategy::GuidedResolution
        } else {
            ResolutionStrategy::ExpertMediation
        }
    }

    pub fn requires_human_review(&self) -> bool {
        !matches!(self, ResolutionStrategy::AutomatedResolution)
    }

    pub fn estimated_time(&self) -> &'static str {
        match self {
            ResolutionStrategy::AutomatedResolution => "1-2 hours",
            ResolutionStrategy::GuidedResolution => "1-2 days",
            ResolutionStrategy::ExpertMediation => "1-2 weeks",
        }
    }

    pub fn reasoning(&self) -> &'static str {
        match self {
            ResolutionStrategy::AutomatedResolution => {
                "Low severity conflicts can be resolved automatically"
            }
            ResolutionStrategy::GuidedResolution => {
                "Medium severity conflicts require guided human resolution"
            }
            ResolutionStrategy::ExpertMediation => {
                "High severity conflicts require expert mediation"
            }
        }
    }

    pub fn immediate_actions(&self) -> &'static [&'static str] {
        match self {
            ResolutionStrategy::AutomatedResolution => &[
                "Apply automated conflict resolution rules",
                "Update policy language for clarity",
                "Merge compatible requirements",
            ],
            ResolutionStrategy::GuidedResolution => &[
                "Schedule stakeholder review meeting",
                "Prepare conflict analysis documentation",
                "Identify subject matter experts",
            ],
            ResolutionStrategy::ExpertMediation => &[
                "Escalate to senior management",
                "Engage external mediation resources",
                "Suspend conflicting policies pending resolution",
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::AutomatedResolution => "automated_resolution",
            ResolutionStrategy::GuidedResolution => "guided_resolution",
            ResolutionStrategy::ExpertMediation => "expert_mediation",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution plan derived from an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    pub strategy: ResolutionStrategy,
    pub requires_human_review: bool,
    pub estimated_time: String,
    pub reasoning: String,
    pub immediate_actions: Vec<String>,
    pub short_term_solutions: Vec<String>,
    pub long_term_improvements: Vec<String>,
}

impl ResolutionPlan {
    pub fn for_assessment(assessment: &ConflictAssessment) -> Self {
        let strategy = ResolutionStrategy::for_average_severity(assessment.average_severity);
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            strategy,
            requires_human_review: strategy.requires_human_review(),
            estimated_time: strategy.estimated_time().to_string(),
            reasoning: strategy.reasoning().to_string(),
            immediate_actions: owned(strategy.immediate_actions()),
            short_term_solutions: owned(&[
                "Create interim policy guidelines",
                "Establish conflict resolution process",
                "Train staff on updated procedures",
            ]),
            long_term_improvements: owned(&[
                "Implement policy versioning system",
                "Create automated conflict detection",
                "Establish regular policy review cycles",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::detection::{PolicyDocument, detect_conflicts};

    #[test]
    fn test_strategy_thresholds() {
        assert_eq!(
            ResolutionStrategy::for_average_severity(0.0),
            ResolutionStrategy::AutomatedResolution
        );
        assert_eq!(
            ResolutionStrategy::for_average_severity(0.3),
            ResolutionStrategy::AutomatedResolution
        );
        assert_eq!(
            ResolutionStrategy::for_average_severity(0.7),
            ResolutionStrategy::GuidedResolution
        );
        assert_eq!(
            ResolutionStrategy::for_average_severity(0.9),
            ResolutionStrategy::ExpertMediation
        );
    }

    #[test]
    fn test_plan_for_contradiction_needs_mediation() {
        let assessment = detect_conflicts(&[
            PolicyDocument::new("a", "A", "Watermarks are mandatory"),
            PolicyDocument::new("b", "B", "Watermarks are forbidden"),
        ]);
        let plan = ResolutionPlan::for_assessment(&assessment);
        assert_eq!(plan.strategy, ResolutionStrategy::ExpertMediation);
        assert!(plan.requires_human_review);
        assert_eq!(plan.estimated_time, "1-2 weeks");
    }

    #[test]
    fn test_plan_without_conflicts_is_automated() {
        let plan = ResolutionPlan::for_assessment(&detect_conflicts(&[]));
        assert_eq!(plan.strategy, ResolutionStrategy::AutomatedResolution);
        assert!(!plan.requires_human_review);
    }
}
