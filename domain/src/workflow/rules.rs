//! Skip, escalation and confidence rules applied around agent execution

use crate::routing::triage::Classification;
use crate::workflow::definition::WorkflowDefinition;
use crate::workflow::step::{StepOutcome, StepResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Inputs to the sequential skip predicate
#[derive(Debug, Clone, Copy)]
pub struct SkipContext<'a> {
    pub prior: &'a [StepResult],
    pub classification: Option<&'a Classification>,
    /// Number of policy documents supplied with the request
    pub policy_count: usize,
}

/// Reason to skip `agent`, if any.
///
/// A prior `conflict-detection` step counts as having found conflicts
/// when it completed with at least one finding.
pub fn should_skip(agent: &str, ctx: &SkipContext<'_>) -> Option<String> {
    let internal_only = ctx.classification.is_some_and(|c| c.internal_only);
    if matches!(agent, "conflict-detection" | "negotiation") && internal_only && ctx.policy_count < 2
    {
        return Some("internal-only submission with fewer than two policies".to_string());
    }

    if agent == "negotiation" {
        let requires_negotiation = ctx
            .classification
            .is_some_and(|c| c.complexity.requires_negotiation);
        let conflicts_found = ctx.prior.iter().any(|step| {
            step.agent_name == "conflict-detection"
                && step.value().is_some_and(|v| !v.findings.is_empty())
        });
        if !requires_negotiation && !conflicts_found {
            return Some("no conflicts require negotiation".to_string());
        }
    }

    None
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HumanReviewReason {
    WorkflowRequiresHuman { workflow: String },
    AgentRequested { agent: String },
    LowConfidence { agent: String, confidence: f64 },
    AgentFailed { agent: String, error: String },
}

impl fmt::Display for HumanReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumanReviewReason::WorkflowRequiresHuman { workflow } => {
                write!(f, "workflow {} requires human review", workflow)
            }
            HumanReviewReason::AgentRequested { agent } => {
                write!(f, "{} requested human review", agent)
            }
            HumanReviewReason::LowConfidence { agent, confidence } => {
                write!(f, "{} confidence {:.0}% below threshold", agent, confidence * 100.0)
            }
            HumanReviewReason::AgentFailed { agent, error } => {
                write!(f, "{} failed: {}", agent, error)
            }
        }
    }
}

/// Every condition that flags a run for human review
pub fn review_reasons(
    definition: &WorkflowDefinition,
    steps: &[StepResult],
    threshold: f64,
) -> Vec<HumanReviewReason> {
    let mut reasons = Vec::new();
    if definition.requires_human {
        reasons.push(HumanReviewReason::WorkflowRequiresHuman {
            workflow: definition.name.clone(),
        });
    }
    for step in steps {
        match &step.outcome {
            StepOutcome::Completed { value } => {
                if value.requires_human {
                    reasons.push(HumanReviewReason::AgentRequested {
                        agent: step.agent_name.clone(),
                    });
                }
                if let Some(confidence) = value.confidence
                    && confidence < threshold
                {
                    reasons.push(HumanReviewReason::LowConfidence {
                        agent: step.agent_name.clone(),
                        confidence,
                    });
                }
            }
            StepOutcome::Failed { error, .. } => reasons.push(HumanReviewReason::AgentFailed {
                agent: step.agent_name.clone(),
                error: error.clone(),
            }),
            StepOutcome::Skipped { .. } | StepOutcome::NotAttempted { .. } => {}
        }
    }
    reasons
}

/// Mean of the classification confidence and every reported agent
/// confidence; agents without one are excluded. `0.0` when nothing
/// reported.
pub fn overall_confidence(classification: Option<f64>, steps: &[StepResult]) -> f64 {
    let values: Vec<f64> = classification
        .into_iter()
        .chain(steps.iter().filter_map(|s| s.value().and_then(|v| v.confidence)))
        .collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::invocation::{AgentInvocationResult, FailureKind};
    use crate::agent::outcome::AgentOutcome;
    use crate::routing::triage::classify;

    fn completed(name: &str, outcome: AgentOutcome) -> StepResult {
        AgentInvocationResult::success(name, outcome, 1).into()
    }

    #[test]
    fn test_negotiation_skipped_without_conflicts() {
        let classification = classify("ChatGPT copy for Toyota", None);
        let ctx = SkipContext {
            prior: &[],
            classification: Some(&classification),
            policy_count: 0,
        };
        assert!(should_skip("negotiation", &ctx).is_some());
        assert!(should_skip("policy", &ctx).is_none());
        assert!(should_skip("conflict-detection", &ctx).is_none());
    }

    #[test]
    fn test_negotiation_runs_after_conflicts_found() {
        let prior = vec![completed(
            "conflict-detection",
            AgentOutcome::conditional().with_finding("direct contradiction"),
        )];
        let ctx = SkipContext {
            prior: &prior,
            classification: None,
            policy_count: 2,
        };
        assert!(should_skip("negotiation", &ctx).is_none());
    }

    #[test]
    fn test_negotiation_runs_when_classification_requires_it() {
        let classification = classify("Midjourney for Pfizer and Novartis", None);
        let ctx = SkipContext {
            prior: &[],
            classification: Some(&classification),
            policy_count: 0,
        };
        assert!(should_skip("negotiation", &ctx).is_none());
    }

    #[test]
    fn test_internal_only_skips_conflict_agents() {
        let classification = classify("internal team update", None);
        let ctx = SkipContext {
            prior: &[],
            classification: Some(&classification),
            policy_count: 1,
        };
        assert!(should_skip("conflict-detection", &ctx).is_some());
        let ctx = SkipContext {
            policy_count: 2,
            ..ctx
        };
        assert!(should_skip("conflict-detection", &ctx).is_none());
    }

    #[test]
    fn test_review_reasons() {
        let def = WorkflowDefinition::sequential("w", &["a", "b", "c", "d"]).requiring_human();
        let steps = vec![
            completed("a", AgentOutcome::approved().with_confidence(0.9)),
            completed("b", AgentOutcome::approved().with_confidence(0.5)),
            completed("c", AgentOutcome::conditional().requiring_human()),
            AgentInvocationResult::failure("d", FailureKind::Error, "boom", 1).into(),
        ];
        let reasons = review_reasons(&def, &steps, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(reasons.len(), 4);
        assert!(matches!(reasons[0], HumanReviewReason::WorkflowRequiresHuman { .. }));
        assert!(matches!(reasons[1], HumanReviewReason::LowConfidence { .. }));
        assert!(matches!(reasons[2], HumanReviewReason::AgentRequested { .. }));
        assert_eq!(reasons[3].to_string(), "d failed: boom");
    }

    #[test]
    fn test_overall_confidence_excludes_unreported() {
        let steps = vec![
            completed("a", AgentOutcome::approved().with_confidence(0.9)),
            completed("b", AgentOutcome::informational()),
            StepResult::skipped("c", "skip"),
        ];
        let confidence = overall_confidence(Some(0.7), &steps);
        assert!((confidence - 0.8).abs() < 1e-9);
        assert_eq!(overall_confidence(None, &[]), 0.0);
    }
}
