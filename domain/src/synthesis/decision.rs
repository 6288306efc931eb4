//! Weighted decision synthesis
//!
//! Merges the settled invocation results of one coordination call into a
//! single [`SynthesizedDecision`]. Precedence, in order:
//!
//! 1. any failed invocation → [`FinalDecision::HumanInLoop`]
//! 2. rejection weight > approval weight → [`FinalDecision::Rejected`]
//! 3. conditional weight > half the approval weight → [`FinalDecision::Conditional`]
//! 4. otherwise → [`FinalDecision::Approved`]
//!
//! A failed agent outranks any vote margin: the aggregate is untrustworthy
//! while an agent is unavailable.

use crate::agent::invocation::AgentInvocationResult;
use crate::agent::outcome::DecisionLabel;
use crate::synthesis::vote::{AgentVote, DEFAULT_VOTE_CONFIDENCE, VoteTally};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence reported when the decision is escalated without a usable vote margin
pub const ESCALATION_CONFIDENCE: f64 = 0.6;

/// Weight each failed agent contributes to the human-in-the-loop bucket
pub const HUMAN_LOOP_WEIGHT_PER_FAILURE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalDecision {
    Approved,
    Rejected,
    Conditional,
    HumanInLoop,
}

impl FinalDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalDecision::Approved => "approved",
            FinalDecision::Rejected => "rejected",
            FinalDecision::Conditional => "conditional",
            FinalDecision::HumanInLoop => "human_in_loop",
        }
    }

    pub fn recommended_actions(&self) -> Vec<String> {
        let actions: &[&str] = match self {
            FinalDecision::Approved => &["Proceed with request", "Monitor implementation"],
            FinalDecision::Rejected => &[
                "Request denied",
                "Provide alternative solutions",
                "Review rejection reasons with stakeholders",
            ],
            FinalDecision::Conditional => &[
                "Implement required conditions",
                "Schedule follow-up review",
                "Monitor compliance with conditions",
            ],
            FinalDecision::HumanInLoop => &[
                "Escalate to human reviewer",
                "Gather additional context",
                "Resolve agent failures",
            ],
        };
        actions.iter().map(|a| a.to_string()).collect()
    }
}

impl fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCounts {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisMetadata {
    pub approval_weight: f64,
    pub rejection_weight: f64,
    pub conditional_weight: f64,
    pub human_loop_weight: f64,
    pub failed_agents: Vec<String>,
}

/// The governed outcome of one coordination call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedDecision {
    pub final_decision: FinalDecision,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub reasoning: String,
    /// Which agents pushed toward which outcome
    pub synthesized_rationale: String,
    pub recommended_actions: Vec<String>,
    pub agent_counts: AgentCounts,
    pub metadata: SynthesisMetadata,
    pub votes: Vec<AgentVote>,
    /// Epoch millis at synthesis time
    pub decided_at: u64,
}

impl SynthesizedDecision {
    pub fn requires_human(&self) -> bool {
        self.final_decision == FinalDecision::HumanInLoop
    }
}

/// Synthesize one decision from settled invocation results.
///
/// `weight_of` maps an agent name to its registry weight.
pub fn synthesize(
    results: &[AgentInvocationResult],
    weight_of: impl Fn(&str) -> f64,
    decided_at: u64,
) -> SynthesizedDecision {
    let votes: Vec<AgentVote> = results
        .iter()
        .filter_map(|result| {
            let outcome = result.value()?;
            outcome.decision.is_vote().then(|| {
                AgentVote::new(&result.agent_name, outcome.decision)
                    .with_confidence(outcome.confidence.unwrap_or(DEFAULT_VOTE_CONFIDENCE))
                    .with_weight(weight_of(&result.agent_name))
            })
        })
        .collect();

    let failed_agents: Vec<String> = results
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.agent_name.clone())
        .collect();

    let tally = VoteTally::from_votes(&votes);
    let human_loop_weight = HUMAN_LOOP_WEIGHT_PER_FAILURE * failed_agents.len() as f64;

    let (final_decision, confidence, reasoning) = if !failed_agents.is_empty() {
        (
            FinalDecision::HumanInLoop,
            ESCALATION_CONFIDENCE,
            format!(
                "Agent failures forced escalation: {} of {} agents failed ({})",
                failed_agents.len(),
                results.len(),
                failed_agents.join(", ")
            ),
        )
    } else if votes.is_empty() {
        (
            FinalDecision::HumanInLoop,
            ESCALATION_CONFIDENCE,
            "No agent produced a usable vote; escalating to human review".to_string(),
        )
    } else {
        let (decision, winning) = if tally.rejection > tally.approval {
            (FinalDecision::Rejected, tally.rejection)
        } else if tally.conditional > 0.5 * tally.approval {
            (FinalDecision::Conditional, tally.conditional)
        } else {
            (FinalDecision::Approved, tally.approval)
        };
        let total = tally.total();
        let confidence = if total > 0.0 {
            (winning / total).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (
            decision,
            confidence,
            format!(
                "Weighted votes: approval {:.2}, rejection {:.2}, conditional {:.2}; decided {}",
                tally.approval, tally.rejection, tally.conditional, decision
            ),
        )
    };

    SynthesizedDecision {
        final_decision,
        confidence,
        reasoning,
        synthesized_rationale: rationale(&votes, &failed_agents),
        recommended_actions: final_decision.recommended_actions(),
        agent_counts: AgentCounts {
            successful: results.len() - failed_agents.len(),
            failed: failed_agents.len(),
            total: results.len(),
        },
        metadata: SynthesisMetadata {
            approval_weight: tally.approval,
            rejection_weight: tally.rejection,
            conditional_weight: tally.conditional,
            human_loop_weight,
            failed_agents,
        },
        votes,
        decided_at,
    }
}

fn rationale(votes: &[AgentVote], failed_agents: &[String]) -> String {
    let names = |label: DecisionLabel| {
        votes
            .iter()
            .filter(|v| v.decision == label)
            .map(|v| v.agent_name.as_str())
            .collect::<Vec<_>>()
    };

    let mut parts = Vec::new();
    for (prefix, agents) in [
        ("Approved by", names(DecisionLabel::Approved)),
        ("Rejected by", names(DecisionLabel::Rejected)),
        ("Conditions from", names(DecisionLabel::Conditional)),
    ] {
        if !agents.is_empty() {
            parts.push(format!("{}: {}", prefix, agents.join(", ")));
        }
    }
    if !failed_agents.is_empty() {
        parts.push(format!("Failed: {}", failed_agents.join(", ")));
    }

    if parts.is_empty() {
        "No agent rationale available".to_string()
    } else {
        parts.join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::invocation::FailureKind;
    use crate::agent::outcome::AgentOutcome;

    fn vote(agent: &str, outcome: AgentOutcome) -> AgentInvocationResult {
        AgentInvocationResult::success(agent, outcome, 5)
    }

    fn unit_weight(_: &str) -> f64 {
        1.0
    }

    #[test]
    fn test_unanimous_approval() {
        let results = vec![
            vote("a", AgentOutcome::approved().with_confidence(0.9)),
            vote("b", AgentOutcome::approved().with_confidence(0.7)),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::Approved);
        assert!((decision.confidence - 1.0).abs() < 1e-9);
        assert_eq!(decision.agent_counts.successful, 2);
        assert_eq!(
            decision.recommended_actions,
            vec!["Proceed with request", "Monitor implementation"]
        );
    }

    #[test]
    fn test_failure_outranks_unanimous_approval() {
        let results = vec![
            vote("a", AgentOutcome::approved().with_confidence(1.0)),
            vote("b", AgentOutcome::approved().with_confidence(1.0)),
            vote("c", AgentOutcome::approved().with_confidence(1.0)),
            AgentInvocationResult::failure("d", FailureKind::Timeout, "deadline exceeded", 10_000),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::HumanInLoop);
        assert_eq!(decision.confidence, ESCALATION_CONFIDENCE);
        assert!(decision.reasoning.contains("Agent failures forced escalation"));
        assert_eq!(decision.metadata.failed_agents, vec!["d".to_string()]);
        assert!((decision.metadata.human_loop_weight - 0.2).abs() < 1e-9);
        assert!((decision.metadata.approval_weight - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejection_beats_approval() {
        let results = vec![
            vote("a", AgentOutcome::approved().with_confidence(0.6)),
            vote("b", AgentOutcome::rejected().with_confidence(0.8)),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::Rejected);
        assert!((decision.confidence - 0.8 / 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_tie_between_rejection_and_approval_is_not_rejected() {
        let results = vec![
            vote("a", AgentOutcome::approved().with_confidence(0.8)),
            vote("b", AgentOutcome::rejected().with_confidence(0.8)),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::Approved);
    }

    #[test]
    fn test_conditional_over_half_approval() {
        let results = vec![
            vote("a", AgentOutcome::approved().with_confidence(0.8)),
            vote("b", AgentOutcome::conditional().with_confidence(0.5)),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::Conditional);
        assert!((decision.confidence - 0.5 / 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_conditional_below_half_approval_is_approved() {
        let results = vec![
            vote("a", AgentOutcome::approved().with_confidence(1.0)),
            vote("b", AgentOutcome::conditional().with_confidence(0.4)),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::Approved);
    }

    #[test]
    fn test_weights_shift_outcome() {
        let results = vec![
            vote("light", AgentOutcome::approved().with_confidence(0.9)),
            vote("heavy", AgentOutcome::rejected().with_confidence(0.6)),
        ];
        let weights = |name: &str| if name == "heavy" { 2.0 } else { 1.0 };
        let decision = synthesize(&results, weights, 0);
        assert_eq!(decision.final_decision, FinalDecision::Rejected);
        assert!((decision.metadata.rejection_weight - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_confidence_uses_default() {
        let results = vec![vote("a", AgentOutcome::rejected())];
        let decision = synthesize(&results, unit_weight, 0);
        assert!((decision.metadata.rejection_weight - DEFAULT_VOTE_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_no_usable_votes_escalates() {
        let results = vec![vote("context", AgentOutcome::informational())];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(decision.final_decision, FinalDecision::HumanInLoop);
        assert_eq!(decision.confidence, ESCALATION_CONFIDENCE);
        assert!(decision.votes.is_empty());
    }

    #[test]
    fn test_synthesis_is_order_independent() {
        let a = vote("a", AgentOutcome::approved().with_confidence(0.7));
        let b = vote("b", AgentOutcome::conditional().with_confidence(0.6));
        let c = vote("c", AgentOutcome::rejected().with_confidence(0.3));

        let forward = synthesize(&[a.clone(), b.clone(), c.clone()], unit_weight, 0);
        let reverse = synthesize(&[c, b, a], unit_weight, 0);
        assert_eq!(forward.final_decision, reverse.final_decision);
        assert!((forward.confidence - reverse.confidence).abs() < 1e-9);
    }

    #[test]
    fn test_rationale_lists_agents() {
        let results = vec![
            vote("policy", AgentOutcome::approved()),
            vote("negotiation", AgentOutcome::conditional()),
            AgentInvocationResult::failure("audit", FailureKind::Error, "boom", 1),
        ];
        let decision = synthesize(&results, unit_weight, 0);
        assert_eq!(
            decision.synthesized_rationale,
            "Approved by: policy. Conditions from: negotiation. Failed: audit"
        );
    }
}
