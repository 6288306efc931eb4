//! Weighted votes and bucket tallies

use crate::agent::outcome::DecisionLabel;
use serde::{Deserialize, Serialize};

/// Confidence assumed for agents that vote without reporting one
pub const DEFAULT_VOTE_CONFIDENCE: f64 = 0.5;

/// A single weighted vote from an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentVote {
    pub agent_name: String,
    pub decision: DecisionLabel,
    pub confidence: f64,
    /// Registry weight of the agent
    pub weight: f64,
}

impl AgentVote {
    pub fn new(agent_name: impl Into<String>, decision: DecisionLabel) -> Self {
        Self {
            agent_name: agent_name.into(),
            decision,
            confidence: DEFAULT_VOTE_CONFIDENCE,
            weight: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn weighted_score(&self) -> f64 {
        self.confidence * self.weight
    }
}

/// Summed weighted scores per decision bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approval: f64,
    pub rejection: f64,
    pub conditional: f64,
}

impl VoteTally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a AgentVote>) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            tally.add(vote);
        }
        tally
    }

    pub fn add(&mut self, vote: &AgentVote) {
        let score = vote.weighted_score();
        match vote.decision {
            DecisionLabel::Approved => self.approval += score,
            DecisionLabel::Rejected => self.rejection += score,
            DecisionLabel::Conditional => self.conditional += score,
            DecisionLabel::Unknown => {}
        }
    }

    pub fn total(&self) -> f64 {
        self.approval + self.rejection + self.conditional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score() {
        let vote = AgentVote::new("policy", DecisionLabel::Approved)
            .with_confidence(0.8)
            .with_weight(2.0);
        assert!((vote.weighted_score() - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_default_confidence() {
        let vote = AgentVote::new("policy", DecisionLabel::Approved);
        assert_eq!(vote.confidence, DEFAULT_VOTE_CONFIDENCE);
    }

    #[test]
    fn test_tally_buckets() {
        let votes = vec![
            AgentVote::new("a", DecisionLabel::Approved).with_confidence(0.9),
            AgentVote::new("b", DecisionLabel::Rejected).with_confidence(0.4),
            AgentVote::new("c", DecisionLabel::Conditional).with_confidence(0.5),
            AgentVote::new("d", DecisionLabel::Unknown).with_confidence(1.0),
        ];
        let tally = VoteTally::from_votes(&votes);
        assert!((tally.approval - 0.9).abs() < 1e-9);
        assert!((tally.rejection - 0.4).abs() < 1e-9);
        assert!((tally.conditional - 0.5).abs() < 1e-9);
        assert!((tally.total() - 1.8).abs() < 1e-9);
    }
}
