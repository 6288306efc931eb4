//! Cross-agent decision synthesis

pub mod decision;
pub mod parsing;
pub mod vote;

pub use decision::{
    AgentCounts, ESCALATION_CONFIDENCE, FinalDecision, SynthesisMetadata, SynthesizedDecision,
    synthesize,
};
pub use parsing::{embedded_record, parse_confidence, parse_decision_text};
pub use vote::{AgentVote, DEFAULT_VOTE_CONFIDENCE, VoteTally};
