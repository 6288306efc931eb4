//! Domain layer for verdict
//!
//! Pure value types and algorithms of the agent orchestration engine.
//! Nothing here performs I/O or depends on an async runtime.
//!
//! # Core Concepts
//!
//! ## Agents and outcomes
//!
//! Every decision-making unit returns an [`AgentOutcome`]: a normalized
//! vote plus confidence, blockers and findings. The coordinator wraps each
//! call into an [`AgentInvocationResult`].
//!
//! ## Synthesis
//!
//! [`synthesize`] merges concurrent results into one
//! [`SynthesizedDecision`] by weighted voting. Any failed agent forces a
//! human-in-the-loop decision.
//!
//! ## Scoring
//!
//! - **Risk tiering**: six capped dimensions summed into a 0-100 score
//! - **Conflict detection**: all-pairs comparison of policy documents
//! - **Negotiation**: client relationship mapping and compromise planning
//!
//! ## Workflows
//!
//! A [`WorkflowCatalog`] maps names to agent lists. The pure rules for
//! skipping, escalation and summaries live in [`workflow`].

pub mod agent;
pub mod conflict;
pub mod core;
pub mod event;
pub mod negotiation;
pub mod resilience;
pub mod risk;
pub mod routing;
pub mod synthesis;
pub mod workflow;

pub use agent::{
    AgentDescriptor, AgentFeedback, AgentHealth, AgentInvocationResult, AgentOutcome,
    AgentRequest, DecisionLabel, FailureKind, InvocationOutcome,
};
pub use conflict::{
    ConflictAssessment, ConflictRecord, ConflictType, PolicyDocument, ResolutionPlan,
    ResolutionStrategy, SeverityLevel, detect_conflicts,
};
pub use core::error::DomainError;
pub use event::{EventKind, WorkflowEvent};
pub use negotiation::{NegotiationOutcome, NegotiationStatus, negotiate};
pub use resilience::{BreakerRejection, BreakerSnapshot, BreakerState, CircuitBreaker, CircuitBreakerConfig};
pub use risk::{RiskAssessment, RiskDimension, RiskTier, UsageProfile, assess};
pub use routing::{Classification, RequestComplexity, classify};
pub use synthesis::{
    FinalDecision, SynthesizedDecision, embedded_record, parse_confidence, parse_decision_text,
    synthesize,
};
pub use workflow::{
    HumanReviewReason, StepOutcome, StepResult, WorkflowCatalog, WorkflowDefinition,
    WorkflowOutput, WorkflowStatus, WorkflowSummary,
};
