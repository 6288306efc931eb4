//! Multi-client relationship mapping and negotiation

pub mod directory;
pub mod outcome;
pub mod tool;

pub use directory::{Industry, Relationship, detect_industry, discover_clients, relationship};
pub use outcome::{
    ClientAnalysis, CompromiseSolution, Feasibility, NegotiationConflict, NegotiationConflictKind,
    NegotiationOutcome, NegotiationRisk, NegotiationStatus, RelationshipMap, negotiate,
};
pub use tool::{ToolInfo, ToolKind, detect_tool, mentions_high_risk_tool};
