//! Policy conflict detection and resolution planning

pub mod detection;
pub mod resolution;

pub use detection::{
    ConflictAssessment, ConflictRecord, ConflictType, PolicyDocument, SeverityLevel,
    compare_pair, detect_conflicts,
};
pub use resolution::{ResolutionPlan, ResolutionStrategy};
