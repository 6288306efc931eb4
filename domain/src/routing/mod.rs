//! Request routing: complexity signals and workflow recommendation

pub mod complexity;
pub mod triage;

pub use complexity::{ComplexityLevel, RequestComplexity};
pub use triage::{
    Classification, DEFAULT_CLASSIFICATION_CONFIDENCE, PresentationType, classify,
    recommend_workflow, workflow_for_type,
};
