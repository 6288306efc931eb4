//! Workflow catalog and the pure rules of the workflow engine

pub mod catalog;
pub mod definition;
pub mod rules;
pub mod step;
pub mod summary;

pub use catalog::{DEFAULT_WORKFLOW, WorkflowCatalog};
pub use definition::WorkflowDefinition;
pub use rules::{
    DEFAULT_CONFIDENCE_THRESHOLD, HumanReviewReason, SkipContext, overall_confidence,
    review_reasons, should_skip,
};
pub use step::{NOT_REGISTERED_REASON, StepOutcome, StepResult};
pub use summary::{WorkflowOutput, WorkflowStatus, WorkflowSummary};
