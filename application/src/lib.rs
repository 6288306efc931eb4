//! Application layer for verdict
//!
//! This crate contains the coordinator, the workflow use case, port
//! definitions and application configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod coordinator;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CoordinatorParams, WorkflowParams};
pub use coordinator::{
    Coordinator, CoordinatorError,
    cache::TtlCache,
    metrics::{AgentHealthReport, CoordinatorMetrics},
};
pub use ports::{
    agent::{Agent, AgentError},
    event_publisher::{EventPublisher, NoEventPublisher},
    progress::{NoProgress, WorkflowProgress},
    submission_store::{StoreError, SubmissionStore},
    text_completion::{CompletionError, CompletionOptions, TextCompletion},
    triage::{ClassifierError, TriageClassifier},
};
pub use use_cases::execute_workflow::{
    ExecuteWorkflowError, ExecuteWorkflowInput, ExecuteWorkflowUseCase,
};
