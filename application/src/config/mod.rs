//! Application configuration
//!
//! Parameter types consumed by the coordinator and the workflow engine.
//! File and environment loading lives in the infrastructure layer.

pub mod coordinator_params;
pub mod workflow_params;

pub use coordinator_params::CoordinatorParams;
pub use workflow_params::WorkflowParams;
