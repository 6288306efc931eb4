//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent;
pub mod event_publisher;
pub mod progress;
pub mod submission_store;
pub mod text_completion;
pub mod triage;
