//! Infrastructure layer for verdict
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, the built-in
//! agents, event delivery, the JSONL audit trail, submission storage and
//! triage.

pub mod agents;
pub mod config;
pub mod events;
pub mod logging;
pub mod store;
pub mod triage;

// Re-export commonly used types
pub use agents::{register_default_agents, request_text};
pub use config::{ConfigIssue, ConfigLoader, FileConfig};
pub use events::BroadcastEventBus;
pub use logging::JsonlAuditLog;
pub use store::InMemorySubmissionStore;
pub use triage::KeywordTriageClassifier;
