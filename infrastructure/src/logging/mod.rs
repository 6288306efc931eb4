//! Logging infrastructure: the structured audit trail.
//!
//! Provides [`JsonlAuditLog`], a JSONL file writer that implements
//! the [`EventPublisher`](verdict_application::EventPublisher) port.

mod jsonl_audit_log;

pub use jsonl_audit_log::JsonlAuditLog;
