//! Port for publishing workflow lifecycle events.
//!
//! Delivery is best-effort and fire-and-forget: `publish` is synchronous
//! and non-fallible so that observers can never disturb the engine.

use verdict_domain::WorkflowEvent;

pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: WorkflowEvent);
}

/// No-op implementation for tests and when nobody listens.
pub struct NoEventPublisher;

impl EventPublisher for NoEventPublisher {
    fn publish(&self, _event: WorkflowEvent) {}
}
