//! Agent value objects: requests, outcomes, registry descriptors and
//! invocation results.

pub mod descriptor;
pub mod invocation;
pub mod outcome;
pub mod request;

pub use descriptor::{AgentDescriptor, AgentHealth};
pub use invocation::{AgentInvocationResult, FailureKind, InvocationOutcome};
pub use outcome::{AgentOutcome, DecisionLabel};
pub use request::{AgentFeedback, AgentRequest};
