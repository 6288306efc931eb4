//! Failure isolation primitives

pub mod circuit_breaker;

pub use circuit_breaker::{
    BreakerRejection, BreakerSnapshot, BreakerState, CircuitBreaker, CircuitBreakerConfig,
};
