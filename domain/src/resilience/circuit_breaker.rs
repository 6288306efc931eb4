//! Per-agent circuit breaker
//!
//! A pure state machine: callers pass the current [`Instant`] in, so the
//! transitions can be driven deterministically. The coordinator owns one
//! breaker per registered agent behind its own lock.
//!
//! ```text
//! Closed --(failure_threshold consecutive failures)--> Open
//! Open   --(recovery_timeout elapsed, next call)-----> HalfOpen
//! HalfOpen --(probe success)--> Closed
//! HalfOpen --(probe failure)--> Open
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds for a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open a closed breaker
    pub failure_threshold: u32,
    /// How long an open breaker refuses calls
    pub recovery_timeout: Duration,
    /// Probe calls admitted while half-open
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            half_open_max_calls: 3,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    pub fn with_recovery_timeout(mut self, timeout: Duration) -> Self {
        self.recovery_timeout = timeout;
        self
    }

    pub fn with_half_open_max_calls(mut self, calls: u32) -> Self {
        self.half_open_max_calls = calls.max(1);
        self
    }
}

/// Why a call was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerRejection {
    pub state: BreakerState,
    /// Time until the breaker will admit a probe; zero when the half-open
    /// probe budget is exhausted and the outcome of in-flight probes decides
    pub retry_after: Duration,
}

impl fmt::Display for BreakerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            BreakerState::HalfOpen => write!(f, "circuit breaker half-open, probe limit reached"),
            _ => write!(
                f,
                "circuit breaker open, retry in {}ms",
                self.retry_after.as_millis()
            ),
        }
    }
}

/// Serializable view of a breaker for metrics and health reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub state: BreakerState,
    pub failure_count: u32,
    pub half_open_probes_used: u32,
    /// Milliseconds until an open breaker admits a probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: BreakerState,
    failure_count: u32,
    last_failure_at: Option<Instant>,
    next_attempt_at: Option<Instant>,
    half_open_probes_used: u32,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: BreakerState::Closed,
            failure_count: 0,
            last_failure_at: None,
            next_attempt_at: None,
            half_open_probes_used: 0,
        }
    }

    pub fn state(&self) -> BreakerState {
        self.state
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn last_failure_at(&self) -> Option<Instant> {
        self.last_failure_at
    }

    pub fn next_attempt_at(&self) -> Option<Instant> {
        self.next_attempt_at
    }

    pub fn half_open_probes_used(&self) -> u32 {
        self.half_open_probes_used
    }

    /// Ask permission for one call.
    ///
    /// An open breaker whose recovery timeout has elapsed moves to half-open
    /// here, and the call counts as the first probe.
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), BreakerRejection> {
        if self.state == BreakerState::Open {
            match self.next_attempt_at {
                Some(at) if now < at => {
                    return Err(BreakerRejection {
                        state: BreakerState::Open,
                        retry_after: at - now,
                    });
                }
                _ => {
                    self.state = BreakerState::HalfOpen;
                    self.half_open_probes_used = 0;
                }
            }
        }

        if self.state == BreakerState::HalfOpen {
            if self.half_open_probes_used >= self.config.half_open_max_calls {
                return Err(BreakerRejection {
                    state: BreakerState::HalfOpen,
                    retry_after: Duration::ZERO,
                });
            }
            self.half_open_probes_used += 1;
        }

        Ok(())
    }

    pub fn record_success(&mut self) {
        match self.state {
            BreakerState::Closed => self.failure_count = 0,
            BreakerState::HalfOpen => self.close(),
            // A straggler admitted before the breaker opened; the open window stands.
            BreakerState::Open => {}
        }
    }

    pub fn record_failure(&mut self, now: Instant) {
        self.failure_count = self.failure_count.saturating_add(1);
        self.last_failure_at = Some(now);

        match self.state {
            BreakerState::Closed if self.failure_count >= self.config.failure_threshold => {
                self.open(now)
            }
            BreakerState::HalfOpen => self.open(now),
            _ => {}
        }
    }

    /// Force the breaker back to closed
    pub fn reset(&mut self) {
        self.close();
        self.last_failure_at = None;
    }

    pub fn snapshot(&self, now: Instant) -> BreakerSnapshot {
        let retry_after_ms = match (self.state, self.next_attempt_at) {
            (BreakerState::Open, Some(at)) => {
                Some(at.saturating_duration_since(now).as_millis() as u64)
            }
            _ => None,
        };
        BreakerSnapshot {
            state: self.state,
            failure_count: self.failure_count,
            half_open_probes_used: self.half_open_probes_used,
            retry_after_ms,
        }
    }

    fn open(&mut self, now: Instant) {
        self.state = BreakerState::Open;
        self.next_attempt_at = Some(now + self.config.recovery_timeout);
        self.half_open_probes_used = 0;
    }

    fn close(&mut self) {
        self.state = BreakerState::Closed;
        self.failure_count = 0;
        self.next_attempt_at = None;
        self.half_open_probes_used = 0;
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
