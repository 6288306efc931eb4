//! Resilient agent coordinator
//!
//! Owns the agent registry, one circuit breaker per agent and the cache of
//! synthesized decisions. Every agent call runs in its own task and races
//! a deadline. A timed-out task is detached; only this call path mutates
//! the registry, breakers and cache.

pub mod cache;
pub mod metrics;

use crate::config::CoordinatorParams;
use crate::ports::agent::Agent;
use crate::ports::event_publisher::{EventPublisher, NoEventPublisher};
use cache::TtlCache;
use futures::future::join_all;
use metrics::{AgentHealthReport, CoordinatorMetrics, CoordinatorStats};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use verdict_domain::core::time::now_millis;
use verdict_domain::{
    AgentDescriptor, AgentFeedback, AgentInvocationResult, AgentRequest, CircuitBreaker,
    FailureKind, SynthesizedDecision, WorkflowEvent, synthesize,
};

/// Fatal coordination errors. Agent failures never surface here.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Request batch is empty")]
    EmptyBatch,

    #[error("Agent not registered: {0}")]
    UnknownAgent(String),

    #[error("Failed to derive cache key: {0}")]
    CacheKey(#[from] serde_json::Error),
}

struct AgentSlot {
    agent: Arc<dyn Agent>,
    descriptor: Mutex<AgentDescriptor>,
    breaker: Mutex<CircuitBreaker>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Coordinator {
    params: CoordinatorParams,
    registry: RwLock<HashMap<String, Arc<AgentSlot>>>,
    cache: TtlCache<SynthesizedDecision>,
    stats: Mutex<CoordinatorStats>,
    publisher: Arc<dyn EventPublisher>,
    shutdown: CancellationToken,
}

impl Coordinator {
    pub fn new(params: CoordinatorParams) -> Self {
        Self {
            cache: TtlCache::new(params.cache_ttl, params.cache_max_entries),
            params,
            registry: RwLock::new(HashMap::new()),
            stats: Mutex::new(CoordinatorStats::default()),
            publisher: Arc::new(NoEventPublisher),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn params(&self) -> &CoordinatorParams {
        &self.params
    }

    // ==================== Registry ====================

    /// Register `agent` under `name`.
    ///
    /// Re-registering a name replaces the agent and starts a fresh breaker.
    pub fn register_agent(
        &self,
        name: impl Into<String>,
        agent: Arc<dyn Agent>,
        weight: f64,
        dependencies: Vec<String>,
    ) {
        let name = name.into();
        let descriptor = AgentDescriptor::new(name.clone())
            .with_weight(weight)
            .with_dependencies(dependencies);
        let slot = Arc::new(AgentSlot {
            agent,
            descriptor: Mutex::new(descriptor),
            breaker: Mutex::new(CircuitBreaker::new(self.params.breaker)),
        });
        debug!("Registered agent {}", name);
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, slot);
    }

    fn slot(&self, name: &str) -> Option<Arc<AgentSlot>> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// Registered agent names, sorted
    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn descriptor(&self, name: &str) -> Option<AgentDescriptor> {
        self.slot(name).map(|slot| lock(&slot.descriptor).clone())
    }

    fn weight_of(&self, name: &str) -> f64 {
        self.descriptor(name)
            .map(|d| d.weight)
            .unwrap_or(AgentDescriptor::DEFAULT_WEIGHT)
    }

    // ==================== Invocation ====================

    /// Call one agent behind its breaker and deadline.
    ///
    /// Never fails: every problem is reported as a failed invocation.
    pub async fn invoke(&self, request: &AgentRequest) -> AgentInvocationResult {
        let name = request.agent_name.as_str();
        let Some(slot) = self.slot(name) else {
            return AgentInvocationResult::failure(
                name,
                FailureKind::NotRegistered,
                format!("agent {} is not registered", name),
                0,
            );
        };

        let started = Instant::now();
        let admitted = lock(&slot.breaker).try_acquire(started);
        if let Err(rejection) = admitted {
            warn!("Circuit breaker rejected call to {}: {}", name, rejection);
            lock(&self.stats).breaker_rejections += 1;
            return AgentInvocationResult::failure(
                name,
                FailureKind::BreakerOpen,
                rejection.to_string(),
                0,
            );
        }

        let agent = Arc::clone(&slot.agent);
        let input = request.input.clone();
        let context = request.context.clone();
        let handle = tokio::spawn(async move { agent.process(&input, &context).await });

        let settled = tokio::time::timeout(self.params.invocation_timeout, handle).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let result = match settled {
            Ok(Ok(Ok(outcome))) => AgentInvocationResult::success(name, outcome, elapsed_ms),
            Ok(Ok(Err(e))) => {
                AgentInvocationResult::failure(name, FailureKind::Error, e.to_string(), elapsed_ms)
            }
            Ok(Err(join_error)) => AgentInvocationResult::failure(
                name,
                FailureKind::Panicked,
                join_error.to_string(),
                elapsed_ms,
            ),
            // Dropping the handle detaches the task
            Err(_) => AgentInvocationResult::failure(
                name,
                FailureKind::Timeout,
                format!(
                    "timed out after {}ms",
                    self.params.invocation_timeout.as_millis()
                ),
                elapsed_ms,
            ),
        };

        self.record(&slot, &result);
        result
    }

    fn record(&self, slot: &AgentSlot, result: &AgentInvocationResult) {
        let at = now_millis();
        if result.is_success() {
            lock(&slot.breaker).record_success();
            lock(&slot.descriptor).record_success(at);
            lock(&self.stats).successful_invocations += 1;
        } else {
            warn!(
                "Agent {} failed ({}): {}",
                result.agent_name,
                result.failure_kind().map(|k| k.as_str()).unwrap_or("unknown"),
                result.error_message().unwrap_or_default()
            );
            lock(&slot.breaker).record_failure(Instant::now());
            lock(&slot.descriptor).record_failure(at);
            lock(&self.stats).failed_invocations += 1;
        }
    }

    // ==================== Coordination ====================

    /// Fan a request batch out to its agents and synthesize one decision.
    ///
    /// Identical batches within the cache TTL return the cached decision
    /// without invoking any agent.
    pub async fn coordinate(
        &self,
        requests: &[AgentRequest],
    ) -> Result<SynthesizedDecision, CoordinatorError> {
        if let Err(e) = self.validate(requests) {
            warn!("Rejected coordination batch: {}", e);
            self.publisher
                .publish(WorkflowEvent::workflow_failed(None, &e.to_string()));
            return Err(e);
        }

        let started = Instant::now();
        let key = cache_key(requests)?;

        if let Some(hit) = self.cache.get(&key, started) {
            debug!("Cache hit for batch of {} requests", requests.len());
            let mut stats = lock(&self.stats);
            stats.total_coordinations += 1;
            stats.cache_hits += 1;
            stats.record_latency(started.elapsed().as_millis() as u64);
            return Ok(hit);
        }
        lock(&self.stats).cache_misses += 1;

        info!("Coordinating {} agent requests", requests.len());
        let results = join_all(requests.iter().map(|r| self.invoke(r))).await;

        let decision = synthesize(&results, |name| self.weight_of(name), now_millis());
        info!(
            "Synthesized decision: {} (confidence {:.2})",
            decision.final_decision, decision.confidence
        );

        self.cache.insert(key, decision.clone(), Instant::now());

        let mut stats = lock(&self.stats);
        stats.total_coordinations += 1;
        stats.record_latency(started.elapsed().as_millis() as u64);

        Ok(decision)
    }

    fn validate(&self, requests: &[AgentRequest]) -> Result<(), CoordinatorError> {
        if requests.is_empty() {
            return Err(CoordinatorError::EmptyBatch);
        }
        if let Some(unknown) = requests.iter().find(|r| !self.is_registered(&r.agent_name)) {
            return Err(CoordinatorError::UnknownAgent(unknown.agent_name.clone()));
        }
        Ok(())
    }

    // ==================== Maintenance ====================

    pub fn metrics(&self) -> CoordinatorMetrics {
        let now = Instant::now();
        let breakers: BTreeMap<String, _> = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, slot)| (name.clone(), lock(&slot.breaker).snapshot(now).state))
            .collect();
        let stats = lock(&self.stats);
        CoordinatorMetrics {
            total_coordinations: stats.total_coordinations,
            successful_invocations: stats.successful_invocations,
            failed_invocations: stats.failed_invocations,
            breaker_rejections: stats.breaker_rejections,
            cache_hits: stats.cache_hits,
            cache_misses: stats.cache_misses,
            average_latency_ms: stats.average_latency_ms,
            cache_size: self.cache.len(),
            breakers,
        }
    }

    /// Per-agent health, sorted by name
    pub fn health_check(&self) -> Vec<AgentHealthReport> {
        let now = Instant::now();
        let mut reports: Vec<AgentHealthReport> = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|slot| {
                let descriptor = lock(&slot.descriptor);
                AgentHealthReport {
                    name: descriptor.name.clone(),
                    health: descriptor.health,
                    weight: descriptor.weight,
                    success_count: descriptor.success_count,
                    failure_count: descriptor.failure_count,
                    breaker: lock(&slot.breaker).snapshot(now),
                    last_used_at: descriptor.last_used_at,
                }
            })
            .collect();
        reports.sort_by(|a, b| a.name.cmp(&b.name));
        reports
    }

    /// Force an agent's breaker closed; `false` when the agent is unknown
    pub fn reset_circuit_breaker(&self, name: &str) -> bool {
        match self.slot(name) {
            Some(slot) => {
                lock(&slot.breaker).reset();
                info!("Circuit breaker for {} reset", name);
                true
            }
            None => false,
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Forward feedback to the named agent's `learn`
    pub async fn submit_feedback(
        &self,
        name: &str,
        feedback: &AgentFeedback,
    ) -> Result<(), CoordinatorError> {
        let slot = self
            .slot(name)
            .ok_or_else(|| CoordinatorError::UnknownAgent(name.to_string()))?;
        slot.agent.learn(feedback).await;
        Ok(())
    }

    /// Start the periodic expired-entry sweep; stopped by [`shutdown`](Self::shutdown)
    pub fn spawn_cache_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::downgrade(self);
        let token = self.shutdown.clone();
        let period = self.params.sweep_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(coordinator) = coordinator.upgrade() else {
                            break;
                        };
                        let removed = coordinator.cache.sweep(Instant::now());
                        if removed > 0 {
                            debug!("Cache sweep removed {} expired entries", removed);
                        }
                    }
                }
            }
        })
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Deterministic key over the whole request batch
fn cache_key(requests: &[AgentRequest]) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(requests)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}
