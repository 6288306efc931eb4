//! Execute Workflow use case
//!
//! Routes a request to a workflow, runs its agents through the
//! [`Coordinator`] in sequence or in parallel, and aggregates the steps
//! into a summary with escalation flags. Every transition is published as
//! a lifecycle event.

use crate::config::WorkflowParams;
use crate::coordinator::Coordinator;
use crate::ports::event_publisher::EventPublisher;
use crate::ports::progress::{NoProgress, WorkflowProgress};
use crate::ports::submission_store::{StoreError, SubmissionStore};
use crate::ports::triage::TriageClassifier;
use futures::future::join_all;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use verdict_domain::workflow::{
    NOT_REGISTERED_REASON, SkipContext, overall_confidence, review_reasons, should_skip,
};
use verdict_domain::{
    AgentRequest, Classification, EventKind, StepOutcome, StepResult, WorkflowCatalog,
    WorkflowDefinition, WorkflowEvent, WorkflowOutput, WorkflowSummary,
};

/// Errors that abort a workflow run
#[derive(Error, Debug)]
pub enum ExecuteWorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to create submission: {0}")]
    Store(#[from] StoreError),
}

/// Input for the ExecuteWorkflow use case
#[derive(Debug, Clone)]
pub struct ExecuteWorkflowInput {
    /// Explicit workflow; when absent the classifier recommends one
    pub workflow: Option<String>,
    /// Request record handed to every agent; must be a JSON object
    pub input: Value,
    /// Caller-supplied context merged into every agent's context
    pub context: Value,
}

impl ExecuteWorkflowInput {
    pub fn new(input: Value) -> Self {
        Self {
            workflow: None,
            input,
            context: Value::Object(Map::new()),
        }
    }

    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// Use case for running one request through a workflow
pub struct ExecuteWorkflowUseCase {
    coordinator: Arc<Coordinator>,
    store: Arc<dyn SubmissionStore>,
    classifier: Arc<dyn TriageClassifier>,
    publisher: Arc<dyn EventPublisher>,
    catalog: WorkflowCatalog,
    params: WorkflowParams,
}

impl ExecuteWorkflowUseCase {
    pub fn new(
        coordinator: Arc<Coordinator>,
        store: Arc<dyn SubmissionStore>,
        classifier: Arc<dyn TriageClassifier>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            coordinator,
            store,
            classifier,
            publisher,
            catalog: WorkflowCatalog::builtin(),
            params: WorkflowParams::default(),
        }
    }

    /// Apply workflow parameters. An unknown default workflow is ignored
    /// with a warning and the built-in default stays in place.
    pub fn with_params(mut self, params: WorkflowParams) -> Self {
        match self.catalog.clone().with_default(&params.default_workflow) {
            Ok(catalog) => self.catalog = catalog,
            Err(e) => warn!("Keeping built-in default workflow: {}", e),
        }
        self.params = params;
        self
    }

    pub fn catalog(&self) -> &WorkflowCatalog {
        &self.catalog
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: ExecuteWorkflowInput,
    ) -> Result<WorkflowOutput, ExecuteWorkflowError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ExecuteWorkflowInput,
        progress: &dyn WorkflowProgress,
    ) -> Result<WorkflowOutput, ExecuteWorkflowError> {
        let started = Instant::now();

        if !input.input.is_object() {
            let err = ExecuteWorkflowError::InvalidInput("request must be a JSON object".into());
            self.publisher
                .publish(WorkflowEvent::workflow_failed(None, &err.to_string()));
            return Err(err);
        }

        let record = json!({ "workflow": input.workflow, "input": input.input });
        let submission_id = match self.store.create(&record).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Submission store failed: {}", e);
                self.publisher
                    .publish(WorkflowEvent::workflow_failed(None, &e.to_string()));
                return Err(e.into());
            }
        };

        let classification = match self.classifier.classify(&input.input).await {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("Classification failed, using default workflow: {}", e);
                None
            }
        };

        let requested = input
            .workflow
            .as_deref()
            .or(classification.as_ref().map(|c| c.recommended_workflow.as_str()));
        let (definition, fell_back) = self.catalog.resolve(requested);
        if fell_back {
            warn!(
                "Unknown workflow {}, falling back to {}",
                requested.unwrap_or_default(),
                definition.name
            );
        }
        let definition = definition.clone();

        info!(
            "Submission {}: running workflow {} ({} agents, {})",
            submission_id,
            definition.name,
            definition.agents.len(),
            if definition.parallel { "parallel" } else { "sequential" }
        );
        self.emit(
            EventKind::WorkflowStarted,
            &submission_id,
            json!({
                "workflow": definition.name,
                "agents": definition.agents,
                "parallel": definition.parallel,
                "fell_back": fell_back,
            }),
        );
        progress.on_workflow_start(&definition.name, definition.agents.len());

        let context = agent_context(&input.context, &submission_id, &definition, &classification);
        let run = Run {
            submission_id: &submission_id,
            input: &input.input,
            context: &context,
            progress,
        };

        let steps = if definition.parallel {
            self.run_parallel(&definition, &run).await
        } else {
            self.run_sequential(&definition, &run, classification.as_ref())
                .await
        };

        let confidence = overall_confidence(classification.as_ref().map(|c| c.confidence), &steps);
        let reasons = review_reasons(&definition, &steps, self.params.confidence_threshold);
        let human_review_required = !reasons.is_empty();
        if human_review_required {
            info!("Submission {} flagged for human review", submission_id);
            self.emit(
                EventKind::HumanReviewRequested,
                &submission_id,
                json!({ "reasons": reasons.iter().map(ToString::to_string).collect::<Vec<_>>() }),
            );
        }

        let summary = WorkflowSummary::build(
            &definition,
            &steps,
            human_review_required,
            started.elapsed().as_millis() as u64,
        );
        if summary.sla_exceeded {
            warn!("Workflow {} exceeded its SLA", definition.name);
        }

        self.emit(
            EventKind::WorkflowCompleted,
            &submission_id,
            json!({
                "status": "completed",
                "outcome": summary.status,
                "confidence": confidence,
                "human_review_required": human_review_required,
            }),
        );
        progress.on_workflow_complete(&summary);

        Ok(WorkflowOutput {
            submission_id,
            workflow: definition.name.clone(),
            fell_back,
            classification,
            results: steps,
            summary,
            confidence,
            human_review_required,
            review_reasons: reasons,
        })
    }

    /// Run agents strictly in order, halting at the first blocker
    async fn run_sequential(
        &self,
        definition: &WorkflowDefinition,
        run: &Run<'_>,
        classification: Option<&Classification>,
    ) -> Vec<StepResult> {
        let policy_count = run
            .input
            .get("policies")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let mut steps: Vec<StepResult> = Vec::with_capacity(definition.agents.len());
        let mut halted_by: Option<String> = None;

        for agent in &definition.agents {
            if let Some(blocker) = &halted_by {
                let step = StepResult::not_attempted(agent, blocker);
                self.record_skip(run, step.clone());
                steps.push(step);
                continue;
            }

            if !self.coordinator.is_registered(agent) {
                let step = StepResult::skipped(agent, NOT_REGISTERED_REASON);
                self.record_skip(run, step.clone());
                steps.push(step);
                continue;
            }

            let skip = SkipContext {
                prior: &steps,
                classification,
                policy_count,
            };
            if let Some(reason) = should_skip(agent, &skip) {
                debug!("Skipping {}: {}", agent, reason);
                let step = StepResult::skipped(agent, reason);
                self.record_skip(run, step.clone());
                steps.push(step);
                continue;
            }

            let mut context = run.context.clone();
            if let Value::Object(map) = &mut context {
                map.insert(
                    "previousResults".to_string(),
                    serde_json::to_value(&steps).unwrap_or_default(),
                );
            }

            let step = self.run_agent(agent, run, context).await;
            if step.has_blockers() {
                info!("Agent {} reported blockers; halting workflow", agent);
                halted_by = Some(agent.clone());
            }
            steps.push(step);
        }

        steps
    }

    /// Run every agent concurrently and wait for all of them
    async fn run_parallel(&self, definition: &WorkflowDefinition, run: &Run<'_>) -> Vec<StepResult> {
        let tasks = definition.agents.iter().map(|agent| async move {
            if !self.coordinator.is_registered(agent) {
                let step = StepResult::skipped(agent, NOT_REGISTERED_REASON);
                self.record_skip(run, step.clone());
                return step;
            }
            self.run_agent(agent, run, run.context.clone()).await
        });
        join_all(tasks).await
    }

    async fn run_agent(&self, agent: &str, run: &Run<'_>, context: Value) -> StepResult {
        self.emit(EventKind::AgentStarted, run.submission_id, json!({ "agent": agent }));
        run.progress.on_agent_start(agent);

        let request = AgentRequest::new(agent, run.input.clone()).with_context(context);
        let step: StepResult = self.coordinator.invoke(&request).await.into();

        match &step.outcome {
            StepOutcome::Completed { value } => self.emit(
                EventKind::AgentCompleted,
                run.submission_id,
                json!({
                    "agent": agent,
                    "decision": value.decision,
                    "status": value.status_label(),
                    "confidence": value.confidence,
                    "elapsed_ms": step.elapsed_ms,
                }),
            ),
            StepOutcome::Failed { kind, error } => self.emit(
                EventKind::AgentFailed,
                run.submission_id,
                json!({
                    "agent": agent,
                    "kind": kind,
                    "error": error,
                    "elapsed_ms": step.elapsed_ms,
                }),
            ),
            StepOutcome::Skipped { .. } | StepOutcome::NotAttempted { .. } => {}
        }
        run.progress.on_step_complete(&step);
        step
    }

    fn record_skip(&self, run: &Run<'_>, step: StepResult) {
        let reason = match &step.outcome {
            StepOutcome::Skipped { reason } | StepOutcome::NotAttempted { reason } => reason.clone(),
            _ => String::new(),
        };
        self.emit(
            EventKind::AgentSkipped,
            run.submission_id,
            json!({ "agent": step.agent_name, "status": step.status_str(), "reason": reason }),
        );
        run.progress.on_step_complete(&step);
    }

    fn emit(&self, kind: EventKind, submission_id: &str, payload: Value) {
        self.publisher
            .publish(WorkflowEvent::new(kind, Some(submission_id), payload));
    }
}

/// Per-run values shared by every agent invocation
struct Run<'a> {
    submission_id: &'a str,
    input: &'a Value,
    context: &'a Value,
    progress: &'a dyn WorkflowProgress,
}

fn agent_context(
    caller: &Value,
    submission_id: &str,
    definition: &WorkflowDefinition,
    classification: &Option<Classification>,
) -> Value {
    let mut context = match caller {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    context.insert("submissionId".into(), json!(submission_id));
    context.insert("workflow".into(), json!(definition.name));
    if let Some(c) = classification {
        context.insert("classification".into(), serde_json::to_value(c).unwrap_or_default());
    }
    Value::Object(context)
}
