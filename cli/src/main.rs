//! CLI entrypoint for verdict
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use serde_json::{Map, Value, json};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use verdict_application::{
    Coordinator, EventPublisher, ExecuteWorkflowInput, ExecuteWorkflowUseCase, WorkflowProgress,
};
use verdict_domain::{AgentRequest, WorkflowCatalog};
use verdict_infrastructure::agents::SCORING_AGENTS;
use verdict_infrastructure::{
    BroadcastEventBus, ConfigLoader, FileConfig, InMemorySubmissionStore, JsonlAuditLog,
    KeywordTriageClassifier, register_default_agents,
};
use verdict_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so JSON output on stdout stays clean
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    if cli.list_workflows {
        let catalog = WorkflowCatalog::builtin();
        for definition in catalog.names().filter_map(|name| catalog.get(name)) {
            let mode = if definition.parallel { "parallel" } else { "sequential" };
            println!(
                "{:<34} {:<10} {}",
                definition.name,
                mode,
                definition.agents.join(", ")
            );
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    info!("Starting verdict");

    let request = match cli.request.as_deref() {
        Some(r) if !r.trim().is_empty() => r.to_string(),
        _ => bail!("A request is required. Run with --help for usage."),
    };
    let input = build_input(&cli, &request)?;
    let context = parse_context(cli.context.as_deref())?;

    // === Dependency Injection ===
    let bus = Arc::new(BroadcastEventBus::default());
    let publisher: Arc<dyn EventPublisher> = bus.clone();
    let cancel = CancellationToken::new();

    let audit_path = cli.audit_log.clone().or_else(|| config.audit.path.clone());
    let audit_task = audit_path.and_then(|path| {
        let log = JsonlAuditLog::new(&path)?;
        info!("Writing audit trail to {}", log.path().display());
        Some(bus.spawn_subscriber(Arc::new(log), cancel.clone()))
    });

    let coordinator =
        Arc::new(Coordinator::new(config.coordinator_params()).with_publisher(publisher.clone()));
    register_default_agents(&coordinator, &config.agents, None);
    let sweeper = coordinator.spawn_cache_sweeper();

    let result = if cli.coordinate {
        coordinate(&coordinator, &cli, input, context).await
    } else {
        let use_case = ExecuteWorkflowUseCase::new(
            coordinator.clone(),
            Arc::new(InMemorySubmissionStore::new()),
            Arc::new(KeywordTriageClassifier::new()),
            publisher,
        )
        .with_params(config.workflow_params());
        run_workflow(&use_case, &cli, input, context).await
    };

    // Stop background tasks; the audit subscriber drains queued events first
    coordinator.shutdown();
    let _ = sweeper.await;
    cancel.cancel();
    if let Some(task) = audit_task {
        let _ = task.await;
    }

    println!("{}", result?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    for issue in config.validate() {
        warn!("Ignoring invalid configuration value {}", issue);
    }
    Ok(config)
}

/// Request payload: message, optional type and policy documents
fn build_input(cli: &Cli, request: &str) -> Result<Value> {
    let mut input = Map::new();
    input.insert("message".to_string(), json!(request));
    if let Some(request_type) = &cli.request_type {
        input.insert("type".to_string(), json!(request_type));
    }

    if !cli.policy.is_empty() {
        let mut policies = Vec::with_capacity(cli.policy.len());
        for path in &cli.policy {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy {}", path.display()))?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            policies.push(json!({
                "id": path.display().to_string(),
                "name": name,
                "content": content,
            }));
        }
        input.insert("policies".to_string(), Value::Array(policies));
    }

    Ok(Value::Object(input))
}

fn parse_context(raw: Option<&str>) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(json!({}));
    };
    let value: Value = serde_json::from_str(raw).context("--context must be valid JSON")?;
    if !value.is_object() {
        bail!("--context must be a JSON object");
    }
    Ok(value)
}

async fn coordinate(
    coordinator: &Coordinator,
    cli: &Cli,
    input: Value,
    context: Value,
) -> Result<String> {
    let requests: Vec<AgentRequest> = SCORING_AGENTS
        .iter()
        .map(|name| AgentRequest::new(*name, input.clone()).with_context(context.clone()))
        .collect();

    let decision = coordinator.coordinate(&requests).await?;
    Ok(match cli.output {
        OutputFormat::Json => ConsoleFormatter::format_json(&decision),
        OutputFormat::Full | OutputFormat::Summary => ConsoleFormatter::format_decision(&decision),
    })
}

async fn run_workflow(
    use_case: &ExecuteWorkflowUseCase,
    cli: &Cli,
    input: Value,
    context: Value,
) -> Result<String> {
    let mut workflow_input = ExecuteWorkflowInput::new(input).with_context(context);
    if let Some(workflow) = &cli.workflow {
        workflow_input = workflow_input.with_workflow(workflow.clone());
    }

    let output = if cli.quiet || cli.output == OutputFormat::Json {
        use_case.execute(workflow_input).await?
    } else {
        let progress: Box<dyn WorkflowProgress> = if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };
        use_case
            .execute_with_progress(workflow_input, progress.as_ref())
            .await?
    };

    Ok(match cli.output {
        OutputFormat::Full => ConsoleFormatter::format_workflow(&output),
        OutputFormat::Summary => ConsoleFormatter::format_workflow_summary(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    })
}
