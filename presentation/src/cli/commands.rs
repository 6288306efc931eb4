//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for workflow and coordination results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every agent step plus the summary
    Full,
    /// Only the final status and review reasons
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for verdict
#[derive(Parser, Debug)]
#[command(name = "verdict")]
#[command(author, version, about = "Governed multi-agent decisions for generative tool requests")]
#[command(long_about = r#"
Verdict routes a request through a workflow of decision agents and
synthesizes their votes into one governed outcome.

Each run goes through three stages:
1. Triage: the request is classified and a workflow is recommended
2. Agents: the workflow's agents run sequentially or in parallel
3. Review: low confidence, failures and escalations flag human review

Configuration files are loaded from (in priority order):
1. VERDICT_* environment variables (e.g. VERDICT_CACHE__TTL_SECS=60)
2. --config <path>     Explicit config file
3. ./verdict.toml      Project-level config
4. ~/.config/verdict/config.toml   Global config

Example:
  verdict "Using Midjourney for campaign images serving Pfizer and Novartis"
  verdict --workflow enterprise-policy-creation --policy brand.md --policy legal.md "New AI policy"
  verdict --coordinate -o json "Use ChatGPT for Toyota copy drafts"
"#)]
pub struct Cli {
    /// The request to evaluate
    pub request: Option<String>,

    /// Workflow to run instead of the triage recommendation
    #[arg(short, long, value_name = "NAME")]
    pub workflow: Option<String>,

    /// Explicit request type (e.g. tool_submission, compliance_audit)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub request_type: Option<String>,

    /// Policy document to check for conflicts (can be specified multiple times)
    #[arg(short, long, value_name = "FILE")]
    pub policy: Vec<PathBuf>,

    /// Extra context passed to every agent, as a JSON object
    #[arg(long, value_name = "JSON")]
    pub context: Option<String>,

    /// Fan the request out to the scoring agents and synthesize one decision
    #[arg(long)]
    pub coordinate: bool,

    /// List the built-in workflows and exit
    #[arg(long)]
    pub list_workflows: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Append workflow events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workflow_run() {
        let cli = Cli::try_parse_from([
            "verdict",
            "-w",
            "compliance-audit-workflow",
            "--policy",
            "a.md",
            "--policy",
            "b.md",
            "-vv",
            "check tools",
        ])
        .unwrap();

        assert_eq!(cli.request.as_deref(), Some("check tools"));
        assert_eq!(cli.workflow.as_deref(), Some("compliance-audit-workflow"));
        assert_eq!(cli.policy.len(), 2);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(!cli.coordinate);
    }

    #[test]
    fn test_parse_coordinate_json() {
        let cli = Cli::try_parse_from([
            "verdict",
            "--coordinate",
            "-o",
            "json",
            "--type",
            "tool_submission",
            "x",
        ])
        .unwrap();
        assert!(cli.coordinate);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.request_type.as_deref(), Some("tool_submission"));
    }
}
