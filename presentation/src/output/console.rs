//! Console output formatter for workflow runs and coordinated decisions

use colored::{ColoredString, Colorize};
use verdict_domain::{
    FinalDecision, StepOutcome, StepResult, SynthesizedDecision, WorkflowOutput, WorkflowStatus,
};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a workflow run with every step
    pub fn format_workflow(output: &WorkflowOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Verdict Workflow Results"));
        out.push('\n');

        out.push_str(&format!(
            "{} {}\n",
            "Submission:".cyan().bold(),
            output.submission_id
        ));
        let fallback = if output.fell_back {
            format!(" {}", "(requested workflow unknown, default used)".yellow())
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{} {}{}\n",
            "Workflow:".cyan().bold(),
            output.workflow,
            fallback
        ));

        if let Some(classification) = &output.classification {
            out.push_str(&format!(
                "{} {} ({:.0}% confidence, {} complexity)\n",
                "Triage:".cyan().bold(),
                classification.recommended_workflow,
                classification.confidence * 100.0,
                classification.complexity.level.as_str()
            ));
            if !classification.complexity.clients.is_empty() {
                out.push_str(&format!(
                    "{} {}\n",
                    "Clients:".cyan().bold(),
                    classification.complexity.clients.join(", ")
                ));
            }
        }

        out.push_str(&Self::section_header("Agent Steps"));
        for step in &output.results {
            out.push_str(&Self::step(step));
        }

        out.push_str(&Self::section_header("Summary"));
        let summary = &output.summary;
        out.push_str(&format!(
            "{} {}\n",
            "Status:".bold(),
            Self::status(summary.status)
        ));
        if let Some(decision) = &summary.decision_status {
            out.push_str(&format!("{} {}\n", "Decision:".bold(), decision));
        }
        out.push_str(&format!(
            "{} {:.0}%\n",
            "Confidence:".bold(),
            output.confidence * 100.0
        ));
        out.push_str(&format!(
            "{} {} completed, {} failed, {} skipped, {} not attempted\n",
            "Agents:".bold(),
            summary.completed,
            summary.failed,
            summary.skipped,
            summary.not_attempted
        ));
        if let Some(agent) = &summary.halted_by {
            out.push_str(&format!("{} {}\n", "Halted by:".red().bold(), agent));
        }
        out.push_str(&format!("{} {} ms", "Elapsed:".bold(), summary.elapsed_ms));
        if summary.sla_exceeded {
            out.push_str(&format!(" {}", "(SLA exceeded)".red()));
        }
        out.push('\n');

        out.push_str(&Self::review_block(output));
        out.push_str(&Self::footer());
        out
    }

    /// Concise status line plus review reasons
    pub fn format_workflow_summary(output: &WorkflowOutput) -> String {
        let mut out = format!("{}\n\n", "=== Verdict ===".cyan().bold());
        out.push_str(&format!(
            "{} {} via {}\n",
            "Status:".bold(),
            Self::status(output.summary.status),
            output.workflow
        ));
        if let Some(decision) = &output.summary.decision_status {
            out.push_str(&format!("{} {}\n", "Decision:".bold(), decision));
        }
        out.push_str(&format!(
            "{} {:.0}%\n",
            "Confidence:".bold(),
            output.confidence * 100.0
        ));
        out.push_str(&Self::review_block(output));
        out
    }

    /// Format a synthesized decision from an ad-hoc coordination
    pub fn format_decision(decision: &SynthesizedDecision) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Verdict Decision"));
        out.push('\n');
        out.push_str(&format!(
            "{} {} ({:.0}% confidence)\n",
            "Decision:".cyan().bold(),
            Self::decision(decision.final_decision),
            decision.confidence * 100.0
        ));
        out.push_str(&format!("{} {}\n", "Reasoning:".cyan().bold(), decision.reasoning));

        out.push_str(&Self::section_header("Votes"));
        for vote in &decision.votes {
            out.push_str(&format!(
                "  {:<20} {:<12} confidence {:.2}  weight {:.2}\n",
                vote.agent_name,
                vote.decision.as_str(),
                vote.confidence,
                vote.weight
            ));
        }
        if !decision.metadata.failed_agents.is_empty() {
            out.push_str(&format!(
                "  {} {}\n",
                "Failed:".red().bold(),
                decision.metadata.failed_agents.join(", ")
            ));
        }

        out.push_str(&Self::section_header("Rationale"));
        out.push_str(&Self::indent(&decision.synthesized_rationale, "  "));
        out.push('\n');

        out.push_str(&format!("\n{}\n", "Recommended Actions:".green().bold()));
        for action in &decision.recommended_actions {
            out.push_str(&format!("  * {}\n", action));
        }

        out.push_str(&Self::footer());
        out
    }

    /// Format any serializable result as JSON
    pub fn format_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn step(step: &StepResult) -> String {
        let title = format!("── {} ──", step.agent_name);
        match &step.outcome {
            StepOutcome::Completed { value } => {
                let mut out = format!(
                    "\n{} {} ({} ms)\n",
                    title.yellow().bold(),
                    value.status_label(),
                    step.elapsed_ms
                );
                if let Some(confidence) = value.confidence {
                    out.push_str(&format!("  confidence {:.0}%\n", confidence * 100.0));
                }
                if value.requires_human {
                    out.push_str(&format!("  {}\n", "requests human review".yellow()));
                }
                for blocker in &value.blockers {
                    out.push_str(&format!("  {} {}\n", "blocker:".red().bold(), blocker));
                }
                for finding in &value.findings {
                    out.push_str(&format!("  - {}\n", finding));
                }
                out
            }
            StepOutcome::Failed { kind, error } => format!(
                "\n{} {} ({})\n  {}\n",
                title.red().bold(),
                "failed".red(),
                kind.as_str(),
                error
            ),
            StepOutcome::Skipped { reason } | StepOutcome::NotAttempted { reason } => format!(
                "\n{} {} ({})\n",
                title.dimmed(),
                step.status_str().dimmed(),
                reason
            ),
        }
    }

    fn review_block(output: &WorkflowOutput) -> String {
        if !output.human_review_required {
            return String::new();
        }
        let mut out = format!("\n{}\n", "Human review required:".yellow().bold());
        for reason in &output.review_reasons {
            out.push_str(&format!("  * {}\n", reason));
        }
        out
    }

    fn status(status: WorkflowStatus) -> ColoredString {
        match status {
            WorkflowStatus::Approved => status.as_str().green().bold(),
            WorkflowStatus::Conditional | WorkflowStatus::RequiresReview => {
                status.as_str().yellow().bold()
            }
            WorkflowStatus::Rejected | WorkflowStatus::Blocked => status.as_str().red().bold(),
        }
    }

    fn decision(decision: FinalDecision) -> ColoredString {
        match decision {
            FinalDecision::Approved => decision.as_str().green().bold(),
            FinalDecision::Conditional | FinalDecision::HumanInLoop => {
                decision.as_str().yellow().bold()
            }
            FinalDecision::Rejected => decision.as_str().red().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
