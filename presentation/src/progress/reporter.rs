//! Progress reporting for workflow execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use verdict_application::WorkflowProgress;
use verdict_domain::{StepOutcome, StepResult, WorkflowSummary};

/// Reports progress during a workflow run with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn step_line(step: &StepResult) -> String {
        match &step.outcome {
            StepOutcome::Completed { value } if value.has_blockers() => {
                format!("{} {} blocked", "!".red(), step.agent_name)
            }
            StepOutcome::Completed { value } => {
                format!("{} {} {}", "v".green(), step.agent_name, value.status_label())
            }
            StepOutcome::Failed { kind, .. } => {
                format!("{} {} ({})", "x".red(), step.agent_name, kind.as_str())
            }
            StepOutcome::Skipped { .. } | StepOutcome::NotAttempted { .. } => {
                format!("{} {} {}", "-".dimmed(), step.agent_name, step.status_str())
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowProgress for ProgressReporter {
    fn on_workflow_start(&self, workflow: &str, total_agents: usize) {
        let pb = ProgressBar::new(total_agents as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix(workflow.to_string());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_agent_start(&self, agent: &str) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("running {}", agent));
        }
    }

    fn on_step_complete(&self, step: &StepResult) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(Self::step_line(step));
            pb.inc(1);
        }
    }

    fn on_workflow_complete(&self, summary: &WorkflowSummary) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{} {}", "done:".green(), summary.status));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl WorkflowProgress for SimpleProgress {
    fn on_workflow_start(&self, workflow: &str, total_agents: usize) {
        println!("{} {} ({} agents)", "->".cyan(), workflow.bold(), total_agents);
    }

    fn on_step_complete(&self, step: &StepResult) {
        println!("  {}", ProgressReporter::step_line(step));
    }

    fn on_workflow_complete(&self, _summary: &WorkflowSummary) {
        println!();
    }
}
