//! Aggregated view of a finished workflow run

use crate::agent::outcome::DecisionLabel;
use crate::routing::triage::Classification;
use crate::workflow::definition::WorkflowDefinition;
use crate::workflow::rules::HumanReviewReason;
use crate::workflow::step::StepResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall status; earlier variants take precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Blocked,
    RequiresReview,
    Rejected,
    Conditional,
    Approved,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Blocked => "blocked",
            WorkflowStatus::RequiresReview => "requires_review",
            WorkflowStatus::Rejected => "rejected",
            WorkflowStatus::Conditional => "conditional",
            WorkflowStatus::Approved => "approved",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub workflow: String,
    pub total_agents: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_attempted: usize,
    pub halted_by: Option<String>,
    pub status: WorkflowStatus,
    /// Raw status label of the last agent that cast a vote
    pub decision_status: Option<String>,
    pub elapsed_ms: u64,
    pub sla_exceeded: bool,
}

impl WorkflowSummary {
    pub fn build(
        definition: &WorkflowDefinition,
        steps: &[StepResult],
        human_review_required: bool,
        elapsed_ms: u64,
    ) -> Self {
        let halted_by = steps
            .iter()
            .find(|s| s.has_blockers())
            .map(|s| s.agent_name.clone());

        let votes: Vec<(&str, DecisionLabel)> = steps
            .iter()
            .filter_map(|s| s.value())
            .filter(|v| v.decision.is_vote())
            .map(|v| (v.status_label(), v.decision))
            .collect();

        let status = if halted_by.is_some() {
            WorkflowStatus::Blocked
        } else if human_review_required {
            WorkflowStatus::RequiresReview
        } else if votes.iter().any(|(_, d)| *d == DecisionLabel::Rejected) {
            WorkflowStatus::Rejected
        } else if votes.iter().any(|(_, d)| *d == DecisionLabel::Conditional) {
            WorkflowStatus::Conditional
        } else {
            WorkflowStatus::Approved
        };

        Self {
            workflow: definition.name.clone(),
            total_agents: steps.len(),
            completed: steps.iter().filter(|s| s.is_completed()).count(),
            failed: steps.iter().filter(|s| s.is_failed()).count(),
            skipped: steps.iter().filter(|s| s.is_skipped()).count(),
            not_attempted: steps.iter().filter(|s| s.is_not_attempted()).count(),
            halted_by,
            status,
            decision_status: votes.last().map(|(label, _)| label.to_string()),
            elapsed_ms,
            sla_exceeded: definition.sla_ms > 0 && elapsed_ms > definition.sla_ms,
        }
    }
}

/// Everything a workflow run hands back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub submission_id: String,
    pub workflow: String,
    /// The requested workflow was unknown and the default ran instead
    pub fell_back: bool,
    pub classification: Option<Classification>,
    pub results: Vec<StepResult>,
    pub summary: WorkflowSummary,
    pub confidence: f64,
    pub human_review_required: bool,
    pub review_reasons: Vec<HumanReviewReason>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::invocation::{AgentInvocationResult, FailureKind};
    use crate::agent::outcome::AgentOutcome;

    fn completed(name: &str, outcome: AgentOutcome) -> StepResult {
        AgentInvocationResult::success(name, outcome, 1).into()
    }

    fn def() -> WorkflowDefinition {
        WorkflowDefinition::sequential("w", &["a", "b", "c"])
    }

    #[test]
    fn test_blocked_outranks_everything() {
        let steps = vec![
            completed("a", AgentOutcome::rejected().with_blocker("no content")),
            StepResult::not_attempted("b", "a"),
            StepResult::not_attempted("c", "a"),
        ];
        let summary = WorkflowSummary::build(&def(), &steps, true, 5);
        assert_eq!(summary.status, WorkflowStatus::Blocked);
        assert_eq!(summary.halted_by.as_deref(), Some("a"));
        assert_eq!(summary.not_attempted, 2);
    }

    #[test]
    fn test_vote_precedence() {
        let steps = vec![
            completed("a", AgentOutcome::approved()),
            completed(
                "b",
                AgentOutcome::conditional().with_status("conditional_approval"),
            ),
            completed("c", AgentOutcome::informational()),
        ];
        let summary = WorkflowSummary::build(&def(), &steps, false, 5);
        assert_eq!(summary.status, WorkflowStatus::Conditional);
        assert_eq!(summary.decision_status.as_deref(), Some("conditional_approval"));

        let summary = WorkflowSummary::build(&def(), &steps, true, 5);
        assert_eq!(summary.status, WorkflowStatus::RequiresReview);
    }

    #[test]
    fn test_counts_and_sla() {
        let def = def().with_sla(std::time::Duration::from_millis(10));
        let steps = vec![
            completed("a", AgentOutcome::approved()),
            AgentInvocationResult::failure("b", FailureKind::Timeout, "deadline", 1).into(),
            StepResult::skipped("c", "not registered"),
        ];
        let summary = WorkflowSummary::build(&def, &steps, false, 20);
        assert_eq!(
            (summary.completed, summary.failed, summary.skipped),
            (1, 1, 1)
        );
        assert!(summary.sla_exceeded);
        assert_eq!(summary.status, WorkflowStatus::Approved);
    }
}
