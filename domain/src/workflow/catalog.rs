//! Built-in workflow catalog

use crate::core::error::DomainError;
use crate::workflow::definition::WorkflowDefinition;
use std::time::Duration;

pub const AGENCY_TOOL_SUBMISSION: &str = "agency-tool-submission";
pub const ENTERPRISE_POLICY_CREATION: &str = "enterprise-policy-creation";
pub const MULTI_CLIENT_CONFLICT_RESOLUTION: &str = "multi-client-conflict-resolution";
pub const COMPLIANCE_AUDIT: &str = "compliance-audit-workflow";
pub const HUMAN_OVERRIDE_REVIEW: &str = "human-override-review";
pub const POLICY_DISTRIBUTION_SYNC: &str = "policy-distribution-sync";

pub const DEFAULT_WORKFLOW: &str = ENTERPRISE_POLICY_CREATION;

const HOUR: u64 = 60 * 60;

/// Read-only set of workflow definitions with a fallback
#[derive(Debug, Clone)]
pub struct WorkflowCatalog {
    definitions: Vec<WorkflowDefinition>,
    default_name: String,
}

impl WorkflowCatalog {
    pub fn builtin() -> Self {
        let definitions = vec![
            WorkflowDefinition::sequential(
                AGENCY_TOOL_SUBMISSION,
                &[
                    "pre-flight",
                    "context",
                    "policy",
                    "conflict-detection",
                    "negotiation",
                    "audit",
                ],
            )
            .with_sla(Duration::from_secs(48 * HOUR)),
            WorkflowDefinition::sequential(
                ENTERPRISE_POLICY_CREATION,
                &["context", "policy", "conflict-detection", "audit"],
            )
            .with_sla(Duration::from_secs(24 * HOUR)),
            WorkflowDefinition::sequential(
                MULTI_CLIENT_CONFLICT_RESOLUTION,
                &["context", "conflict-detection", "negotiation", "audit"],
            )
            .with_sla(Duration::from_secs(72 * HOUR))
            .requiring_human(),
            WorkflowDefinition::parallel(COMPLIANCE_AUDIT, &["audit", "pattern-recognition", "policy"])
                .with_sla(Duration::from_secs(168 * HOUR)),
            WorkflowDefinition::sequential(HUMAN_OVERRIDE_REVIEW, &["context", "audit"])
                .with_sla(Duration::from_secs(4 * HOUR))
                .requiring_human(),
            WorkflowDefinition::parallel(
                POLICY_DISTRIBUTION_SYNC,
                &["policy", "conflict-detection", "audit"],
            )
            .with_sla(Duration::from_secs(HOUR)),
        ];
        Self {
            definitions,
            default_name: DEFAULT_WORKFLOW.to_string(),
        }
    }

    /// Replace the fallback workflow; the name must exist in the catalog
    pub fn with_default(mut self, name: &str) -> Result<Self, DomainError> {
        if self.get(name).is_none() {
            return Err(DomainError::UnknownWorkflow(name.to_string()));
        }
        self.default_name = name.to_string();
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn default_workflow(&self) -> &WorkflowDefinition {
        // default_name is validated on construction
        self.get(&self.default_name)
            .unwrap_or(&self.definitions[0])
    }

    /// Look up `name`, falling back to the default workflow.
    ///
    /// The flag is `true` when the fallback was taken.
    pub fn resolve(&self, name: Option<&str>) -> (&WorkflowDefinition, bool) {
        match name.and_then(|n| self.get(n)) {
            Some(def) => (def, false),
            None => (self.default_workflow(), name.is_some()),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Default for WorkflowCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = WorkflowCatalog::builtin();
        assert_eq!(catalog.names().count(), 6);
        let audit = catalog.get(COMPLIANCE_AUDIT).unwrap();
        assert!(audit.parallel);
        assert_eq!(audit.sla(), Duration::from_secs(168 * HOUR));
        assert!(catalog.get(MULTI_CLIENT_CONFLICT_RESOLUTION).unwrap().requires_human);
        assert!(catalog.get(POLICY_DISTRIBUTION_SYNC).unwrap().parallel);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let catalog = WorkflowCatalog::builtin();
        let (def, fell_back) = catalog.resolve(Some("no-such-workflow"));
        assert_eq!(def.name, DEFAULT_WORKFLOW);
        assert!(fell_back);

        let (def, fell_back) = catalog.resolve(None);
        assert_eq!(def.name, DEFAULT_WORKFLOW);
        assert!(!fell_back);

        let (def, _) = catalog.resolve(Some(HUMAN_OVERRIDE_REVIEW));
        assert_eq!(def.agents, vec!["context", "audit"]);
    }

    #[test]
    fn test_with_default() {
        let catalog = WorkflowCatalog::builtin()
            .with_default(HUMAN_OVERRIDE_REVIEW)
            .unwrap();
        assert_eq!(catalog.default_workflow().name, HUMAN_OVERRIDE_REVIEW);
        assert!(matches!(
            WorkflowCatalog::builtin().with_default("nope"),
            Err(DomainError::UnknownWorkflow(_))
        ));
    }
}
