//! Static workflow definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    /// Agents in execution order
    pub agents: Vec<String>,
    pub parallel: bool,
    pub sla_ms: u64,
    pub requires_human: bool,
}

impl WorkflowDefinition {
    pub fn sequential(name: impl Into<String>, agents: &[&str]) -> Self {
        Self {
            name: name.into(),
            agents: agents.iter().map(|a| a.to_string()).collect(),
            parallel: false,
            sla_ms: 0,
            requires_human: false,
        }
    }

    pub fn parallel(name: impl Into<String>, agents: &[&str]) -> Self {
        Self {
            parallel: true,
            ..Self::sequential(name, agents)
        }
    }

    pub fn with_sla(mut self, sla: Duration) -> Self {
        self.sla_ms = sla.as_millis() as u64;
        self
    }

    pub fn requiring_human(mut self) -> Self {
        self.requires_human = true;
        self
    }

    pub fn sla(&self) -> Duration {
        Duration::from_millis(self.sla_ms)
    }

    pub fn includes(&self, agent: &str) -> bool {
        self.agents.iter().any(|a| a == agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let def = WorkflowDefinition::parallel("sync", &["policy", "audit"])
            .with_sla(Duration::from_secs(3600))
            .requiring_human();
        assert!(def.parallel);
        assert!(def.requires_human);
        assert_eq!(def.sla_ms, 3_600_000);
        assert!(def.includes("audit"));
        assert!(!def.includes("context"));
    }
}
