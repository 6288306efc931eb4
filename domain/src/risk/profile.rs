//! Declared usage of a tool, the input to risk scoring

use serde::{Deserialize, Serialize};

/// Free-text descriptors of how a tool will be used.
///
/// All fields are optional; missing fields simply match no rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageProfile {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub usage: Option<String>,
    pub data_handling: Option<String>,
    pub audience: Option<String>,
    pub purpose: Option<String>,
    pub model_type: Option<String>,
    pub explainability: Option<String>,
    pub controls: Option<String>,
    pub industry: Option<String>,
    pub content_type: Option<String>,
    pub disclaimers: Option<String>,
    pub criticality: Option<String>,
    pub fallback: Option<String>,
    /// Contracted uptime percentage, e.g. 99.9
    pub sla_uptime: Option<f64>,
}

impl UsageProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn with_data_handling(mut self, data_handling: impl Into<String>) -> Self {
        self.data_handling = Some(data_handling.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_controls(mut self, controls: impl Into<String>) -> Self {
        self.controls = Some(controls.into());
        self
    }

    pub fn with_criticality(mut self, criticality: impl Into<String>) -> Self {
        self.criticality = Some(criticality.into());
        self
    }

    /// Lowercased field text, empty when absent
    pub(crate) fn text(field: &Option<String>) -> String {
        field.as_deref().unwrap_or_default().to_lowercase()
    }
}
