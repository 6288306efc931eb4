//! Risk tiering across six scored dimensions

pub mod assessment;
pub mod dimension;
pub mod profile;
pub mod tier;

pub use assessment::{AuditRequirements, RiskAssessment, assess, recommended_controls};
pub use dimension::{DimensionScore, RiskDimension};
pub use profile::UsageProfile;
pub use tier::{AuditFrequency, RiskTier};
