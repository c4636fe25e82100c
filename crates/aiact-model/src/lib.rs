// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Domain model SSOT.
//!
//! ```compile_fail
//! use aiact_model::RiskLevel;
//!
//! fn exhaustive_match(r: RiskLevel) -> &'static str {
//!     match r {
//!         RiskLevel::Minimal => "m",
//!         RiskLevel::Limited => "l",
//!         RiskLevel::High => "h",
//!     }
//! }
//! ```

mod certification;
mod incident;
mod requirement;
mod system;
mod telemetry;
mod tenant;

pub use certification::{
    CertificationLevel, CertificationStatus, ComplianceCertification, ComplianceChecks,
    IssuedCertificate, RequirementsProgress,
};
pub use incident::{Incident, IncidentSeverity, IncidentStatus};
pub use requirement::{
    applicable_requirements, requirement_by_id, Requirement, REQUIREMENT_CATALOG,
};
pub use system::{AiSystem, Organization, RiskLevel, ValidationError, SYSTEM_NAME_MAX_LEN};
pub use telemetry::{AgentTelemetry, HitlRule};
pub use tenant::TenantContext;

pub const CRATE_NAME: &str = "aiact-model";
