// SPDX-License-Identifier: Apache-2.0

use aiact_model::{CertificationLevel, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementsDto {
    pub total: u32,
    pub completed: u32,
    pub percentage: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksDto {
    pub sdk_connected: bool,
    pub hitl_rules_active: bool,
    pub no_open_incidents: bool,
    pub logging_active: bool,
}

/// `cert_id` stays null until a certificate has been generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificationWindowDto {
    pub cert_id: Option<String>,
    pub valid_until: DateTime<Utc>,
    pub next_verification_at: DateTime<Utc>,
}

/// Flat projection shape served by `GET /v1/systems/{system_id}/certification`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificationProjectionDto {
    pub agent_id: String,
    pub compliance_score: u8,
    pub certification_level: CertificationLevel,
    pub certification_status: String,
    pub requirements: RequirementsDto,
    pub checks: ChecksDto,
    pub bonus_points: u8,
    pub certification: Option<CertificationWindowDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateDto {
    pub cert_id: String,
    pub organization_id: String,
    pub organization_name: String,
    pub system_id: String,
    pub system_name: String,
    pub risk_level: RiskLevel,
    pub level: CertificationLevel,
    pub score: u8,
    pub issued_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub next_verification_at: DateTime<Utc>,
    pub expired: bool,
}

/// Sections are decoded leniently: unknown keys are ignored and a body that
/// is not a string reads as missing, so it renders as the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSectionDto {
    pub heading: String,
    #[serde(default, deserialize_with = "text_or_none")]
    pub body: Option<String>,
}

fn text_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentRequestDto {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<DocumentSectionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionDto {
    pub service: String,
    pub version: String,
    pub api_version: String,
    pub policy_schema_version: String,
    pub policy_hash: String,
}
