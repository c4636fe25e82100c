// SPDX-License-Identifier: Apache-2.0

use aiact_core::{OrganizationId, SystemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const SYSTEM_NAME_MAX_LEN: usize = 200;

/// EU AI Act risk classification of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RiskLevel {
    Minimal,
    Limited,
    High,
    Prohibited,
}

impl RiskLevel {
    pub const ALL: [Self; 4] = [Self::Minimal, Self::Limited, Self::High, Self::Prohibited];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Limited => "limited",
            Self::High => "high",
            Self::Prohibited => "prohibited",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal Risk",
            Self::Limited => "Limited Risk",
            Self::High => "High Risk",
            Self::Prohibited => "Prohibited",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "limited" => Ok(Self::Limited),
            "high" => Ok(Self::High),
            "prohibited" | "unacceptable" => Ok(Self::Prohibited),
            other => Err(ValidationError(format!("unknown risk level: {other}"))),
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiSystem {
    pub id: SystemId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
}

impl AiSystem {
    pub fn new(
        id: SystemId,
        organization_id: OrganizationId,
        name: &str,
        risk_level: RiskLevel,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError("system name must not be empty".to_string()));
        }
        if name.chars().count() > SYSTEM_NAME_MAX_LEN {
            return Err(ValidationError(format!(
                "system name exceeds max length {SYSTEM_NAME_MAX_LEN}"
            )));
        }
        Ok(Self {
            id,
            organization_id,
            name: name.to_string(),
            risk_level,
            created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
}
