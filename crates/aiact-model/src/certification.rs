// SPDX-License-Identifier: Apache-2.0

use aiact_core::{CertId, OrganizationId, SystemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::system::RiskLevel;

/// Certification tier. Ordered so that `Gold > Silver > Bronze > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationLevel {
    None,
    Bronze,
    Silver,
    Gold,
}

impl CertificationLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Not Certified",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }

    #[must_use]
    pub const fn is_certifiable(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Display for CertificationLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion of the applicable checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementsProgress {
    pub total: u32,
    pub completed: u32,
    pub percentage: u8,
}

impl RequirementsProgress {
    /// `completed` is clamped to `total`; percentage rounds down so that 100
    /// is only reported when every requirement is complete.
    #[must_use]
    pub fn new(total: u32, completed: u32) -> Self {
        let completed = completed.min(total);
        let percentage = if total == 0 {
            0
        } else {
            (u64::from(completed) * 100 / u64::from(total)) as u8
        };
        Self {
            total,
            completed,
            percentage,
        }
    }

    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.percentage == 100
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceChecks {
    pub sdk_connected: bool,
    pub hitl_rules_active: bool,
    pub no_open_incidents: bool,
    pub logging_active: bool,
}

impl ComplianceChecks {
    /// Number of signals that earn a bonus. `sdk_connected` is not one of them.
    #[must_use]
    pub fn bonus_signal_count(&self) -> u8 {
        u8::from(self.hitl_rules_active)
            + u8::from(self.no_open_incidents)
            + u8::from(self.logging_active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificationStatus {
    /// The risk level has no applicable checklist.
    NotApplicable,
    NotEligible,
    Pending,
    /// Qualifies for a certificate that has not been generated yet; the window
    /// is what issuance at read time would produce.
    Eligible {
        valid_until: DateTime<Utc>,
        next_verification_at: DateTime<Utc>,
    },
    Certified {
        cert_id: CertId,
        valid_until: DateTime<Utc>,
        next_verification_at: DateTime<Utc>,
    },
}

impl CertificationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "not_applicable",
            Self::NotEligible => "not_eligible",
            Self::Pending => "pending",
            Self::Eligible { .. } => "eligible",
            Self::Certified { .. } => "certified",
        }
    }
}

/// Projection of one system's compliance state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceCertification {
    pub system_id: SystemId,
    pub compliance_score: u8,
    pub certification_level: CertificationLevel,
    pub status: CertificationStatus,
    pub requirements: RequirementsProgress,
    pub checks: ComplianceChecks,
    pub bonus_points: u8,
}

impl ComplianceCertification {
    /// A record qualifies for a certificate when every requirement is done and
    /// the score reaches at least bronze.
    #[must_use]
    pub fn qualifies(&self) -> bool {
        self.requirements.is_complete() && self.certification_level.is_certifiable()
    }

    #[must_use]
    pub fn cert_id(&self) -> Option<&CertId> {
        match &self.status {
            CertificationStatus::Certified { cert_id, .. } => Some(cert_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuedCertificate {
    pub cert_id: CertId,
    pub organization_id: OrganizationId,
    pub organization_name: String,
    pub system_id: SystemId,
    pub system_name: String,
    pub risk_level: RiskLevel,
    pub level: CertificationLevel,
    pub score: u8,
    pub issued_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub next_verification_at: DateTime<Utc>,
}

impl IssuedCertificate {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_down_and_clamps() {
        let p = RequirementsProgress::new(3, 2);
        assert_eq!(p.percentage, 66);
        assert!(!p.is_complete());

        let over = RequirementsProgress::new(2, 5);
        assert_eq!(over.completed, 2);
        assert_eq!(over.percentage, 100);
        assert!(over.is_complete());

        let empty = RequirementsProgress::new(0, 0);
        assert!(empty.is_not_applicable());
        assert!(!empty.is_complete());
    }

    #[test]
    fn level_ordering_and_wire_names() {
        assert!(CertificationLevel::Gold > CertificationLevel::Silver);
        assert!(CertificationLevel::Bronze > CertificationLevel::None);
        assert_eq!(
            serde_json::to_string(&CertificationLevel::None).expect("encode"),
            "\"none\""
        );
    }

    #[test]
    fn bonus_signal_count_ignores_sdk() {
        let checks = ComplianceChecks {
            sdk_connected: true,
            hitl_rules_active: true,
            no_open_incidents: false,
            logging_active: true,
        };
        assert_eq!(checks.bonus_signal_count(), 2);
    }
}
