// SPDX-License-Identifier: Apache-2.0

use aiact_model::{CertificationStatus, ComplianceCertification, IssuedCertificate};
use chrono::{DateTime, Utc};

use crate::dto::{
    CertificateDto, CertificationProjectionDto, CertificationWindowDto, ChecksDto, RequirementsDto,
};

/// Flattens the tagged status into the wire shape. The `certification`
/// object is present exactly when the record qualifies.
#[must_use]
pub fn projection_dto(record: &ComplianceCertification) -> CertificationProjectionDto {
    let certification = match &record.status {
        CertificationStatus::Certified {
            cert_id,
            valid_until,
            next_verification_at,
        } => Some(CertificationWindowDto {
            cert_id: Some(cert_id.to_string()),
            valid_until: *valid_until,
            next_verification_at: *next_verification_at,
        }),
        CertificationStatus::Eligible {
            valid_until,
            next_verification_at,
        } => Some(CertificationWindowDto {
            cert_id: None,
            valid_until: *valid_until,
            next_verification_at: *next_verification_at,
        }),
        CertificationStatus::NotApplicable
        | CertificationStatus::NotEligible
        | CertificationStatus::Pending => None,
    };

    CertificationProjectionDto {
        agent_id: record.system_id.to_string(),
        compliance_score: record.compliance_score,
        certification_level: record.certification_level,
        certification_status: record.status.as_str().to_string(),
        requirements: RequirementsDto {
            total: record.requirements.total,
            completed: record.requirements.completed,
            percentage: record.requirements.percentage,
        },
        checks: ChecksDto {
            sdk_connected: record.checks.sdk_connected,
            hitl_rules_active: record.checks.hitl_rules_active,
            no_open_incidents: record.checks.no_open_incidents,
            logging_active: record.checks.logging_active,
        },
        bonus_points: record.bonus_points,
        certification,
    }
}

#[must_use]
pub fn certificate_dto(cert: &IssuedCertificate, now: DateTime<Utc>) -> CertificateDto {
    CertificateDto {
        cert_id: cert.cert_id.to_string(),
        organization_id: cert.organization_id.to_string(),
        organization_name: cert.organization_name.clone(),
        system_id: cert.system_id.to_string(),
        system_name: cert.system_name.clone(),
        risk_level: cert.risk_level,
        level: cert.level,
        score: cert.score,
        issued_at: cert.issued_at,
        valid_until: cert.valid_until,
        next_verification_at: cert.next_verification_at,
        expired: cert.is_expired(now),
    }
}
