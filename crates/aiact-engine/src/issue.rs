// SPDX-License-Identifier: Apache-2.0

use aiact_core::{stable_json_hash_hex, CertId, OrganizationId, SystemId};
use aiact_model::{CertificationLevel, ComplianceCertification, IssuedCertificate, TenantContext};
use aiact_policies::ScoringPolicy;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::json;

use crate::engine_error::{EngineError, IssueError};
use crate::lifecycle::{certificate_window, ensure_tenant};
use crate::snapshot::SystemSnapshot;

pub const CERT_ID_PREFIX: &str = "AIC";

/// `AIC-{year}-{8 upper hex}`; the hex is the prefix of the canonical hash
/// of the issuance inputs, so the same inputs always yield the same id.
pub fn derive_cert_id(
    organization_id: &OrganizationId,
    system_id: &SystemId,
    level: CertificationLevel,
    issued_at: DateTime<Utc>,
) -> Result<CertId, aiact_core::Error> {
    let digest = stable_json_hash_hex(&json!({
        "organization_id": organization_id.as_str(),
        "system_id": system_id.as_str(),
        "level": level.as_str(),
        "issued_at": issued_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    }))?;
    let short = digest[..8].to_ascii_uppercase();
    CertId::new(format!("{CERT_ID_PREFIX}-{}-{short}", issued_at.year()))
}

/// Issues a certificate for a record that qualifies at `now`.
pub fn issue_certificate(
    ctx: &TenantContext,
    snapshot: &SystemSnapshot,
    record: &ComplianceCertification,
    now: DateTime<Utc>,
    policy: &ScoringPolicy,
) -> Result<IssuedCertificate, IssueError> {
    ensure_tenant(ctx, snapshot)?;
    if record.system_id != snapshot.system.id {
        return Err(IssueError::Engine(EngineError::TenantMismatch {
            expected: snapshot.system.id.to_string(),
            actual: record.system_id.to_string(),
        }));
    }
    if !record.qualifies() {
        return Err(IssueError::NotQualified {
            status: record.status.as_str(),
            score: record.compliance_score,
            percentage: record.requirements.percentage,
        });
    }

    let window = certificate_window(now, &policy.lifecycle)?;
    let cert_id = derive_cert_id(
        &ctx.organization_id,
        &record.system_id,
        record.certification_level,
        window.issued_at,
    )?;

    Ok(IssuedCertificate {
        cert_id,
        organization_id: ctx.organization_id.clone(),
        organization_name: snapshot.organization.name.clone(),
        system_id: record.system_id.clone(),
        system_name: snapshot.system.name.clone(),
        risk_level: snapshot.system.risk_level,
        level: record.certification_level,
        score: record.compliance_score,
        issued_at: window.issued_at,
        valid_until: window.valid_until,
        next_verification_at: window.next_verification_at,
    })
}
