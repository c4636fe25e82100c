// SPDX-License-Identifier: Apache-2.0

use aiact_model::{
    CertificationLevel, CertificationStatus, ComplianceCertification, IssuedCertificate,
    TenantContext,
};
use aiact_policies::{LifecyclePolicy, ScoringPolicy};
use chrono::{DateTime, Duration, Months, Utc};

use crate::engine_error::EngineError;
use crate::progress::requirements_progress;
use crate::score::compute_score;
use crate::signals::derive_checks;
use crate::snapshot::SystemSnapshot;
use crate::tier::classify_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateWindow {
    pub issued_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub next_verification_at: DateTime<Utc>,
}

/// Validity runs `validity_months` calendar months from issuance, landing on
/// the last day of the month when the day does not exist (Jan 31 -> Feb 28).
/// Re-verification never falls after expiry.
pub fn certificate_window(
    issued_at: DateTime<Utc>,
    lifecycle: &LifecyclePolicy,
) -> Result<CertificateWindow, EngineError> {
    let valid_until = issued_at
        .checked_add_months(Months::new(lifecycle.validity_months))
        .ok_or_else(|| {
            EngineError::WindowOutOfRange(format!(
                "{issued_at} + {} months",
                lifecycle.validity_months
            ))
        })?;
    let reverify = issued_at
        .checked_add_signed(Duration::days(i64::from(
            lifecycle.reverification_interval_days,
        )))
        .ok_or_else(|| {
            EngineError::WindowOutOfRange(format!(
                "{issued_at} + {} days",
                lifecycle.reverification_interval_days
            ))
        })?;
    Ok(CertificateWindow {
        issued_at,
        valid_until,
        next_verification_at: reverify.min(valid_until),
    })
}

/// Recomputes score, level and status for one system at `now`.
pub fn project_certification(
    ctx: &TenantContext,
    snapshot: &SystemSnapshot,
    now: DateTime<Utc>,
    policy: &ScoringPolicy,
) -> Result<ComplianceCertification, EngineError> {
    ensure_tenant(ctx, snapshot)?;

    let system = &snapshot.system;
    let requirements = requirements_progress(system.risk_level, &snapshot.completed_requirements);
    let checks = derive_checks(
        snapshot.telemetry.as_ref(),
        &snapshot.incidents,
        now,
        &policy.signals,
    );
    let breakdown = compute_score(requirements.percentage, &checks, &policy.weights);
    let certification_level = classify_level(breakdown.score, &policy.tiers);

    let mut record = ComplianceCertification {
        system_id: system.id.clone(),
        compliance_score: breakdown.score,
        certification_level,
        status: CertificationStatus::Pending,
        requirements,
        checks,
        bonus_points: breakdown.bonus,
    };

    record.status = if requirements.is_not_applicable() {
        CertificationStatus::NotApplicable
    } else if breakdown.score < policy.lifecycle.not_eligible_below {
        CertificationStatus::NotEligible
    } else if !record.qualifies() {
        CertificationStatus::Pending
    } else if let Some(cert) = live_certificate(ctx, snapshot, certification_level, now) {
        CertificationStatus::Certified {
            cert_id: cert.cert_id.clone(),
            valid_until: cert.valid_until,
            next_verification_at: cert.next_verification_at,
        }
    } else {
        let window = certificate_window(now, &policy.lifecycle)?;
        CertificationStatus::Eligible {
            valid_until: window.valid_until,
            next_verification_at: window.next_verification_at,
        }
    };

    Ok(record)
}

/// A stored certificate only counts while it is unexpired and still matches
/// the level the system scores today.
fn live_certificate<'a>(
    ctx: &TenantContext,
    snapshot: &'a SystemSnapshot,
    level: CertificationLevel,
    now: DateTime<Utc>,
) -> Option<&'a IssuedCertificate> {
    snapshot.certificate.as_ref().filter(|cert| {
        cert.system_id == snapshot.system.id
            && ctx.owns(&cert.organization_id)
            && cert.level == level
            && !cert.is_expired(now)
    })
}

pub(crate) fn ensure_tenant(
    ctx: &TenantContext,
    snapshot: &SystemSnapshot,
) -> Result<(), EngineError> {
    for owner in [&snapshot.system.organization_id, &snapshot.organization.id] {
        if !ctx.owns(owner) {
            return Err(EngineError::TenantMismatch {
                expected: ctx.organization_id.to_string(),
                actual: owner.to_string(),
            });
        }
    }
    Ok(())
}
