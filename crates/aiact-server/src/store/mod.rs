// SPDX-License-Identifier: Apache-2.0

use aiact_core::{CertId, OrganizationId, SystemId};
use aiact_engine::SystemSnapshot;
use aiact_model::{IssuedCertificate, TenantContext};
use async_trait::async_trait;

pub mod fake;
pub mod sqlite;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// Backend could not be reached or timed out.
    Unavailable(String),
    /// Stored data failed to decode.
    Corrupt(String),
    /// Write attempted on behalf of a tenant that does not own the record.
    TenantMismatch { expected: String, actual: String },
    /// A write would overwrite a different record stored under the same key.
    Conflict(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            Self::Corrupt(msg) => write!(f, "store data corrupt: {msg}"),
            Self::TenantMismatch { expected, actual } => {
                write!(f, "tenant mismatch: expected {expected}, got {actual}")
            }
            Self::Conflict(msg) => write!(f, "store conflict: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    /// A live certificate already covered the request; nothing was written.
    Existing(IssuedCertificate),
}

/// Persistence seam. Reads are tenant scoped except the certificate lookup,
/// which backs the public badge route.
#[async_trait]
pub trait ComplianceStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    async fn health(&self) -> Result<(), StoreError>;

    /// Everything needed to project one system, or `None` when the tenant
    /// has no such system.
    async fn load_snapshot(
        &self,
        ctx: &TenantContext,
        system_id: &SystemId,
    ) -> Result<Option<SystemSnapshot>, StoreError>;

    /// Records a freshly issued certificate unless a live one at the same
    /// level, or the very same certificate, is already stored. Check and
    /// insert happen atomically.
    async fn save_certificate(
        &self,
        ctx: &TenantContext,
        certificate: &IssuedCertificate,
    ) -> Result<SaveOutcome, StoreError>;

    async fn find_certificate(
        &self,
        cert_id: &CertId,
    ) -> Result<Option<IssuedCertificate>, StoreError>;

    /// Replaces the stored state of one of the tenant's systems.
    async fn put_snapshot(
        &self,
        ctx: &TenantContext,
        snapshot: &SystemSnapshot,
    ) -> Result<(), StoreError>;
}

fn ensure_org(ctx: &TenantContext, actual: &OrganizationId) -> Result<(), StoreError> {
    if ctx.owns(actual) {
        Ok(())
    } else {
        Err(StoreError::TenantMismatch {
            expected: ctx.organization_id.to_string(),
            actual: actual.to_string(),
        })
    }
}

pub(crate) fn ensure_owner(
    ctx: &TenantContext,
    certificate: &IssuedCertificate,
) -> Result<(), StoreError> {
    ensure_org(ctx, &certificate.organization_id)
}

/// The organization, the system and any embedded certificate must all belong
/// to `ctx`, and the certificate must be for the snapshot's system.
pub(crate) fn ensure_snapshot_owner(
    ctx: &TenantContext,
    snapshot: &SystemSnapshot,
) -> Result<(), StoreError> {
    ensure_org(ctx, &snapshot.organization.id)?;
    ensure_org(ctx, &snapshot.system.organization_id)?;
    if let Some(cert) = &snapshot.certificate {
        ensure_owner(ctx, cert)?;
        if cert.system_id != snapshot.system.id {
            return Err(StoreError::Conflict(format!(
                "certificate {} belongs to system {}, not {}",
                cert.cert_id, cert.system_id, snapshot.system.id
            )));
        }
    }
    Ok(())
}

/// `current` already covers `candidate`: same system and level, still live at
/// the candidate's issuance instant.
pub(crate) fn supersedes(current: &IssuedCertificate, candidate: &IssuedCertificate) -> bool {
    current.organization_id == candidate.organization_id
        && current.system_id == candidate.system_id
        && current.level == candidate.level
        && !current.is_expired(candidate.issued_at)
}

/// Certificate ids are immutable once stored; only an identical rewrite is
/// accepted.
pub(crate) fn ensure_same_certificate(
    existing: &IssuedCertificate,
    incoming: &IssuedCertificate,
) -> Result<(), StoreError> {
    if existing == incoming {
        Ok(())
    } else {
        Err(StoreError::Conflict(format!(
            "certificate id {} is already taken",
            incoming.cert_id
        )))
    }
}
