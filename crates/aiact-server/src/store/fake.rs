// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use aiact_core::{CertId, OrganizationId, SystemId};
use aiact_engine::SystemSnapshot;
use aiact_model::{IssuedCertificate, TenantContext};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    ensure_owner, ensure_same_certificate, ensure_snapshot_owner, supersedes, ComplianceStore,
    SaveOutcome, StoreError,
};

pub type SystemKey = (OrganizationId, SystemId);

fn key_of(snapshot: &SystemSnapshot) -> SystemKey {
    (
        snapshot.system.organization_id.clone(),
        snapshot.system.id.clone(),
    )
}

/// In-memory store used by tests and `AIACT_STORE=memory`.
pub struct FakeStore {
    pub snapshots: Mutex<HashMap<SystemKey, SystemSnapshot>>,
    pub certificates: Mutex<HashMap<CertId, IssuedCertificate>>,
    pub load_calls: AtomicU64,
    pub unavailable: AtomicBool,
    pub slow_read_delay: Duration,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            snapshots: Mutex::new(HashMap::new()),
            certificates: Mutex::new(HashMap::new()),
            load_calls: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
            slow_read_delay: Duration::from_millis(0),
        }
    }
}

impl FakeStore {
    #[must_use]
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = SystemSnapshot>) -> Self {
        let mut by_key = HashMap::new();
        let mut certificates = HashMap::new();
        for snapshot in snapshots {
            if let Some(cert) = &snapshot.certificate {
                certificates.insert(cert.cert_id.clone(), cert.clone());
            }
            by_key.insert(key_of(&snapshot), snapshot);
        }
        Self {
            snapshots: Mutex::new(by_key),
            certificates: Mutex::new(certificates),
            ..Self::default()
        }
    }

    async fn gate(&self) -> Result<(), StoreError> {
        if !self.slow_read_delay.is_zero() {
            tokio::time::sleep(self.slow_read_delay).await;
        }
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("fake store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ComplianceStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn health(&self) -> Result<(), StoreError> {
        self.gate().await
    }

    async fn load_snapshot(
        &self,
        ctx: &TenantContext,
        system_id: &SystemId,
    ) -> Result<Option<SystemSnapshot>, StoreError> {
        self.load_calls.fetch_add(1, Ordering::Relaxed);
        self.gate().await?;
        Ok(self
            .snapshots
            .lock()
            .await
            .get(&(ctx.organization_id.clone(), system_id.clone()))
            .cloned())
    }

    async fn save_certificate(
        &self,
        ctx: &TenantContext,
        certificate: &IssuedCertificate,
    ) -> Result<SaveOutcome, StoreError> {
        self.gate().await?;
        ensure_owner(ctx, certificate)?;
        let mut certificates = self.certificates.lock().await;
        if let Some(existing) = certificates.get(&certificate.cert_id) {
            ensure_same_certificate(existing, certificate)?;
            return Ok(SaveOutcome::Existing(existing.clone()));
        }
        let current = certificates
            .values()
            .filter(|c| {
                c.organization_id == certificate.organization_id
                    && c.system_id == certificate.system_id
            })
            .max_by(|a, b| (a.issued_at, &a.cert_id).cmp(&(b.issued_at, &b.cert_id)));
        if let Some(current) = current.filter(|c| supersedes(c, certificate)) {
            return Ok(SaveOutcome::Existing(current.clone()));
        }
        certificates.insert(certificate.cert_id.clone(), certificate.clone());
        let key = (
            certificate.organization_id.clone(),
            certificate.system_id.clone(),
        );
        if let Some(snapshot) = self.snapshots.lock().await.get_mut(&key) {
            snapshot.certificate = Some(certificate.clone());
        }
        Ok(SaveOutcome::Inserted)
    }

    async fn find_certificate(
        &self,
        cert_id: &CertId,
    ) -> Result<Option<IssuedCertificate>, StoreError> {
        self.gate().await?;
        Ok(self.certificates.lock().await.get(cert_id).cloned())
    }

    async fn put_snapshot(
        &self,
        ctx: &TenantContext,
        snapshot: &SystemSnapshot,
    ) -> Result<(), StoreError> {
        self.gate().await?;
        ensure_snapshot_owner(ctx, snapshot)?;
        if let Some(cert) = &snapshot.certificate {
            let mut certificates = self.certificates.lock().await;
            if let Some(existing) = certificates.get(&cert.cert_id) {
                ensure_same_certificate(existing, cert)?;
            }
            certificates.insert(cert.cert_id.clone(), cert.clone());
        }
        self.snapshots
            .lock()
            .await
            .insert(key_of(snapshot), snapshot.clone());
        Ok(())
    }
}
