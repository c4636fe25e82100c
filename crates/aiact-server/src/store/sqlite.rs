// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aiact_core::{CertId, SystemId};
use aiact_engine::SystemSnapshot;
use aiact_model::{AgentTelemetry, AiSystem, Incident, IssuedCertificate, Organization, TenantContext};
use async_trait::async_trait;
use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    ensure_owner, ensure_same_certificate, ensure_snapshot_owner, supersedes, ComplianceStore,
    SaveOutcome, StoreError,
};

pub const SQLITE_SCHEMA_VERSION: i64 = 2;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA_SQL: &str = "
    PRAGMA journal_mode=WAL;
    CREATE TABLE IF NOT EXISTS organizations (
      id TEXT PRIMARY KEY,
      payload TEXT NOT NULL
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS systems (
      organization_id TEXT NOT NULL REFERENCES organizations(id),
      id TEXT NOT NULL,
      payload TEXT NOT NULL,
      PRIMARY KEY (organization_id, id)
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS completed_requirements (
      organization_id TEXT NOT NULL,
      system_id TEXT NOT NULL,
      requirement_id TEXT NOT NULL,
      PRIMARY KEY (organization_id, system_id, requirement_id),
      FOREIGN KEY (organization_id, system_id) REFERENCES systems(organization_id, id)
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS telemetry (
      organization_id TEXT NOT NULL,
      system_id TEXT NOT NULL,
      payload TEXT NOT NULL,
      PRIMARY KEY (organization_id, system_id),
      FOREIGN KEY (organization_id, system_id) REFERENCES systems(organization_id, id)
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS incidents (
      organization_id TEXT NOT NULL,
      system_id TEXT NOT NULL,
      incident_id TEXT NOT NULL,
      payload TEXT NOT NULL,
      PRIMARY KEY (organization_id, system_id, incident_id),
      FOREIGN KEY (organization_id, system_id) REFERENCES systems(organization_id, id)
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS certificates (
      cert_id TEXT PRIMARY KEY,
      organization_id TEXT NOT NULL,
      system_id TEXT NOT NULL,
      issued_at TEXT NOT NULL,
      payload TEXT NOT NULL
    ) WITHOUT ROWID;
    CREATE INDEX IF NOT EXISTS idx_certificates_system
      ON certificates (organization_id, system_id, issued_at);
";

/// File-backed store. Every call opens its own connection on the blocking
/// pool, so the handle itself is just a path.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Checks the recorded schema version, creating the schema in a fresh
    /// database.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        let conn = store.connect()?;
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(unavailable)?;
        match version {
            0 => conn
                .execute_batch(&format!(
                    "{SCHEMA_SQL}\nPRAGMA user_version={SQLITE_SCHEMA_VERSION};"
                ))
                .map_err(unavailable)?,
            SQLITE_SCHEMA_VERSION => {}
            other => {
                return Err(StoreError::Corrupt(format!(
                    "unsupported sqlite schema version {other}"
                )))
            }
        }
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path).map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
        Ok(conn)
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connect()?;
            op(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

fn unavailable(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn issued_at_key(cert: &IssuedCertificate) -> String {
    cert.issued_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn read_snapshot(
    conn: &Connection,
    ctx: &TenantContext,
    system_id: &SystemId,
) -> Result<Option<SystemSnapshot>, StoreError> {
    let (org, sys) = (ctx.organization_id.as_str(), system_id.as_str());
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT s.payload, o.payload FROM systems s
             JOIN organizations o ON o.id = s.organization_id
             WHERE s.organization_id = ?1 AND s.id = ?2",
            params![org, sys],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(unavailable)?;
    let Some((system_raw, org_raw)) = row else {
        return Ok(None);
    };
    let system: AiSystem = decode(&system_raw)?;
    let organization: Organization = decode(&org_raw)?;

    let mut stmt = conn
        .prepare(
            "SELECT requirement_id FROM completed_requirements
             WHERE organization_id = ?1 AND system_id = ?2 ORDER BY requirement_id",
        )
        .map_err(unavailable)?;
    let completed_requirements: BTreeSet<String> = stmt
        .query_map(params![org, sys], |row| row.get::<_, String>(0))
        .map_err(unavailable)?
        .collect::<Result<_, _>>()
        .map_err(unavailable)?;

    let telemetry = conn
        .query_row(
            "SELECT payload FROM telemetry WHERE organization_id = ?1 AND system_id = ?2",
            params![org, sys],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(unavailable)?
        .map(|raw| decode::<AgentTelemetry>(&raw))
        .transpose()?;

    let mut stmt = conn
        .prepare(
            "SELECT payload FROM incidents
             WHERE organization_id = ?1 AND system_id = ?2 ORDER BY incident_id",
        )
        .map_err(unavailable)?;
    let incidents = stmt
        .query_map(params![org, sys], |row| row.get::<_, String>(0))
        .map_err(unavailable)?
        .map(|raw| decode::<Incident>(&raw.map_err(unavailable)?))
        .collect::<Result<Vec<_>, _>>()?;

    let certificate = latest_certificate(conn, org, sys)?;

    Ok(Some(SystemSnapshot {
        organization,
        system,
        completed_requirements,
        telemetry,
        incidents,
        certificate,
    }))
}

fn latest_certificate(
    conn: &Connection,
    organization_id: &str,
    system_id: &str,
) -> Result<Option<IssuedCertificate>, StoreError> {
    conn.query_row(
        "SELECT payload FROM certificates
         WHERE organization_id = ?1 AND system_id = ?2
         ORDER BY issued_at DESC, cert_id DESC LIMIT 1",
        params![organization_id, system_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(unavailable)?
    .map(|raw| decode::<IssuedCertificate>(&raw))
    .transpose()
}

fn certificate_by_id(
    conn: &Connection,
    cert_id: &str,
) -> Result<Option<IssuedCertificate>, StoreError> {
    conn.query_row(
        "SELECT payload FROM certificates WHERE cert_id = ?1",
        params![cert_id],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map_err(unavailable)?
    .map(|raw| decode::<IssuedCertificate>(&raw))
    .transpose()
}

/// Inserts `cert` unless its id is taken. Rewriting an identical row is a
/// no-op; anything else under the same id is a conflict.
fn insert_certificate(conn: &Connection, cert: &IssuedCertificate) -> Result<(), StoreError> {
    let inserted = conn
        .execute(
            "INSERT INTO certificates (cert_id, organization_id, system_id, issued_at, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(cert_id) DO NOTHING",
            params![
                cert.cert_id.as_str(),
                cert.organization_id.as_str(),
                cert.system_id.as_str(),
                issued_at_key(cert),
                encode(cert)?,
            ],
        )
        .map_err(unavailable)?;
    if inserted == 0 {
        if let Some(existing) = certificate_by_id(conn, cert.cert_id.as_str())? {
            ensure_same_certificate(&existing, cert)?;
        }
    }
    Ok(())
}

/// Holds the write lock from the live-certificate check through the insert,
/// so concurrent issuers for one system settle on a single certificate.
fn issue_certificate_row(
    conn: &mut Connection,
    cert: &IssuedCertificate,
) -> Result<SaveOutcome, StoreError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(unavailable)?;
    if let Some(existing) = certificate_by_id(&tx, cert.cert_id.as_str())? {
        ensure_same_certificate(&existing, cert)?;
        return Ok(SaveOutcome::Existing(existing));
    }
    let current = latest_certificate(&tx, cert.organization_id.as_str(), cert.system_id.as_str())?;
    if let Some(current) = current.filter(|c| supersedes(c, cert)) {
        return Ok(SaveOutcome::Existing(current));
    }
    insert_certificate(&tx, cert)?;
    tx.commit().map_err(unavailable)?;
    Ok(SaveOutcome::Inserted)
}

fn write_snapshot(conn: &mut Connection, snapshot: &SystemSnapshot) -> Result<(), StoreError> {
    let org = snapshot.system.organization_id.as_str();
    let sys = snapshot.system.id.as_str();
    let tx = conn.transaction().map_err(unavailable)?;
    tx.execute(
        "INSERT INTO organizations (id, payload) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET payload = excluded.payload",
        params![snapshot.organization.id.as_str(), encode(&snapshot.organization)?],
    )
    .map_err(unavailable)?;
    tx.execute(
        "INSERT INTO systems (organization_id, id, payload) VALUES (?1, ?2, ?3)
         ON CONFLICT(organization_id, id) DO UPDATE SET payload = excluded.payload",
        params![org, sys, encode(&snapshot.system)?],
    )
    .map_err(unavailable)?;
    for table in ["completed_requirements", "telemetry", "incidents"] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE organization_id = ?1 AND system_id = ?2"),
            params![org, sys],
        )
        .map_err(unavailable)?;
    }
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO completed_requirements (organization_id, system_id, requirement_id)
                 VALUES (?1, ?2, ?3)",
            )
            .map_err(unavailable)?;
        for requirement_id in &snapshot.completed_requirements {
            stmt.execute(params![org, sys, requirement_id])
                .map_err(unavailable)?;
        }
        let mut stmt = tx
            .prepare(
                "INSERT OR REPLACE INTO incidents (organization_id, system_id, incident_id, payload)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(unavailable)?;
        for incident in &snapshot.incidents {
            stmt.execute(params![org, sys, incident.id, encode(incident)?])
                .map_err(unavailable)?;
        }
    }
    if let Some(telemetry) = &snapshot.telemetry {
        tx.execute(
            "INSERT INTO telemetry (organization_id, system_id, payload) VALUES (?1, ?2, ?3)",
            params![org, sys, encode(telemetry)?],
        )
        .map_err(unavailable)?;
    }
    if let Some(cert) = &snapshot.certificate {
        insert_certificate(&tx, cert)?;
    }
    tx.commit().map_err(unavailable)
}

#[async_trait]
impl ComplianceStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn health(&self) -> Result<(), StoreError> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map(|_| ())
                .map_err(unavailable)
        })
        .await
    }

    async fn load_snapshot(
        &self,
        ctx: &TenantContext,
        system_id: &SystemId,
    ) -> Result<Option<SystemSnapshot>, StoreError> {
        let ctx = ctx.clone();
        let system_id = system_id.clone();
        self.run(move |conn| read_snapshot(conn, &ctx, &system_id))
            .await
    }

    async fn save_certificate(
        &self,
        ctx: &TenantContext,
        certificate: &IssuedCertificate,
    ) -> Result<SaveOutcome, StoreError> {
        ensure_owner(ctx, certificate)?;
        let certificate = certificate.clone();
        self.run(move |conn| issue_certificate_row(conn, &certificate))
            .await
    }

    async fn find_certificate(
        &self,
        cert_id: &CertId,
    ) -> Result<Option<IssuedCertificate>, StoreError> {
        let cert_id = cert_id.clone();
        self.run(move |conn| certificate_by_id(conn, cert_id.as_str()))
            .await
    }

    async fn put_snapshot(
        &self,
        ctx: &TenantContext,
        snapshot: &SystemSnapshot,
    ) -> Result<(), StoreError> {
        ensure_snapshot_owner(ctx, snapshot)?;
        let snapshot = snapshot.clone();
        self.run(move |conn| write_snapshot(conn, &snapshot)).await
    }
}
