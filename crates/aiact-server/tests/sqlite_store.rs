// SPDX-License-Identifier: Apache-2.0

mod support;

use std::sync::Arc;

use aiact_core::{CertId, SystemId};
use aiact_engine::{issue_certificate, project_certification};
use aiact_model::{Incident, IncidentSeverity, IncidentStatus, RiskLevel, TenantContext};
use aiact_policies::ScoringPolicy;
use aiact_server::{ApiConfig, ComplianceStore, SaveOutcome, SqliteStore, StoreError};
use support::{get, now, post, serve, snapshot, state_at, ORG};
use tempfile::tempdir;

#[tokio::test]
async fn snapshots_round_trip_through_sqlite() {
    let dir = tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("aiact.sqlite")).expect("open store");
    let ctx = TenantContext::parse(ORG).expect("tenant");

    let mut snap = snapshot("sys-credit", RiskLevel::High, 7, true);
    snap.incidents.push(Incident {
        id: "inc-2".to_string(),
        system_id: snap.system.id.clone(),
        severity: IncidentSeverity::High,
        status: IncidentStatus::Investigating,
    });
    store.put_snapshot(&ctx, &snap).await.expect("put snapshot");

    let loaded = store
        .load_snapshot(&ctx, &snap.system.id)
        .await
        .expect("load")
        .expect("present");
    assert_eq!(loaded, snap);

    let other = TenantContext::parse("org-other").expect("tenant");
    assert_eq!(
        store
            .load_snapshot(&other, &snap.system.id)
            .await
            .expect("load"),
        None
    );
    let missing = SystemId::new("sys-missing").expect("id");
    assert_eq!(store.load_snapshot(&ctx, &missing).await.expect("load"), None);

    // Rewriting replaces child rows instead of appending.
    snap.incidents.clear();
    snap.completed_requirements.clear();
    snap.telemetry = None;
    store.put_snapshot(&ctx, &snap).await.expect("rewrite");
    let loaded = store
        .load_snapshot(&ctx, &snap.system.id)
        .await
        .expect("load")
        .expect("present");
    assert!(loaded.incidents.is_empty());
    assert!(loaded.completed_requirements.is_empty());
    assert_eq!(loaded.telemetry, None);
}

#[tokio::test]
async fn certificates_persist_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("aiact.sqlite");
    let ctx = TenantContext::parse(ORG).expect("tenant");
    let policy = ScoringPolicy::default();
    let snap = snapshot("sys-credit", RiskLevel::Limited, usize::MAX, true);

    let cert = {
        let store = SqliteStore::open(&path).expect("open store");
        store.put_snapshot(&ctx, &snap).await.expect("put");
        let record = project_certification(&ctx, &snap, now(), &policy).expect("project");
        let cert = issue_certificate(&ctx, &snap, &record, now(), &policy).expect("issue");
        assert_eq!(
            store.save_certificate(&ctx, &cert).await.expect("save"),
            SaveOutcome::Inserted
        );
        cert
    };

    let store = SqliteStore::open(&path).expect("reopen");
    store.health().await.expect("healthy");
    assert_eq!(
        store.find_certificate(&cert.cert_id).await.expect("find"),
        Some(cert.clone())
    );
    let loaded = store
        .load_snapshot(&ctx, &snap.system.id)
        .await
        .expect("load")
        .expect("present");
    assert_eq!(loaded.certificate, Some(cert.clone()));

    let unknown = CertId::new("AIC-2026-FFFFFFFF").expect("id");
    assert_eq!(store.find_certificate(&unknown).await.expect("find"), None);

    let mut foreign = cert.clone();
    foreign.organization_id = aiact_core::OrganizationId::new("org-other").expect("org");
    let err = store
        .save_certificate(&ctx, &foreign)
        .await
        .expect_err("foreign certificate");
    assert!(matches!(err, StoreError::TenantMismatch { .. }));
}

#[tokio::test]
async fn http_routes_work_over_sqlite() {
    let dir = tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("aiact.sqlite")).expect("open store");
    let ctx = TenantContext::parse(ORG).expect("tenant");
    store
        .put_snapshot(&ctx, &snapshot("sys-credit", RiskLevel::High, usize::MAX, true))
        .await
        .expect("put");
    let addr = serve(state_at(Arc::new(store), ApiConfig::default(), now())).await;
    let tenant = [("x-organization-id", ORG)];

    let issued = post(addr, "/v1/systems/sys-credit/certificate", &tenant, b"").await;
    assert_eq!(issued.status, 201);
    let cert_id = issued.json()["cert_id"]
        .as_str()
        .expect("cert id")
        .to_string();

    let projection = get(addr, "/v1/systems/sys-credit/certification", &tenant).await;
    assert_eq!(projection.json()["certification_status"], "certified");
    let badge = get(addr, &format!("/v1/badges/{cert_id}?style=detailed"), &[]).await;
    assert!(badge.text().contains(&cert_id));
}

#[test]
fn previous_schema_version_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("aiact.sqlite");
    let conn = rusqlite::Connection::open(&path).expect("open");
    conn.execute_batch(
        "CREATE TABLE systems (id TEXT PRIMARY KEY, organization_id TEXT, payload TEXT);
         PRAGMA user_version=1;",
    )
    .expect("v1 layout");
    drop(conn);
    let err = SqliteStore::open(&path).expect_err("version 1");
    assert!(matches!(err, StoreError::Corrupt(msg) if msg.contains("version 1")));
}

#[test]
fn schema_version_mismatch_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("aiact.sqlite");
    let conn = rusqlite::Connection::open(&path).expect("open");
    conn.execute_batch("PRAGMA user_version=99;").expect("pragma");
    drop(conn);
    let err = SqliteStore::open(&path).expect_err("version 99");
    assert!(matches!(err, StoreError::Corrupt(_)));
}
