// SPDX-License-Identifier: Apache-2.0

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use aiact_core::CertId;
use aiact_model::{CertificationLevel, RiskLevel};
use aiact_server::{ApiConfig, ComplianceStore, FakeStore, SqliteStore};
use chrono::Duration;
use support::{get, issued, now, post, serve, snapshot, state_at, tenant_of, ORG};

const TENANT: (&str, &str) = ("x-organization-id", ORG);

#[tokio::test]
async fn projection_issuance_and_certificate_routes() {
    let store = Arc::new(FakeStore::with_snapshots([snapshot(
        "sys-credit",
        RiskLevel::High,
        usize::MAX,
        true,
    )]));
    let addr = serve(state_at(store, ApiConfig::default(), now())).await;

    let resp = get(addr, "/v1/systems/sys-credit/certification", &[TENANT]).await;
    assert_eq!(resp.status, 200);
    let projection = resp.json();
    assert_eq!(projection["agent_id"], "sys-credit");
    assert_eq!(projection["compliance_score"], 100);
    assert_eq!(projection["certification_level"], "gold");
    assert_eq!(projection["certification_status"], "eligible");
    assert_eq!(projection["bonus_points"], 15);
    assert_eq!(projection["requirements"]["percentage"], 100);
    assert!(projection["certification"]["cert_id"].is_null());
    assert_eq!(
        projection["certification"]["valid_until"],
        "2027-04-15T10:00:00Z"
    );

    let issued = post(addr, "/v1/systems/sys-credit/certificate", &[TENANT], b"").await;
    assert_eq!(issued.status, 201);
    let cert = issued.json();
    let cert_id = cert["cert_id"].as_str().expect("cert id").to_string();
    assert!(cert_id.starts_with("AIC-2026-"));
    assert_eq!(cert_id.len(), "AIC-2026-".len() + 8);
    assert_eq!(cert["expired"], false);
    assert_eq!(cert["next_verification_at"], "2026-07-14T10:00:00Z");

    let again = post(addr, "/v1/systems/sys-credit/certificate", &[TENANT], b"").await;
    assert_eq!(again.status, 200);
    assert_eq!(again.json()["cert_id"], cert_id.as_str());

    let resp = get(addr, "/v1/systems/sys-credit/certification", &[TENANT]).await;
    let projection = resp.json();
    assert_eq!(projection["certification_status"], "certified");
    assert_eq!(projection["certification"]["cert_id"], cert_id.as_str());

    let resp = get(addr, &format!("/v1/certificates/{cert_id}"), &[TENANT]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json()["system_name"], "Credit <scoring>");

    let foreign = get(
        addr,
        &format!("/v1/certificates/{cert_id}"),
        &[("x-organization-id", "org-other")],
    )
    .await;
    assert_eq!(foreign.status, 404);
    assert_eq!(foreign.error_code(), "CertificateNotFound");

    let pdf = get(addr, &format!("/v1/certificates/{cert_id}/pdf"), &[TENANT]).await;
    assert_eq!(pdf.status, 200);
    assert_eq!(pdf.header("content-type").as_deref(), Some("application/pdf"));
    assert_eq!(
        pdf.header("content-disposition"),
        Some(format!("inline; filename=\"{cert_id}.pdf\""))
    );
    assert!(pdf.body.starts_with(b"%PDF-1.4"));
    assert_eq!(pdf.header("x-certificate-state").as_deref(), Some("valid"));

    let attachment = get(
        addr,
        &format!("/v1/certificates/{cert_id}/pdf?disposition=attachment"),
        &[TENANT],
    )
    .await;
    assert!(attachment
        .header("content-disposition")
        .is_some_and(|v| v.starts_with("attachment;")));
    assert_eq!(attachment.body, pdf.body);

    let bogus = get(
        addr,
        &format!("/v1/certificates/{cert_id}/pdf?disposition=sideways"),
        &[TENANT],
    )
    .await;
    assert_eq!(bogus.status, 400);
    assert_eq!(bogus.error_code(), "InvalidQueryParameter");

    let badge = get(addr, &format!("/v1/badges/{cert_id}"), &[]).await;
    assert_eq!(badge.status, 200);
    assert!(badge
        .header("content-type")
        .is_some_and(|v| v.starts_with("image/svg+xml")));
    let svg = badge.text();
    assert!(svg.contains("viewBox=\"0 0 280 120\""));
    assert!(svg.contains(&cert_id));
    assert!(svg.contains("Credit &lt;scoring&gt;"));

    let compact = get(addr, &format!("/v1/badges/{cert_id}?style=compact"), &[]).await;
    assert!(compact.text().contains("viewBox=\"0 0 200 36\""));
    let fallback = get(addr, &format!("/v1/badges/{cert_id}?style=neon"), &[]).await;
    assert_eq!(fallback.status, 200);
    assert_eq!(fallback.body, badge.body);
}

#[tokio::test]
async fn tenant_and_lookup_errors_use_the_error_envelope() {
    let store = Arc::new(FakeStore::with_snapshots([
        snapshot("sys-pending", RiskLevel::High, 6, false),
        snapshot("sys-gold", RiskLevel::High, usize::MAX, true),
    ]));
    let addr = serve(state_at(store, ApiConfig::default(), now())).await;

    let missing = get(
        addr,
        "/v1/systems/sys-gold/certification",
        &[("x-request-id", "req-fixed")],
    )
    .await;
    assert_eq!(missing.status, 400);
    assert_eq!(missing.error_code(), "MissingTenant");
    assert_eq!(missing.json()["error"]["request_id"], "req-fixed");
    assert_eq!(missing.header("x-request-id").as_deref(), Some("req-fixed"));

    let generated = get(addr, "/v1/systems/sys-gold/certification", &[]).await;
    let echoed = generated.header("x-request-id").expect("request id header");
    assert!(echoed.starts_with("req-"));
    assert_eq!(generated.json()["error"]["request_id"], echoed.as_str());

    let other_tenant = get(
        addr,
        "/v1/systems/sys-gold/certification",
        &[("x-organization-id", "org-other")],
    )
    .await;
    assert_eq!(other_tenant.status, 404);
    assert_eq!(other_tenant.error_code(), "SystemNotFound");

    let bad_id = get(addr, "/v1/systems/bad.id/certification", &[TENANT]).await;
    assert_eq!(bad_id.status, 400);
    assert_eq!(bad_id.error_code(), "InvalidPathParameter");

    let pending = get(addr, "/v1/systems/sys-pending/certification", &[TENANT]).await;
    let projection = pending.json();
    assert_eq!(projection["compliance_score"], 55);
    assert_eq!(projection["certification_status"], "pending");
    assert!(projection["certification"].is_null());

    let refused = post(addr, "/v1/systems/sys-pending/certificate", &[TENANT], b"").await;
    assert_eq!(refused.status, 422);
    let err = refused.json();
    assert_eq!(err["error"]["code"], "NotQualified");
    assert_eq!(err["error"]["details"]["compliance_score"], 55);

    let unknown = get(addr, "/v1/certificates/AIC-2026-00000000", &[TENANT]).await;
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.error_code(), "CertificateNotFound");

    let placeholder = get(addr, "/v1/badges/AIC-2026-00000000?style=detailed", &[]).await;
    assert_eq!(placeholder.status, 200);
    let svg = placeholder.text();
    assert!(svg.contains("Certificate Not Found"));
    assert!(svg.contains("viewBox=\"0 0 340 200\""));

    let malformed = get(addr, "/v1/badges/not.an.id", &[]).await;
    assert_eq!(malformed.status, 200);
    assert!(malformed.text().contains("Certificate Not Found"));

    for path in [
        "/v1/certificates/AIC-2026-00000000/pdf",
        "/v1/certificates/not.an.id/pdf",
    ] {
        let pdf = get(addr, path, &[TENANT]).await;
        assert_eq!(pdf.status, 200, "{path}");
        assert_eq!(pdf.header("content-type").as_deref(), Some("application/pdf"));
        assert_eq!(pdf.header("x-certificate-state").as_deref(), Some("not_found"));
        assert_eq!(
            pdf.header("content-disposition").as_deref(),
            Some("inline; filename=\"certificate.pdf\"")
        );
        assert!(pdf.text().contains("Certificate Not Found"));
    }
    let anonymous = get(addr, "/v1/certificates/AIC-2026-00000000/pdf", &[]).await;
    assert_eq!(anonymous.status, 400);
    assert_eq!(anonymous.error_code(), "MissingTenant");
}

#[tokio::test]
async fn expired_certificates_render_stamped_and_can_be_reissued() {
    let store = Arc::new(FakeStore::with_snapshots([snapshot(
        "sys-credit",
        RiskLevel::Limited,
        usize::MAX,
        true,
    )]));
    let issuing = serve(state_at(store.clone(), ApiConfig::default(), now())).await;
    let issued = post(issuing, "/v1/systems/sys-credit/certificate", &[TENANT], b"").await;
    assert_eq!(issued.status, 201);
    let cert_id = issued.json()["cert_id"]
        .as_str()
        .expect("cert id")
        .to_string();

    let later = serve(state_at(store, ApiConfig::default(), now() + Duration::days(400))).await;

    let pdf = get(later, &format!("/v1/certificates/{cert_id}/pdf"), &[TENANT]).await;
    assert_eq!(pdf.status, 200);
    assert_eq!(pdf.header("x-certificate-state").as_deref(), Some("expired"));
    assert_eq!(
        pdf.header("content-disposition"),
        Some(format!("inline; filename=\"{cert_id}.pdf\""))
    );
    let text = pdf.text();
    assert_eq!(text.matches("Certificate Expired").count(), 2);
    assert!(text.contains(&cert_id));

    let foreign = get(
        later,
        &format!("/v1/certificates/{cert_id}/pdf"),
        &[("x-organization-id", "org-other")],
    )
    .await;
    assert_eq!(foreign.status, 200);
    assert_eq!(foreign.header("x-certificate-state").as_deref(), Some("not_found"));
    assert!(!foreign.text().contains(&cert_id));

    let json = get(later, &format!("/v1/certificates/{cert_id}"), &[TENANT]).await;
    assert_eq!(json.status, 200);
    assert_eq!(json.json()["expired"], true);

    let badge = get(later, &format!("/v1/badges/{cert_id}"), &[]).await;
    assert_eq!(badge.status, 200);
    assert!(badge.text().contains("Certificate Expired"));

    let projection = get(later, "/v1/systems/sys-credit/certification", &[TENANT]).await;
    let projection = projection.json();
    assert_eq!(projection["certification_status"], "eligible");
    assert!(projection["certification"]["cert_id"].is_null());

    let reissued = post(later, "/v1/systems/sys-credit/certificate", &[TENANT], b"").await;
    assert_eq!(reissued.status, 201);
    assert_ne!(reissued.json()["cert_id"], cert_id.as_str());
}

#[tokio::test]
async fn document_pdf_validation_and_limits() {
    let api = ApiConfig {
        max_body_bytes: 2048,
        ..ApiConfig::default()
    };
    let addr = serve(state_at(Arc::new(FakeStore::default()), api, now())).await;
    let json_ct = ("content-type", "application/json");

    let doc = br#"{"title":"Risk management plan","sections":[{"heading":"Scope","body":"Credit decisions (retail)."},{"heading":"Residual risk","body":null}]}"#;
    let ok = post(addr, "/v1/documents/pdf", &[TENANT, json_ct], doc).await;
    assert_eq!(ok.status, 200);
    assert_eq!(ok.header("content-type").as_deref(), Some("application/pdf"));
    assert!(ok.body.starts_with(b"%PDF-1.4"));
    let repeat = post(addr, "/v1/documents/pdf", &[TENANT, json_ct], doc).await;
    assert_eq!(repeat.body, ok.body);

    let no_tenant = post(addr, "/v1/documents/pdf", &[json_ct], doc).await;
    assert_eq!(no_tenant.status, 400);
    assert_eq!(no_tenant.error_code(), "MissingTenant");

    let malformed = post(addr, "/v1/documents/pdf", &[TENANT, json_ct], b"{\"title\":").await;
    assert_eq!(malformed.status, 400);
    assert_eq!(malformed.error_code(), "ValidationFailed");

    let unknown_field = post(
        addr,
        "/v1/documents/pdf",
        &[TENANT, json_ct],
        br#"{"title":"t","sections":[],"author":"x"}"#,
    )
    .await;
    assert_eq!(unknown_field.error_code(), "ValidationFailed");

    let loose = br#"{"title":"Risk plan","sections":[{"heading":"Count","body":42},{"heading":"List","body":["a"],"note":"x"},{"heading":"Scope","body":"Retail credit."}]}"#;
    let lenient = post(addr, "/v1/documents/pdf", &[TENANT, json_ct], loose).await;
    assert_eq!(lenient.status, 200);
    let text = lenient.text();
    assert_eq!(text.matches("This section has not been completed yet.").count(), 2);
    assert!(text.contains("Retail credit."));

    let long_title = format!(r#"{{"title":"{}","sections":[]}}"#, "t".repeat(300));
    let too_long = post(addr, "/v1/documents/pdf", &[TENANT, json_ct], long_title.as_bytes()).await;
    assert_eq!(too_long.status, 400);
    assert_eq!(too_long.json()["error"]["details"]["field_errors"][0]["field"], "title");

    let huge = format!(
        r#"{{"title":"t","sections":[{{"heading":"h","body":"{}"}}]}}"#,
        "x".repeat(4096)
    );
    let rejected = post(addr, "/v1/documents/pdf", &[TENANT, json_ct], huge.as_bytes()).await;
    assert_eq!(rejected.status, 413);
    assert_eq!(rejected.error_code(), "PayloadTooLarge");
}

#[tokio::test]
async fn concurrent_issue_requests_share_one_certificate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sqlite = SqliteStore::open(dir.path().join("aiact.sqlite")).expect("open store");
    let snap = snapshot("sys-credit", RiskLevel::High, usize::MAX, true);
    sqlite
        .put_snapshot(&tenant_of(&snap), &snap)
        .await
        .expect("put");
    let stores: [Arc<dyn ComplianceStore>; 2] =
        [Arc::new(FakeStore::with_snapshots([snap])), Arc::new(sqlite)];

    for store in stores {
        let tag = store.backend_tag();
        let addr = serve(state_at(store, ApiConfig::default(), now())).await;
        let path = "/v1/systems/sys-credit/certificate";
        let (a, b) = tokio::join!(
            post(addr, path, &[TENANT], b""),
            post(addr, path, &[TENANT], b"")
        );
        let mut statuses = [a.status, b.status];
        statuses.sort_unstable();
        assert_eq!(statuses, [200, 201], "{tag}");
        assert_eq!(a.json()["cert_id"], b.json()["cert_id"], "{tag}");
    }
}

#[tokio::test]
async fn certificate_below_current_level_is_replaced_on_issue() {
    let mut snap = snapshot("sys-credit", RiskLevel::High, usize::MAX, true);
    let mut silver = issued(&snap, now());
    silver.level = CertificationLevel::Silver;
    silver.cert_id = CertId::new("AIC-2026-51E00000").expect("id");
    snap.certificate = Some(silver.clone());
    let addr = serve(state_at(
        Arc::new(FakeStore::with_snapshots([snap])),
        ApiConfig::default(),
        now(),
    ))
    .await;

    let projection = get(addr, "/v1/systems/sys-credit/certification", &[TENANT]).await.json();
    assert_eq!(projection["certification_level"], "gold");
    assert_eq!(projection["certification_status"], "eligible");

    let upgraded = post(addr, "/v1/systems/sys-credit/certificate", &[TENANT], b"").await;
    assert_eq!(upgraded.status, 201);
    let cert = upgraded.json();
    assert_eq!(cert["level"], "gold");
    assert_ne!(cert["cert_id"], silver.cert_id.as_str());

    let projection = get(addr, "/v1/systems/sys-credit/certification", &[TENANT]).await.json();
    assert_eq!(projection["certification_status"], "certified");
    assert_eq!(projection["certification"]["cert_id"], cert["cert_id"]);
}

#[tokio::test]
async fn store_outage_degrades_without_breaking_badges() {
    let store = Arc::new(FakeStore::with_snapshots([snapshot(
        "sys-credit",
        RiskLevel::High,
        usize::MAX,
        true,
    )]));
    store.unavailable.store(true, Ordering::Relaxed);
    let addr = serve(state_at(store.clone(), ApiConfig::default(), now())).await;

    let resp = get(addr, "/v1/systems/sys-credit/certification", &[TENANT]).await;
    assert_eq!(resp.status, 503);
    assert_eq!(resp.error_code(), "UpstreamStoreUnavailable");
    assert_eq!(resp.header("retry-after").as_deref(), Some("3"));

    assert_eq!(get(addr, "/readyz", &[]).await.status, 503);
    assert_eq!(get(addr, "/healthz", &[]).await.status, 200);

    let badge = get(addr, "/v1/badges/AIC-2026-ABCDEF01", &[]).await;
    assert_eq!(badge.status, 200);
    assert!(badge.text().contains("Certificate Not Found"));

    let metrics = get(addr, "/metrics", &[]).await.text();
    assert!(metrics.contains("aiact_store_errors_total 3"));
    assert!(metrics.contains(
        "aiact_http_requests_total{route=\"/v1/systems/:system_id/certification\",status=\"503\"} 1"
    ));

    store.unavailable.store(false, Ordering::Relaxed);
    assert_eq!(get(addr, "/readyz", &[]).await.status, 200);
}

#[tokio::test]
async fn version_and_openapi_describe_the_service() {
    let addr = serve(state_at(Arc::new(FakeStore::default()), ApiConfig::default(), now())).await;

    let version = get(addr, "/v1/version", &[]).await.json();
    assert_eq!(version["service"], "aiact-server");
    assert_eq!(version["api_version"], "v1");
    assert_eq!(version["policy_schema_version"], "1");
    assert_eq!(version["policy_hash"].as_str().map(str::len), Some(64));

    let spec = get(addr, "/v1/openapi.json", &[]).await.json();
    for path in [
        "/v1/systems/{system_id}/certification",
        "/v1/systems/{system_id}/certificate",
        "/v1/certificates/{cert_id}/pdf",
        "/v1/badges/{cert_id}",
        "/v1/documents/pdf",
    ] {
        assert!(spec["paths"].get(path).is_some(), "missing {path}");
    }
}
