// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use aiact_core::{OrganizationId, SystemId};
use aiact_engine::{issue_certificate, project_certification, SystemSnapshot};
use aiact_model::{
    applicable_requirements, AgentTelemetry, AiSystem, HitlRule, IssuedCertificate, Organization,
    RiskLevel, TenantContext,
};
use aiact_policies::ScoringPolicy;
use aiact_server::{build_router, ApiConfig, AppState, ComplianceStore, FixedClock};
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const ORG: &str = "org-acme";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 15, 10, 0, 0)
        .single()
        .expect("date")
}

/// A system with `completed` of its checklist done; `connected` adds a
/// live SDK with one enabled HITL rule.
pub fn snapshot(system_id: &str, risk: RiskLevel, completed: usize, connected: bool) -> SystemSnapshot {
    let org = OrganizationId::new(ORG).expect("org");
    let completed_requirements: BTreeSet<String> = applicable_requirements(risk)
        .into_iter()
        .take(completed)
        .map(|r| r.id.to_string())
        .collect();
    let telemetry = connected.then(|| AgentTelemetry {
        sdk_connected: true,
        last_event_at: Some(now() - Duration::hours(2)),
        hitl_rules: vec![HitlRule {
            id: "manual-review".to_string(),
            enabled: true,
        }],
    });
    SystemSnapshot {
        organization: Organization {
            id: org.clone(),
            name: "Acme GmbH".to_string(),
        },
        system: AiSystem::new(
            SystemId::new(system_id).expect("system id"),
            org,
            "Credit <scoring>",
            risk,
            now() - Duration::days(60),
        )
        .expect("system"),
        completed_requirements,
        telemetry,
        incidents: Vec::new(),
        certificate: None,
    }
}

/// The same snapshot handed over to another organization.
pub fn owned_by(mut snapshot: SystemSnapshot, org: &str) -> SystemSnapshot {
    let org = OrganizationId::new(org).expect("org");
    snapshot.organization = Organization {
        id: org.clone(),
        name: format!("{org} Ltd"),
    };
    snapshot.system.organization_id = org;
    snapshot
}

pub fn tenant_of(snapshot: &SystemSnapshot) -> TenantContext {
    TenantContext::new(snapshot.organization.id.clone())
}

/// Certificate for a qualifying snapshot under the default policy.
pub fn issued(snapshot: &SystemSnapshot, at: DateTime<Utc>) -> IssuedCertificate {
    let policy = ScoringPolicy::default();
    let ctx = tenant_of(snapshot);
    let record = project_certification(&ctx, snapshot, at, &policy).expect("project");
    issue_certificate(&ctx, snapshot, &record, at, &policy).expect("issue")
}

pub fn state_at(
    store: Arc<dyn ComplianceStore>,
    api: ApiConfig,
    at: DateTime<Utc>,
) -> AppState {
    AppState::with_config(store, api, ScoringPolicy::default(), Arc::new(FixedClock(at)))
}

pub async fn serve(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"]
            .as_str()
            .expect("error code")
            .to_string()
    }
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> RawResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if method != "GET" {
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    let mut bytes = req.into_bytes();
    bytes.extend_from_slice(body);
    stream.write_all(&bytes).await.expect("write request");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("http response must have separator");
    let head = String::from_utf8(response[..split].to_vec()).expect("utf8 head");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    RawResponse {
        status,
        head,
        body: response[split + 4..].to_vec(),
    }
}

pub async fn get(addr: SocketAddr, path: &str, headers: &[(&str, &str)]) -> RawResponse {
    send_raw(addr, "GET", path, headers, &[]).await
}

pub async fn post(addr: SocketAddr, path: &str, headers: &[(&str, &str)], body: &[u8]) -> RawResponse {
    send_raw(addr, "POST", path, headers, body).await
}
