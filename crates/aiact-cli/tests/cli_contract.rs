// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use aiact_core::{OrganizationId, SystemId};
use aiact_engine::SystemSnapshot;
use aiact_model::{
    applicable_requirements, AgentTelemetry, AiSystem, HitlRule, Organization, RiskLevel,
    TenantContext,
};
use aiact_server::{ComplianceStore, SqliteStore};
use assert_cmd::Command;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

const AT: &str = "2026-04-15T10:00:00Z";

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 15, 10, 0, 0)
        .single()
        .expect("date")
}

fn aiact() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aiact"));
    cmd.env_remove("AIACT_LOG_LEVEL").env("HOME", std::env::temp_dir());
    cmd
}

fn workspace_policy() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/policy/scoring.json")
}

fn snapshot(system_id: &str, completed: usize, connected: bool) -> SystemSnapshot {
    let org = OrganizationId::new("org-acme").expect("org");
    let completed_requirements: BTreeSet<String> = applicable_requirements(RiskLevel::High)
        .into_iter()
        .take(completed)
        .map(|r| r.id.to_string())
        .collect();
    SystemSnapshot {
        organization: Organization {
            id: org.clone(),
            name: "Acme GmbH".to_string(),
        },
        system: AiSystem::new(
            SystemId::new(system_id).expect("system id"),
            org,
            "Credit scoring",
            RiskLevel::High,
            at() - Duration::days(60),
        )
        .expect("system"),
        completed_requirements,
        telemetry: connected.then(|| AgentTelemetry {
            sdk_connected: true,
            last_event_at: Some(at() - Duration::hours(2)),
            hitl_rules: vec![HitlRule {
                id: "manual-review".to_string(),
                enabled: true,
            }],
        }),
        incidents: Vec::new(),
        certificate: None,
    }
}

fn write_json(dir: &Path, name: &str, value: &impl serde::Serialize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).expect("encode")).expect("write");
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

#[test]
fn help_lists_every_command() {
    let output = aiact().arg("--help").output().expect("run help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 help");
    for command in ["score", "issue", "render", "policy", "openapi", "store"] {
        assert!(text.contains(command), "missing {command} in help");
    }
}

#[test]
fn unknown_flag_returns_usage_exit_code_with_machine_error() {
    let output = aiact()
        .args(["--json", "--unknown-flag"])
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(err["code"], "usage_error");
}

#[test]
fn score_reports_gold_for_complete_connected_system() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_json(tmp.path(), "snapshot.json", &snapshot("sys-gold", usize::MAX, true));
    let output = aiact()
        .args(["--json", "score", "--at", AT, "--snapshot"])
        .arg(&path)
        .output()
        .expect("run score");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let projection = stdout_json(&output);
    assert_eq!(projection["agent_id"], "sys-gold");
    assert_eq!(projection["compliance_score"], 100);
    assert_eq!(projection["certification_level"], "gold");
    assert_eq!(projection["certification_status"], "eligible");
}

#[test]
fn score_rejects_foreign_organization() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_json(tmp.path(), "snapshot.json", &snapshot("sys-gold", usize::MAX, true));
    let output = aiact()
        .args(["--json", "score", "--organization", "org-other", "--at", AT, "--snapshot"])
        .arg(&path)
        .output()
        .expect("run score");
    assert_eq!(output.status.code(), Some(3));
    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(err["code"], "tenant_mismatch");
}

#[test]
fn issue_refuses_pending_system() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_json(tmp.path(), "snapshot.json", &snapshot("sys-pending", 6, false));
    let output = aiact()
        .args(["--json", "issue", "--at", AT, "--snapshot"])
        .arg(&path)
        .output()
        .expect("run issue");
    assert_eq!(output.status.code(), Some(3));
    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(err["code"], "not_qualified");
    assert_eq!(err["details"]["certification_status"], "pending");
}

#[test]
fn issued_certificate_feeds_render_commands() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let snapshot_path =
        write_json(tmp.path(), "snapshot.json", &snapshot("sys-gold", usize::MAX, true));
    let cert_path = tmp.path().join("out/cert.json");
    let output = aiact()
        .args(["--json", "issue", "--at", AT, "--snapshot"])
        .arg(&snapshot_path)
        .arg("--out")
        .arg(&cert_path)
        .output()
        .expect("run issue");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let cert = stdout_json(&output);
    let cert_id = cert["cert_id"].as_str().expect("cert id").to_string();
    assert!(cert_id.starts_with("AIC-2026-"), "{cert_id}");
    assert_eq!(cert["level"], "gold");
    assert_eq!(cert["expired"], false);

    let svg = aiact()
        .args(["render", "badge", "--style", "compact", "--at", AT, "--certificate"])
        .arg(&cert_path)
        .output()
        .expect("run badge");
    assert!(svg.status.success());
    let svg = String::from_utf8(svg.stdout).expect("utf8 svg");
    assert!(svg.starts_with("<svg"));
    assert!(!svg.contains(aiact_render::NOT_FOUND_BADGE_TEXT));

    let pdf_path = tmp.path().join("cert.pdf");
    let output = aiact()
        .args(["--json", "render", "certificate-pdf", "--at", AT, "--certificate"])
        .arg(&cert_path)
        .arg("--out")
        .arg(&pdf_path)
        .output()
        .expect("run certificate pdf");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary = stdout_json(&output);
    assert_eq!(summary["cert_id"], cert_id.as_str());
    assert_eq!(summary["expired"], false);
    let pdf = std::fs::read(&pdf_path).expect("read pdf");
    assert!(pdf.starts_with(b"%PDF-"));

    let expired_path = tmp.path().join("expired.pdf");
    let output = aiact()
        .args(["--json", "render", "certificate-pdf", "--at", "2030-01-01T00:00:00Z"])
        .arg("--certificate")
        .arg(&cert_path)
        .arg("--out")
        .arg(&expired_path)
        .output()
        .expect("run expired certificate pdf");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["expired"], true);
    let expired = std::fs::read(&expired_path).expect("read expired pdf");
    assert!(String::from_utf8_lossy(&expired).contains(aiact_render::EXPIRED_BADGE_TEXT));
}

#[test]
fn badge_without_certificate_draws_placeholder() {
    let output = aiact()
        .args(["render", "badge"])
        .output()
        .expect("run badge");
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).expect("utf8 svg");
    assert!(svg.contains(aiact_render::NOT_FOUND_BADGE_TEXT));
}

#[test]
fn document_pdf_rejects_oversized_title() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let request = write_json(
        tmp.path(),
        "request.json",
        &serde_json::json!({"title": "x".repeat(1_000), "sections": []}),
    );
    let output = aiact()
        .args(["--json", "render", "document-pdf", "--request"])
        .arg(&request)
        .arg("--out")
        .arg(tmp.path().join("doc.pdf"))
        .output()
        .expect("run document pdf");
    assert_eq!(output.status.code(), Some(3));
    assert!(!tmp.path().join("doc.pdf").exists());
}

#[test]
fn document_pdf_writes_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let request = write_json(
        tmp.path(),
        "request.json",
        &serde_json::json!({
            "title": "Technical documentation",
            "sections": [{"heading": "Purpose", "body": "Credit scoring"}, {"heading": "Oversight"}]
        }),
    );
    let out = tmp.path().join("doc.pdf");
    let output = aiact()
        .args(["--json", "render", "document-pdf", "--request"])
        .arg(&request)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run document pdf");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["sections"], 2);
    assert!(std::fs::read(&out).expect("read pdf").starts_with(b"%PDF-"));
}

#[test]
fn policy_validate_accepts_workspace_policy() {
    let output = aiact()
        .args(["--json", "policy", "validate", "--path"])
        .arg(workspace_policy())
        .output()
        .expect("run policy validate");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let payload = stdout_json(&output);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["schema_version"], "1");
}

#[test]
fn policy_validate_rejects_malformed_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("policy.json");
    std::fs::write(&path, "{\"schema_version\": \"9\"}").expect("write");
    let output = aiact()
        .args(["--json", "policy", "validate", "--path"])
        .arg(&path)
        .output()
        .expect("run policy validate");
    assert_eq!(output.status.code(), Some(3));
    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(err["code"], "invalid_policy");
}

#[test]
fn policy_print_hash_is_stable() {
    let run = || {
        let output = aiact()
            .args(["--json", "policy", "print", "--path"])
            .arg(workspace_policy())
            .output()
            .expect("run policy print");
        assert!(output.status.success());
        stdout_json(&output)["policy_hash"].clone()
    };
    let first = run();
    assert_eq!(first.as_str().map(str::len), Some(64));
    assert_eq!(first, run());
}

#[test]
fn store_seed_populates_sqlite() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let snapshots = write_json(
        tmp.path(),
        "snapshots.json",
        &vec![snapshot("sys-gold", usize::MAX, true), snapshot("sys-pending", 6, false)],
    );
    let db = tmp.path().join("aiact.db");
    let output = aiact()
        .args(["--json", "store", "seed", "--db"])
        .arg(&db)
        .arg("--snapshots")
        .arg(&snapshots)
        .output()
        .expect("run store seed");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["systems"], 2);

    let store = SqliteStore::open(&db).expect("open store");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let ctx = TenantContext::parse("org-acme").expect("tenant");
    let loaded = runtime
        .block_on(store.load_snapshot(&ctx, &SystemId::new("sys-pending").expect("id")))
        .expect("load")
        .expect("seeded snapshot");
    assert_eq!(loaded.completed_requirements.len(), 6);
}

#[test]
fn openapi_writes_document() {
    let output = aiact().arg("openapi").output().expect("run openapi");
    assert!(output.status.success());
    let doc: Value = serde_json::from_slice(&output.stdout).expect("openapi json");
    assert!(doc["paths"]["/v1/badges/{cert_id}"].is_object());
}
