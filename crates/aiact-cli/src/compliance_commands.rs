// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use aiact_api::{certificate_dto, projection_dto};
use aiact_engine::{issue_certificate, project_certification, EngineError, IssueError, SystemSnapshot};
use aiact_model::{ComplianceCertification, TenantContext};
use aiact_policies::ScoringPolicy;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::inputs::{load_policy, parse_at, read_snapshot};
use crate::output::{emit_ok, write_artifact};
use crate::{CliError, OutputMode, SnapshotArgs};

struct Evaluation {
    ctx: TenantContext,
    snapshot: SystemSnapshot,
    policy: ScoringPolicy,
    record: ComplianceCertification,
    now: DateTime<Utc>,
}

fn engine_error(err: EngineError) -> CliError {
    match err {
        EngineError::TenantMismatch { expected, actual } => {
            CliError::validation("tenant_mismatch", "snapshot belongs to another organization")
                .with_detail("expected", &expected)
                .with_detail("actual", &actual)
        }
        other => CliError::internal(other),
    }
}

fn evaluate(input: &SnapshotArgs) -> Result<Evaluation, CliError> {
    let snapshot = read_snapshot(&input.snapshot)?;
    let policy = load_policy(input.policy.as_deref())?;
    let now = parse_at(input.at.as_deref())?;
    let ctx = match &input.organization {
        Some(raw) => TenantContext::parse(raw).map_err(|e| {
            CliError::usage("invalid --organization").with_detail("error", &e.to_string())
        })?,
        None => TenantContext::new(snapshot.organization.id.clone()),
    };
    let record = project_certification(&ctx, &snapshot, now, &policy).map_err(engine_error)?;
    tracing::info!(
        system_id = %record.system_id,
        score = record.compliance_score,
        level = record.certification_level.as_str(),
        status = record.status.as_str(),
        "certification projected"
    );
    Ok(Evaluation {
        ctx,
        snapshot,
        policy,
        record,
        now,
    })
}

pub(crate) fn run_score(input: &SnapshotArgs, output_mode: OutputMode) -> Result<(), CliError> {
    let Evaluation { record, .. } = evaluate(input)?;
    let payload = serde_json::to_value(projection_dto(&record)).map_err(CliError::internal)?;
    emit_ok(output_mode, payload)
}

/// Prints the certificate as the API serves it; `--out` also stores the
/// raw record for the render commands.
pub(crate) fn run_issue(
    input: &SnapshotArgs,
    out: Option<&Path>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let Evaluation {
        ctx,
        snapshot,
        policy,
        record,
        now,
    } = evaluate(input)?;
    let cert = issue_certificate(&ctx, &snapshot, &record, now, &policy).map_err(|err| match err {
        IssueError::NotQualified {
            status,
            score,
            percentage,
        } => CliError::validation("not_qualified", "system does not qualify for a certificate")
            .with_detail("certification_status", status)
            .with_detail("compliance_score", &score.to_string())
            .with_detail("requirements_percentage", &percentage.to_string()),
        IssueError::Engine(e) => engine_error(e),
        other => CliError::internal(other),
    })?;
    if let Some(path) = out {
        let bytes = serde_json::to_vec_pretty(&cert).map_err(CliError::internal)?;
        write_artifact(path, &bytes)?;
    }
    let mut payload = serde_json::to_value(certificate_dto(&cert, now)).map_err(CliError::internal)?;
    if let Some(path) = out {
        payload["out"] = json!(path);
    }
    emit_ok(output_mode, payload)
}
