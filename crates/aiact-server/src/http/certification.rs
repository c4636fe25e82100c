// SPDX-License-Identifier: Apache-2.0

use aiact_api::params::{parse_system_id, parse_tenant};
use aiact_api::{certificate_dto, projection_dto, ApiError};
use aiact_engine::{issue_certificate, project_certification, IssueError, SystemSnapshot};
use aiact_model::{CertificationStatus, ComplianceCertification, TenantContext};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::http::request_tracing::{request_id, tenant_header};
use crate::http::response_contract::{engine_error, respond, with_store_timeout};
use crate::store::SaveOutcome;
use crate::telemetry::RequestMetrics;
use crate::AppState;

struct Projection {
    ctx: TenantContext,
    snapshot: SystemSnapshot,
    record: ComplianceCertification,
    now: DateTime<Utc>,
}

async fn load_projection(
    state: &AppState,
    headers: &HeaderMap,
    raw_system_id: &str,
) -> Result<Projection, ApiError> {
    let ctx = parse_tenant(tenant_header(headers))?;
    let system_id = parse_system_id(raw_system_id)?;
    let snapshot = with_store_timeout(state, state.store.load_snapshot(&ctx, &system_id))
        .await?
        .ok_or_else(|| ApiError::system_not_found(system_id.as_str()))?;
    let now = state.clock.now();
    let record = project_certification(&ctx, &snapshot, now, &state.policy)
        .map_err(|e| engine_error(system_id.as_str(), &e))?;
    RequestMetrics::inc(&state.metrics.projections);
    Ok(Projection {
        ctx,
        snapshot,
        record,
        now,
    })
}

async fn project(
    state: &AppState,
    headers: &HeaderMap,
    system_id: &str,
) -> Result<Response, ApiError> {
    let Projection { record, .. } = load_projection(state, headers, system_id).await?;
    info!(
        system_id = %record.system_id,
        score = record.compliance_score,
        level = record.certification_level.as_str(),
        status = record.status.as_str(),
        "certification projected"
    );
    Ok(Json(projection_dto(&record)).into_response())
}

pub(crate) async fn certification_handler(
    State(state): State<AppState>,
    Path(system_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    respond(
        project(&state, &headers, &system_id).await,
        &request_id(&headers),
    )
}

/// Issues a certificate for a qualifying system. A live certificate at the
/// same level is returned as-is with 200 instead of minting a new id, also
/// when a concurrent request stored it first.
async fn issue(
    state: &AppState,
    headers: &HeaderMap,
    system_id: &str,
) -> Result<Response, ApiError> {
    let Projection {
        ctx,
        snapshot,
        record,
        now,
    } = load_projection(state, headers, system_id).await?;

    if let (CertificationStatus::Certified { .. }, Some(existing)) =
        (&record.status, &snapshot.certificate)
    {
        if existing.level == record.certification_level {
            return Ok((StatusCode::OK, Json(certificate_dto(existing, now))).into_response());
        }
    }

    let certificate = issue_certificate(&ctx, &snapshot, &record, now, &state.policy)
        .map_err(|err| match err {
            IssueError::NotQualified {
                status,
                score,
                percentage,
            } => ApiError::not_qualified(status, score, percentage),
            IssueError::Engine(e) => engine_error(record.system_id.as_str(), &e),
            other => ApiError::internal(other.to_string()),
        })?;
    let outcome =
        with_store_timeout(state, state.store.save_certificate(&ctx, &certificate)).await?;
    if let SaveOutcome::Existing(existing) = outcome {
        info!(
            system_id = %existing.system_id,
            cert_id = %existing.cert_id,
            level = existing.level.as_str(),
            "live certificate already issued"
        );
        return Ok((StatusCode::OK, Json(certificate_dto(&existing, now))).into_response());
    }
    RequestMetrics::inc(&state.metrics.certificates_issued);
    info!(
        system_id = %certificate.system_id,
        cert_id = %certificate.cert_id,
        score = certificate.score,
        level = certificate.level.as_str(),
        status = "certified",
        "certificate issued"
    );
    Ok((StatusCode::CREATED, Json(certificate_dto(&certificate, now))).into_response())
}

pub(crate) async fn issue_certificate_handler(
    State(state): State<AppState>,
    Path(system_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    respond(
        issue(&state, &headers, &system_id).await,
        &request_id(&headers),
    )
}
