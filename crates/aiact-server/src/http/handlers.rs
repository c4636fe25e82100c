// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::Ordering;

use aiact_api::{openapi_v1_spec, ApiError, VersionDto, API_VERSION};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::request_tracing::request_id;
use crate::http::response_contract::{respond, with_store_timeout};
use crate::{AppState, CRATE_NAME};

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readiness(state: &AppState) -> Result<Response, ApiError> {
    if !state.ready.load(Ordering::Relaxed) {
        return Err(ApiError::upstream_unavailable("service is draining"));
    }
    if state.api.readiness_requires_store {
        with_store_timeout(state, state.store.health()).await?;
    }
    Ok((StatusCode::OK, "ready").into_response())
}

pub(crate) async fn readyz_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    respond(readiness(&state).await, &request_id(&headers))
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(VersionDto {
        service: CRATE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: API_VERSION.to_string(),
        policy_schema_version: state.policy.schema_version.as_str().to_string(),
        policy_hash: state.policy_hash.to_string(),
    })
}

pub(crate) async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_v1_spec())
}
