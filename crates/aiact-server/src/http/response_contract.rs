// SPDX-License-Identifier: Apache-2.0

use std::future::Future;

use aiact_api::error_mapping::map_error;
use aiact_api::ApiError;
use aiact_engine::EngineError;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;
use crate::telemetry::RequestMetrics;
use crate::AppState;

#[must_use]
pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Json(json!({"error": err}));
    let mut resp = (status, body).into_response();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        resp.headers_mut()
            .insert("retry-after", HeaderValue::from_static("3"));
    }
    resp
}

/// Stamps the request id on failures and renders the error envelope.
#[must_use]
pub(crate) fn respond(result: Result<Response, ApiError>, request_id: &str) -> Response {
    match result {
        Ok(resp) => resp,
        Err(err) => api_error_response(err.with_request_id(request_id)),
    }
}

/// Bounds a store call by the configured request timeout.
pub(crate) async fn with_store_timeout<T>(
    state: &AppState,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, ApiError> {
    let outcome = match tokio::time::timeout(state.api.request_timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Unavailable("store call timed out".to_string())),
    };
    outcome.map_err(|err| store_error(state, &err))
}

pub(crate) fn store_error(state: &AppState, err: &StoreError) -> ApiError {
    RequestMetrics::inc(&state.metrics.store_errors);
    tracing::warn!(backend = state.store.backend_tag(), error = %err, "store call failed");
    match err {
        StoreError::Unavailable(reason) => ApiError::upstream_unavailable(reason),
        other => ApiError::internal(other.to_string()),
    }
}

pub(crate) fn engine_error(system_id: &str, err: &EngineError) -> ApiError {
    match err {
        EngineError::TenantMismatch { .. } => ApiError::system_not_found(system_id),
        other => {
            tracing::error!(system_id, error = %other, "projection failed");
            ApiError::internal(other.to_string())
        }
    }
}
