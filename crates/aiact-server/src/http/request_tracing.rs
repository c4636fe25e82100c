// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::Ordering;

use aiact_api::{REQUEST_ID_HEADER, TENANT_HEADER};
use axum::http::HeaderMap;

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestTrace {
    pub request_id: String,
    pub organization_id: Option<String>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[must_use]
pub(crate) fn extract_request_trace(headers: &HeaderMap, state: &AppState) -> RequestTrace {
    let request_id = header_str(headers, REQUEST_ID_HEADER)
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
            format!("req-{id:016x}")
        });
    RequestTrace {
        request_id,
        organization_id: header_str(headers, TENANT_HEADER).map(ToString::to_string),
    }
}

/// Request id as stamped by the tracing middleware.
#[must_use]
pub(crate) fn request_id(headers: &HeaderMap) -> String {
    header_str(headers, REQUEST_ID_HEADER)
        .unwrap_or("req-unknown")
        .to_string()
}

#[must_use]
pub(crate) fn tenant_header(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, TENANT_HEADER)
}

/// Collapses path parameters so metric labels stay bounded.
#[must_use]
pub(crate) fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["v1", "systems", _, tail @ ("certification" | "certificate")] => {
            format!("/v1/systems/:system_id/{tail}")
        }
        ["v1", "certificates", _] => "/v1/certificates/:cert_id".to_string(),
        ["v1", "certificates", _, "pdf"] => "/v1/certificates/:cert_id/pdf".to_string(),
        ["v1", "badges", _] => "/v1/badges/:cert_id".to_string(),
        ["healthz" | "readyz" | "metrics"]
        | ["v1", "version" | "openapi.json"]
        | ["v1", "documents", "pdf"] => path.to_string(),
        _ => "unmatched".to_string(),
    }
}
