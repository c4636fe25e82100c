// SPDX-License-Identifier: Apache-2.0

use aiact_api::params::{parse_pdf_disposition, parse_tenant, validate_document_request};
use aiact_api::{ApiError, DocumentRequestDto};
use aiact_render::{render_document_pdf, DocumentSection};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde_json::json;
use tracing::info;

use crate::http::certificates::{pdf_response, QueryMap};
use crate::http::request_tracing::{request_id, tenant_header};
use crate::http::response_contract::respond;
use crate::AppState;

const DOCUMENT_FILENAME: &str = "document.pdf";

async fn render_document(
    state: &AppState,
    headers: &HeaderMap,
    query: QueryMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let ctx = parse_tenant(tenant_header(headers))?;
    let Query(query) = query.map_err(|e| ApiError::invalid_param("query", &e.body_text()))?;
    let disposition = parse_pdf_disposition(&query)?;
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(state.api.max_body_bytes)
        } else {
            ApiError::validation_failed(json!([{
                "field": "body",
                "reason": rejection.body_text()
            }]))
        }
    })?;
    let request: DocumentRequestDto = serde_json::from_slice(&body).map_err(|e| {
        ApiError::validation_failed(json!([{"field": "body", "reason": e.to_string()}]))
    })?;
    validate_document_request(&request)?;

    let sections: Vec<DocumentSection> = request
        .sections
        .into_iter()
        .map(|s| DocumentSection {
            heading: s.heading,
            body: s.body,
        })
        .collect();
    let pdf = render_document_pdf(&request.title, &sections);
    info!(
        organization_id = %ctx.organization_id,
        sections = sections.len(),
        bytes = pdf.len(),
        "document rendered"
    );
    Ok(pdf_response(pdf, disposition, DOCUMENT_FILENAME))
}

pub(crate) async fn document_pdf_handler(
    State(state): State<AppState>,
    query: QueryMap,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    respond(
        render_document(&state, &headers, query, body).await,
        &request_id(&headers),
    )
}
