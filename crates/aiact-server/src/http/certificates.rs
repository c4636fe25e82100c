// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use aiact_api::params::{
    parse_badge_style, parse_cert_id, parse_pdf_disposition, parse_tenant, PdfDisposition,
};
use aiact_api::{certificate_dto, ApiError};
use aiact_core::CertId;
use aiact_model::{IssuedCertificate, TenantContext};
use aiact_render::{
    render_badge, render_certificate_pdf, resolve_badge_subject, resolve_certificate_view,
    CertificateView,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::request_tracing::{request_id, tenant_header};
use crate::http::response_contract::{respond, store_error, with_store_timeout};
use crate::AppState;

pub(crate) type QueryMap = Result<Query<BTreeMap<String, String>>, QueryRejection>;

pub(crate) const CERTIFICATE_STATE_HEADER: &str = "x-certificate-state";

/// Certificates are looked up globally but only revealed to their owner;
/// another tenant's id reads as unknown.
async fn find_owned(
    state: &AppState,
    ctx: &TenantContext,
    cert_id: &CertId,
) -> Result<Option<IssuedCertificate>, ApiError> {
    Ok(with_store_timeout(state, state.store.find_certificate(cert_id))
        .await?
        .filter(|cert| ctx.owns(&cert.organization_id)))
}

async fn owned_certificate(
    state: &AppState,
    headers: &HeaderMap,
    raw_cert_id: &str,
) -> Result<IssuedCertificate, ApiError> {
    let ctx = parse_tenant(tenant_header(headers))?;
    let cert_id = parse_cert_id(raw_cert_id)?;
    find_owned(state, &ctx, &cert_id)
        .await?
        .ok_or_else(|| ApiError::certificate_not_found(cert_id.as_str()))
}

pub(crate) async fn certificate_handler(
    State(state): State<AppState>,
    Path(cert_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let result = owned_certificate(&state, &headers, &cert_id)
        .await
        .map(|cert| Json(certificate_dto(&cert, state.clock.now())).into_response());
    respond(result, &request_id(&headers))
}

/// Expired certificates still render, stamped as expired. Malformed, unknown
/// and foreign ids render the "not found" placeholder.
async fn certificate_pdf(
    state: &AppState,
    headers: &HeaderMap,
    raw_cert_id: &str,
    query: QueryMap,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::invalid_param("query", &e.body_text()))?;
    let disposition = parse_pdf_disposition(&query)?;
    let ctx = parse_tenant(tenant_header(headers))?;
    let certificate = match parse_cert_id(raw_cert_id) {
        Ok(cert_id) => find_owned(state, &ctx, &cert_id).await?,
        Err(_) => None,
    };
    let view = resolve_certificate_view(certificate.as_ref(), state.clock.now());
    let (state_tag, filename) = match view {
        CertificateView::Valid(cert) => ("valid", format!("{}.pdf", cert.cert_id)),
        CertificateView::Expired(cert) => ("expired", format!("{}.pdf", cert.cert_id)),
        CertificateView::NotFound => ("not_found", "certificate.pdf".to_string()),
    };
    let mut resp = pdf_response(render_certificate_pdf(view), disposition, &filename);
    resp.headers_mut()
        .insert(CERTIFICATE_STATE_HEADER, HeaderValue::from_static(state_tag));
    Ok(resp)
}

pub(crate) async fn certificate_pdf_handler(
    State(state): State<AppState>,
    Path(cert_id): Path<String>,
    query: QueryMap,
    headers: HeaderMap,
) -> Response {
    respond(
        certificate_pdf(&state, &headers, &cert_id, query).await,
        &request_id(&headers),
    )
}

pub(crate) fn pdf_response(bytes: Vec<u8>, disposition: PdfDisposition, filename: &str) -> Response {
    (
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition.header_value(filename)),
        ],
        bytes,
    )
        .into_response()
}

/// Public badge. Never fails: malformed ids, unknown ids and store outages
/// all render the "not found" placeholder.
pub(crate) async fn badge_handler(
    State(state): State<AppState>,
    Path(cert_id): Path<String>,
    query: QueryMap,
) -> Response {
    let style = query
        .map(|Query(q)| parse_badge_style(&q))
        .unwrap_or_default();
    let certificate = match parse_cert_id(&cert_id) {
        Ok(id) => {
            match tokio::time::timeout(state.api.request_timeout, state.store.find_certificate(&id))
                .await
            {
                Ok(Ok(found)) => found,
                Ok(Err(err)) => {
                    let _ = store_error(&state, &err);
                    None
                }
                Err(_) => {
                    tracing::warn!(cert_id = %id, "badge lookup timed out");
                    None
                }
            }
        }
        Err(_) => None,
    };
    let svg = render_badge(
        resolve_badge_subject(certificate.as_ref(), state.clock.now()),
        style,
    );
    (
        [
            (CONTENT_TYPE, "image/svg+xml; charset=utf-8"),
            (CACHE_CONTROL, "no-cache"),
        ],
        svg,
    )
        .into_response()
}
