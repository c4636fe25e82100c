// SPDX-License-Identifier: Apache-2.0

use std::time::Instant;

use aiact_api::REQUEST_ID_HEADER;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use crate::http::request_tracing::{extract_request_trace, route_template};
use crate::AppState;

pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = route_template(request.uri().path());
    let trace = extract_request_trace(request.headers(), &state);
    let header = HeaderValue::from_str(&trace.request_id).ok();
    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!(
        "http.request",
        request_id = %trace.request_id,
        organization_id = trace.organization_id.as_deref().unwrap_or(""),
        method = %method,
        route = %route,
    );

    let mut response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();
    state.metrics.observe_request(&route, status, started.elapsed());
    span.in_scope(|| {
        tracing::debug!(status, elapsed_ms = started.elapsed().as_millis() as u64, "request finished");
    });
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
