// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

use aiact_policies::{canonical_policy_json, ScoringPolicy};
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};

mod config;
mod http;
mod middleware;
mod store;
mod telemetry;

pub use config::{validate_startup_config_contract, ApiConfig, StoreConfig};
pub use store::fake::FakeStore;
pub use store::sqlite::SqliteStore;
pub use store::{ComplianceStore, SaveOutcome, StoreError};

pub const CRATE_NAME: &str = "aiact-server";

/// Source of "now" for projections; tests pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ComplianceStore>,
    pub api: ApiConfig,
    pub policy: Arc<ScoringPolicy>,
    pub clock: Arc<dyn Clock>,
    pub ready: Arc<AtomicBool>,
    pub(crate) policy_hash: Arc<str>,
    pub(crate) metrics: Arc<telemetry::RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ComplianceStore>) -> Self {
        Self::with_config(
            store,
            ApiConfig::default(),
            ScoringPolicy::default(),
            Arc::new(SystemClock),
        )
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn ComplianceStore>,
        api: ApiConfig,
        policy: ScoringPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let policy_hash = canonical_policy_json(&policy)
            .map(|json| aiact_core::sha256_hex(json.as_bytes()))
            .unwrap_or_default();
        Self {
            store,
            api,
            policy: Arc::new(policy),
            clock,
            ready: Arc::new(AtomicBool::new(true)),
            policy_hash: policy_hash.into(),
            metrics: Arc::new(telemetry::RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(telemetry::metrics_handler))
        .route("/v1/version", get(http::handlers::version_handler))
        .route("/v1/openapi.json", get(http::handlers::openapi_handler))
        .route(
            "/v1/systems/:system_id/certification",
            get(http::certification::certification_handler),
        )
        .route(
            "/v1/systems/:system_id/certificate",
            post(http::certification::issue_certificate_handler),
        )
        .route(
            "/v1/certificates/:cert_id",
            get(http::certificates::certificate_handler),
        )
        .route(
            "/v1/certificates/:cert_id/pdf",
            get(http::certificates::certificate_pdf_handler),
        )
        .route(
            "/v1/badges/:cert_id",
            get(http::certificates::badge_handler),
        )
        .route(
            "/v1/documents/pdf",
            post(http::documents::document_pdf_handler),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
