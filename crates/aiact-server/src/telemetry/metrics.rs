// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use crate::AppState;

const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone, Copy)]
struct RouteCounters {
    count: u64,
    duration_ns: u128,
}

#[derive(Debug, Default)]
pub(crate) struct RequestMetrics {
    routes: Mutex<BTreeMap<(String, u16), RouteCounters>>,
    pub certificates_issued: AtomicU64,
    pub projections: AtomicU64,
    pub store_errors: AtomicU64,
}

impl RequestMetrics {
    pub(crate) fn observe_request(&self, route: &str, status: u16, elapsed: Duration) {
        let Ok(mut routes) = self.routes.lock() else {
            return;
        };
        let entry = routes.entry((route.to_string(), status)).or_default();
        entry.count += 1;
        entry.duration_ns += elapsed.as_nanos();
    }

    pub(crate) fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Prometheus text exposition. Series are sorted so scrapes diff cleanly.
    pub(crate) fn render(&self, backend: &str) -> String {
        let mut body = String::new();
        let _ = writeln!(
            body,
            "aiact_build_info{{version=\"{METRIC_VERSION}\",store=\"{backend}\"}} 1"
        );
        for (name, counter) in [
            ("aiact_projections_total", &self.projections),
            ("aiact_certificates_issued_total", &self.certificates_issued),
            ("aiact_store_errors_total", &self.store_errors),
        ] {
            let _ = writeln!(body, "{name} {}", counter.load(Ordering::Relaxed));
        }
        if let Ok(routes) = self.routes.lock() {
            for ((route, status), counters) in routes.iter() {
                let _ = writeln!(
                    body,
                    "aiact_http_requests_total{{route=\"{route}\",status=\"{status}\"}} {}",
                    counters.count
                );
                let _ = writeln!(
                    body,
                    "aiact_http_request_duration_seconds_sum{{route=\"{route}\",status=\"{status}\"}} {:.6}",
                    counters.duration_ns as f64 / 1e9
                );
            }
        }
        body
    }
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(state.store.backend_tag()),
    )
}
