// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use aiact_policies::{
    evaluate_policy, load_policy_from_path, validate_policy, PolicySeverity, ScoringPolicy,
};
use aiact_server::{
    build_router, validate_startup_config_contract, ApiConfig, AppState, ComplianceStore,
    FakeStore, SqliteStore, StoreConfig, SystemClock,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default: Duration) -> Duration {
    Duration::from_millis(env_u64(
        name,
        u64::try_from(default.as_millis()).unwrap_or(u64::MAX),
    ))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("signal handlers unavailable; falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("AIACT_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_policy() -> Result<ScoringPolicy, String> {
    let policy = match env::var("AIACT_POLICY_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            let path = PathBuf::from(path);
            let policy = load_policy_from_path(&path).map_err(|e| e.to_string())?;
            info!(path = %path.display(), "scoring policy loaded");
            policy
        }
        _ => ScoringPolicy::default(),
    };
    validate_policy(&policy).map_err(|e| e.to_string())?;
    for violation in evaluate_policy(&policy) {
        if violation.severity == PolicySeverity::Warning {
            warn!(rule = violation.id, evidence = %violation.evidence, "{}", violation.message);
        }
    }
    Ok(policy)
}

fn open_store(config: &StoreConfig) -> Result<Arc<dyn ComplianceStore>, String> {
    let store: Arc<dyn ComplianceStore> = match config {
        StoreConfig::Memory => Arc::new(FakeStore::default()),
        StoreConfig::Sqlite(path) => {
            Arc::new(SqliteStore::open(path.clone()).map_err(|e| e.to_string())?)
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("AIACT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let store_config = StoreConfig::parse(&env::var("AIACT_STORE").unwrap_or_default())?;
    let defaults = ApiConfig::default();
    let api = ApiConfig {
        max_body_bytes: env_usize("AIACT_MAX_BODY_BYTES", defaults.max_body_bytes),
        request_timeout: env_duration_ms("AIACT_REQUEST_TIMEOUT_MS", defaults.request_timeout),
        shutdown_drain: env_duration_ms("AIACT_SHUTDOWN_DRAIN_MS", defaults.shutdown_drain),
        readiness_requires_store: env_bool(
            "AIACT_READINESS_REQUIRES_STORE",
            defaults.readiness_requires_store,
        ),
    };
    validate_startup_config_contract(&api, &store_config)?;

    let policy = load_policy()?;
    let store = open_store(&store_config)?;
    let drain = api.shutdown_drain;
    let state = AppState::with_config(store, api, policy, Arc::new(SystemClock));
    let ready = state.ready.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!(store = ?store_config, "aiact-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            ready.store(false, Ordering::Relaxed);
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
