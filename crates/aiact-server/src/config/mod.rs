// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// Upper bound for each store call made while serving a request.
    pub request_timeout: Duration,
    pub shutdown_drain: Duration,
    pub readiness_requires_store: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 256 * 1024,
            request_timeout: Duration::from_secs(5),
            shutdown_drain: Duration::from_secs(5),
            readiness_requires_store: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite(PathBuf),
}

impl StoreConfig {
    /// `memory` or `sqlite:<path>`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "memory" {
            return Ok(Self::Memory);
        }
        match raw.strip_prefix("sqlite:") {
            Some(path) if !path.trim().is_empty() => Ok(Self::Sqlite(PathBuf::from(path.trim()))),
            Some(_) => Err("sqlite store requires a path: sqlite:<path>".to_string()),
            None => Err(format!(
                "unsupported store {raw}; use memory or sqlite:<path>"
            )),
        }
    }
}

pub fn validate_startup_config_contract(
    api: &ApiConfig,
    store: &StoreConfig,
) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("api size limits must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("timeouts must be > 0".to_string());
    }
    if let StoreConfig::Sqlite(path) = store {
        if path.is_dir() {
            return Err(format!(
                "sqlite store path is a directory: {}",
                path.display()
            ));
        }
    }
    Ok(())
}
