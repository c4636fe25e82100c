// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use aiact_core::{resolve_aiact_config_path, ConfigPathScope, ResultExt};
use aiact_engine::SystemSnapshot;
use aiact_model::IssuedCertificate;
use aiact_policies::{load_policy_from_path, validate_policy, ScoringPolicy};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::CliError;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<T, CliError> {
    let raw = fs::read_to_string(path)
        .with_context(what)
        .map_err(|e| CliError::dependency(e).with_detail("path", &path.display().to_string()))?;
    serde_json::from_str(&raw)
        .with_context(what)
        .map_err(|e| {
            CliError::validation("invalid_input", e).with_detail("path", &path.display().to_string())
        })
}

pub(crate) fn read_snapshot(path: &Path) -> Result<SystemSnapshot, CliError> {
    read_json(path, "read snapshot")
}

pub(crate) fn read_certificate(path: &Path) -> Result<IssuedCertificate, CliError> {
    read_json(path, "read certificate")
}

/// `--at` as RFC 3339, or the wall clock.
pub(crate) fn parse_at(raw: Option<&str>) -> Result<DateTime<Utc>, CliError> {
    match raw {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| CliError::usage("--at must be RFC 3339").with_detail("error", &e.to_string())),
    }
}

/// Explicit path first, then the workspace file, then the user config
/// directory; built-in defaults when none exists.
#[must_use]
pub(crate) fn resolve_policy_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    [ConfigPathScope::Workspace, ConfigPathScope::User]
        .into_iter()
        .map(resolve_aiact_config_path)
        .find(|path| path.is_file())
}

pub(crate) fn load_policy(explicit: Option<&Path>) -> Result<ScoringPolicy, CliError> {
    let policy = match resolve_policy_path(explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading scoring policy");
            load_policy_from_path(&path).map_err(|e| {
                CliError::validation("invalid_policy", e)
                    .with_detail("path", &path.display().to_string())
            })?
        }
        None => ScoringPolicy::default(),
    };
    validate_policy(&policy).map_err(|e| CliError::validation("invalid_policy", e))?;
    Ok(policy)
}
