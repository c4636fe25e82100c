// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Where a `scoring.json` is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigPathScope {
    /// Per-user config directory.
    User,
    /// `configs/policy/` relative to the working directory.
    Workspace,
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[must_use]
pub fn resolve_aiact_config_dir() -> PathBuf {
    if let Some(explicit) = non_empty_env(crate::ENV_AIACT_CONFIG_DIR) {
        return PathBuf::from(explicit);
    }
    if let Some(xdg_config_home) = non_empty_env("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config_home).join("aiact");
    }
    if let Some(home) = non_empty_env("HOME") {
        return PathBuf::from(home).join(".config").join("aiact");
    }
    PathBuf::from(".aiact")
}

/// Location of `scoring.json` for the given scope.
#[must_use]
pub fn resolve_aiact_config_path(scope: ConfigPathScope) -> PathBuf {
    match scope {
        ConfigPathScope::User => resolve_aiact_config_dir().join("scoring.json"),
        ConfigPathScope::Workspace => PathBuf::from("configs")
            .join("policy")
            .join("scoring.json"),
    }
}
