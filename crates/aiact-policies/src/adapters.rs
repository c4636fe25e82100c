// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::ScoringPolicy;
use crate::validate::{parse_policy_json, PolicyValidationError};

const POLICY_CONFIG_PATH: &str = "configs/policy/scoring.json";

#[must_use]
pub fn policy_config_path(root: &Path) -> PathBuf {
    root.join(POLICY_CONFIG_PATH)
}

pub fn load_policy_from_path(path: &Path) -> Result<ScoringPolicy, PolicyValidationError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        PolicyValidationError(format!("read policy {} failed: {e}", path.display()))
    })?;
    parse_policy_json(&raw)
}

pub fn load_policy_from_workspace(root: &Path) -> Result<ScoringPolicy, PolicyValidationError> {
    load_policy_from_path(&policy_config_path(root))
}
