// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use aiact_core::stable_json_bytes;
use serde_json::Value;

use crate::evaluation::{evaluate_policy, PolicySeverity};
use crate::schema::ScoringPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyValidationError(pub String);

impl std::fmt::Display for PolicyValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PolicyValidationError {}

/// Parses and validates a policy document in one step.
pub fn parse_policy_json(raw: &str) -> Result<ScoringPolicy, PolicyValidationError> {
    let policy: ScoringPolicy = serde_json::from_str(raw)
        .map_err(|e| PolicyValidationError(format!("policy parse failed: {e}")))?;
    validate_policy(&policy)?;
    Ok(policy)
}

pub fn validate_policy(policy: &ScoringPolicy) -> Result<(), PolicyValidationError> {
    if let Some(v) = evaluate_policy(policy)
        .into_iter()
        .find(|v| v.severity == PolicySeverity::Error)
    {
        return Err(PolicyValidationError(format!(
            "{}: {} ({})",
            v.id, v.message, v.evidence
        )));
    }
    validate_documented_defaults(policy)
}

fn validate_documented_defaults(policy: &ScoringPolicy) -> Result<(), PolicyValidationError> {
    let value = serde_json::to_value(policy)
        .map_err(|e| PolicyValidationError(format!("policy encode failed: {e}")))?;
    let mut seen = BTreeSet::new();
    for item in &policy.documented_defaults {
        if item.field.trim().is_empty() || item.reason.trim().is_empty() {
            return Err(PolicyValidationError(
                "documented_defaults.field/reason must be non-empty".to_string(),
            ));
        }
        if !seen.insert(item.field.as_str()) {
            return Err(PolicyValidationError(format!(
                "documented_defaults.field duplicated: {}",
                item.field
            )));
        }
        if !field_path_exists(&value, &item.field) {
            return Err(PolicyValidationError(format!(
                "documented_defaults.field does not exist: {}",
                item.field
            )));
        }
    }
    Ok(())
}

/// Sorted-key JSON; its SHA-256 is the policy hash reported by `/v1/version`.
pub fn canonical_policy_json(policy: &ScoringPolicy) -> Result<String, PolicyValidationError> {
    let bytes = stable_json_bytes(policy)
        .map_err(|e| PolicyValidationError(format!("policy encode failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| PolicyValidationError(format!("policy encode failed: {e}")))
}

/// `documented_defaults` name fields with dotted paths such as `tiers.gold`.
fn field_path_exists(root: &Value, path: &str) -> bool {
    if path.split('.').any(str::is_empty) {
        return false;
    }
    root.pointer(&format!("/{}", path.replace('.', "/"))).is_some()
}
