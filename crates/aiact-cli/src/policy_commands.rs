// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use aiact_core::sha256_hex;
use aiact_policies::{canonical_policy_json, evaluate_policy};
use serde_json::{json, Value};

use crate::inputs::{load_policy, resolve_policy_path};
use crate::output::emit_ok;
use crate::{CliError, OutputMode};

fn source_label(explicit: Option<&Path>) -> Value {
    resolve_policy_path(explicit).map_or_else(|| json!("built-in defaults"), |p| json!(p))
}

pub(crate) fn run_validate(path: Option<&Path>, output_mode: OutputMode) -> Result<(), CliError> {
    let policy = load_policy(path)?;
    emit_ok(
        output_mode,
        json!({
            "command": "policy validate",
            "status": "ok",
            "source": source_label(path),
            "schema_version": policy.schema_version.as_str(),
        }),
    )
}

pub(crate) fn run_print(path: Option<&Path>, output_mode: OutputMode) -> Result<(), CliError> {
    let policy = load_policy(path)?;
    let canonical = canonical_policy_json(&policy).map_err(CliError::internal)?;
    let policy_json: Value = serde_json::from_str(&canonical).map_err(CliError::internal)?;
    emit_ok(
        output_mode,
        json!({
            "source": source_label(path),
            "policy_hash": sha256_hex(canonical.as_bytes()),
            "policy": policy_json,
        }),
    )
}

/// Lists every finding; only error-level findings fail `validate`.
pub(crate) fn run_explain(path: Option<&Path>, output_mode: OutputMode) -> Result<(), CliError> {
    let policy = load_policy(path)?;
    let findings = evaluate_policy(&policy);
    emit_ok(
        output_mode,
        json!({
            "source": source_label(path),
            "findings": findings,
        }),
    )
}
