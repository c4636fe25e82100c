// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::Write;
use std::path::Path;

use aiact_api::openapi_v1_spec;
use aiact_core::{stable_json_bytes, ResultExt};
use serde_json::{json, Value};

use crate::{CliError, OutputMode};

/// Canonical one-line JSON with `--json`, pretty JSON otherwise.
pub(crate) fn emit_ok(output_mode: OutputMode, payload: Value) -> Result<(), CliError> {
    if output_mode.json {
        let bytes = stable_json_bytes(&payload).map_err(CliError::internal)?;
        let text = String::from_utf8(bytes).map_err(CliError::internal)?;
        println!("{text}");
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(CliError::internal)?
        );
    }
    Ok(())
}

pub(crate) fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context("create output directory")
            .map_err(CliError::dependency)?;
    }
    fs::write(path, bytes)
        .with_context("write output")
        .map_err(|e| CliError::dependency(e).with_detail("path", &path.display().to_string()))
}

pub(crate) fn write_stdout(bytes: &[u8]) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.flush())
        .with_context("write stdout")
        .map_err(CliError::dependency)
}

pub(crate) fn run_openapi(out: Option<&Path>, output_mode: OutputMode) -> Result<(), CliError> {
    let bytes = stable_json_bytes(&openapi_v1_spec()).map_err(CliError::internal)?;
    match out {
        Some(path) => {
            write_artifact(path, &bytes)?;
            emit_ok(
                output_mode,
                json!({"command": "openapi", "status": "ok", "out": path}),
            )
        }
        None => {
            write_stdout(&bytes)?;
            write_stdout(b"\n")
        }
    }
}
