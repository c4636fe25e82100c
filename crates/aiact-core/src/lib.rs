// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Deterministic building blocks for the aiact workspace.
//!
//! Nothing in this crate reads the wall clock; callers pass time in.

pub mod canonical;
mod domain;
mod errors;
mod types;

pub use canonical::{sha256_hex, stable_json_bytes, stable_json_hash_hex};
pub use domain::config::{resolve_aiact_config_dir, resolve_aiact_config_path, ConfigPathScope};
pub use errors::{Error, ErrorContext, ExitCode, MachineError, Result, ResultExt};
pub use types::ids::{CertId, OrganizationId, SystemId};

pub const CRATE_NAME: &str = "aiact-core";

pub const ENV_AIACT_LOG_LEVEL: &str = "AIACT_LOG_LEVEL";
pub const ENV_AIACT_CONFIG_DIR: &str = "AIACT_CONFIG_DIR";
