// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod adapters;
mod evaluation;
mod limits;
mod schema;
mod validate;

pub use adapters::{load_policy_from_path, load_policy_from_workspace, policy_config_path};
pub use evaluation::{evaluate_policy, PolicySeverity, PolicyViolation};
pub use limits::{
    MAX_BONUS_PER_SIGNAL, MAX_LOGGING_WINDOW_HOURS, MAX_REVERIFICATION_INTERVAL_DAYS,
    MAX_VALIDITY_MONTHS, SCORE_MAX,
};
pub use schema::{
    DocumentedDefault, LifecyclePolicy, PolicySchemaVersion, ScoreWeights, ScoringPolicy,
    SignalPolicy, TierThresholds,
};
pub use validate::{
    canonical_policy_json, parse_policy_json, validate_policy, PolicyValidationError,
};

pub const CRATE_NAME: &str = "aiact-policies";
