// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PolicySchemaVersion {
    #[serde(rename = "1")]
    V1,
}

impl PolicySchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
        }
    }
}

/// Every tunable of the scoring engine and certificate lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringPolicy {
    pub schema_version: PolicySchemaVersion,
    pub weights: ScoreWeights,
    pub tiers: TierThresholds,
    pub lifecycle: LifecyclePolicy,
    pub signals: SignalPolicy,
    #[serde(default)]
    pub documented_defaults: Vec<DocumentedDefault>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreWeights {
    /// Share of the requirement percentage that becomes base score.
    pub base_weight_percent: u8,
    pub bonus_per_signal: u8,
}

/// Lower bounds of each tier; intervals are half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierThresholds {
    pub bronze: u8,
    pub silver: u8,
    pub gold: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LifecyclePolicy {
    pub not_eligible_below: u8,
    pub validity_months: u32,
    pub reverification_interval_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalPolicy {
    pub logging_window_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentedDefault {
    pub field: String,
    pub reason: String,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            schema_version: PolicySchemaVersion::V1,
            weights: ScoreWeights {
                base_weight_percent: 100,
                bonus_per_signal: 5,
            },
            tiers: TierThresholds {
                bronze: 70,
                silver: 85,
                gold: 95,
            },
            lifecycle: LifecyclePolicy {
                not_eligible_below: 50,
                validity_months: 12,
                reverification_interval_days: 90,
            },
            signals: SignalPolicy {
                logging_window_hours: 24,
            },
            documented_defaults: Vec::new(),
        }
    }
}
