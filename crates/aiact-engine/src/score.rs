// SPDX-License-Identifier: Apache-2.0

use aiact_model::ComplianceChecks;
use aiact_policies::{ScoreWeights, SCORE_MAX};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: u8,
    pub bonus: u8,
    pub score: u8,
}

/// Score in `0..=100`: scaled requirement percentage plus a fixed bonus per
/// active signal. `sdk_connected` earns nothing on its own.
#[must_use]
pub fn compute_score(
    percentage: u8,
    checks: &ComplianceChecks,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let max = u16::from(SCORE_MAX);
    let pct = u16::from(percentage).min(max);
    let weight = u16::from(weights.base_weight_percent).min(max);
    let base = pct * weight / 100;
    let bonus = u16::from(weights.bonus_per_signal) * u16::from(checks.bonus_signal_count());
    let score = (base + bonus).min(max);
    ScoreBreakdown {
        base: base as u8,
        bonus: bonus.min(u16::from(u8::MAX)) as u8,
        score: score as u8,
    }
}
