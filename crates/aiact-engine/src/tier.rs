// SPDX-License-Identifier: Apache-2.0

use aiact_model::CertificationLevel;
use aiact_policies::TierThresholds;

/// Half-open tiers: `[bronze, silver)` is bronze, and so on. No hysteresis.
#[must_use]
pub fn classify_level(score: u8, tiers: &TierThresholds) -> CertificationLevel {
    if score >= tiers.gold {
        CertificationLevel::Gold
    } else if score >= tiers.silver {
        CertificationLevel::Silver
    } else if score >= tiers.bronze {
        CertificationLevel::Bronze
    } else {
        CertificationLevel::None
    }
}
