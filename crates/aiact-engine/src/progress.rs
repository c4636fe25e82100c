// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use aiact_model::{applicable_requirements, RequirementsProgress, RiskLevel};

/// Completion over the checklist that applies to `risk`. Ids outside that
/// checklist are ignored.
#[must_use]
pub fn requirements_progress(risk: RiskLevel, completed: &BTreeSet<String>) -> RequirementsProgress {
    let applicable = applicable_requirements(risk);
    let done = applicable
        .iter()
        .filter(|req| completed.contains(req.id))
        .count();
    RequirementsProgress::new(applicable.len() as u32, done as u32)
}
