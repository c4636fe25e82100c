// SPDX-License-Identifier: Apache-2.0

use crate::system::RiskLevel;
use serde::Serialize;

/// One checklist item of the AI Act, keyed by a stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub id: &'static str,
    pub article: &'static str,
    pub title: &'static str,
    #[serde(skip)]
    pub applies_to: &'static [RiskLevel],
}

impl Requirement {
    #[must_use]
    pub fn applies(&self, risk: RiskLevel) -> bool {
        self.applies_to.contains(&risk)
    }
}

const MINIMAL_AND_UP: &[RiskLevel] = &[RiskLevel::Minimal, RiskLevel::Limited, RiskLevel::High];
const MINIMAL_LIMITED: &[RiskLevel] = &[RiskLevel::Minimal, RiskLevel::Limited];
const LIMITED: &[RiskLevel] = &[RiskLevel::Limited];
const HIGH: &[RiskLevel] = &[RiskLevel::High];
const PROHIBITED: &[RiskLevel] = &[RiskLevel::Prohibited];

pub const REQUIREMENT_CATALOG: &[Requirement] = &[
    Requirement {
        id: "art4_ai_literacy",
        article: "Art. 4",
        title: "AI literacy of staff operating the system",
        applies_to: MINIMAL_AND_UP,
    },
    Requirement {
        id: "art95_voluntary_code",
        article: "Art. 95",
        title: "Voluntary code of conduct adopted",
        applies_to: MINIMAL_LIMITED,
    },
    Requirement {
        id: "art50_transparency_notice",
        article: "Art. 50(1)",
        title: "Users informed they interact with an AI system",
        applies_to: LIMITED,
    },
    Requirement {
        id: "art50_synthetic_content_marking",
        article: "Art. 50(2)",
        title: "Synthetic content marked as AI-generated",
        applies_to: LIMITED,
    },
    Requirement {
        id: "art9_risk_management",
        article: "Art. 9",
        title: "Risk management system established",
        applies_to: HIGH,
    },
    Requirement {
        id: "art10_data_governance",
        article: "Art. 10",
        title: "Data and data governance practices",
        applies_to: HIGH,
    },
    Requirement {
        id: "art11_technical_documentation",
        article: "Art. 11",
        title: "Technical documentation drawn up",
        applies_to: HIGH,
    },
    Requirement {
        id: "art12_record_keeping",
        article: "Art. 12",
        title: "Automatic event logging enabled",
        applies_to: HIGH,
    },
    Requirement {
        id: "art13_transparency",
        article: "Art. 13",
        title: "Instructions for use provided to deployers",
        applies_to: HIGH,
    },
    Requirement {
        id: "art14_human_oversight",
        article: "Art. 14",
        title: "Human oversight measures in place",
        applies_to: HIGH,
    },
    Requirement {
        id: "art15_accuracy_robustness",
        article: "Art. 15",
        title: "Accuracy, robustness and cybersecurity",
        applies_to: HIGH,
    },
    Requirement {
        id: "art17_quality_management",
        article: "Art. 17",
        title: "Quality management system",
        applies_to: HIGH,
    },
    Requirement {
        id: "art43_conformity_assessment",
        article: "Art. 43",
        title: "Conformity assessment completed",
        applies_to: HIGH,
    },
    Requirement {
        id: "art49_registration",
        article: "Art. 49",
        title: "Registered in the EU database",
        applies_to: HIGH,
    },
    Requirement {
        id: "art72_post_market_monitoring",
        article: "Art. 72",
        title: "Post-market monitoring plan",
        applies_to: HIGH,
    },
    Requirement {
        id: "art5_prohibited_practice_review",
        article: "Art. 5",
        title: "Prohibited practice legal review",
        applies_to: PROHIBITED,
    },
    Requirement {
        id: "art5_decommission_plan",
        article: "Art. 5",
        title: "Decommissioning plan for the prohibited use",
        applies_to: PROHIBITED,
    },
];

/// Checklist for a risk level, in catalog order.
#[must_use]
pub fn applicable_requirements(risk: RiskLevel) -> Vec<&'static Requirement> {
    REQUIREMENT_CATALOG
        .iter()
        .filter(|req| req.applies(risk))
        .collect()
}

#[must_use]
pub fn requirement_by_id(id: &str) -> Option<&'static Requirement> {
    REQUIREMENT_CATALOG.iter().find(|req| req.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn checklist_sizes_per_risk_level() {
        assert_eq!(applicable_requirements(RiskLevel::Minimal).len(), 2);
        assert_eq!(applicable_requirements(RiskLevel::Limited).len(), 4);
        assert_eq!(applicable_requirements(RiskLevel::High).len(), 12);
        assert_eq!(applicable_requirements(RiskLevel::Prohibited).len(), 2);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: BTreeSet<_> = REQUIREMENT_CATALOG.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), REQUIREMENT_CATALOG.len());
        assert!(requirement_by_id("art14_human_oversight").is_some());
        assert!(requirement_by_id("art999").is_none());
    }
}
