// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::limits::{
    MAX_BONUS_PER_SIGNAL, MAX_LOGGING_WINDOW_HOURS, MAX_REVERIFICATION_INTERVAL_DAYS,
    MAX_VALIDITY_MONTHS, SCORE_MAX,
};
use crate::schema::ScoringPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PolicySeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyViolation {
    pub id: &'static str,
    pub severity: PolicySeverity,
    pub message: &'static str,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy)]
enum RuleKind {
    NumberRange(u64, u64),
}

#[derive(Debug, Clone, Copy)]
struct RuleSpec {
    id: &'static str,
    severity: PolicySeverity,
    message: &'static str,
    path: &'static str,
    kind: RuleKind,
}

const POLICY_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "policy.weights.base_weight_percent.range",
        severity: PolicySeverity::Error,
        message: "weights.base_weight_percent must be within 1..=100",
        path: "weights.base_weight_percent",
        kind: RuleKind::NumberRange(1, SCORE_MAX as u64),
    },
    RuleSpec {
        id: "policy.weights.bonus_per_signal.range",
        severity: PolicySeverity::Error,
        message: "weights.bonus_per_signal must be within 0..=5 so three signals add at most 15",
        path: "weights.bonus_per_signal",
        kind: RuleKind::NumberRange(0, MAX_BONUS_PER_SIGNAL as u64),
    },
    RuleSpec {
        id: "policy.tiers.bronze.range",
        severity: PolicySeverity::Error,
        message: "tiers.bronze must be within 1..=100",
        path: "tiers.bronze",
        kind: RuleKind::NumberRange(1, SCORE_MAX as u64),
    },
    RuleSpec {
        id: "policy.tiers.silver.range",
        severity: PolicySeverity::Error,
        message: "tiers.silver must be within 1..=100",
        path: "tiers.silver",
        kind: RuleKind::NumberRange(1, SCORE_MAX as u64),
    },
    RuleSpec {
        id: "policy.tiers.gold.range",
        severity: PolicySeverity::Error,
        message: "tiers.gold must be within 1..=100",
        path: "tiers.gold",
        kind: RuleKind::NumberRange(1, SCORE_MAX as u64),
    },
    RuleSpec {
        id: "policy.lifecycle.not_eligible_below.range",
        severity: PolicySeverity::Error,
        message: "lifecycle.not_eligible_below must be within 0..=100",
        path: "lifecycle.not_eligible_below",
        kind: RuleKind::NumberRange(0, SCORE_MAX as u64),
    },
    RuleSpec {
        id: "policy.lifecycle.validity_months.range",
        severity: PolicySeverity::Error,
        message: "lifecycle.validity_months must be within 1..=36",
        path: "lifecycle.validity_months",
        kind: RuleKind::NumberRange(1, MAX_VALIDITY_MONTHS as u64),
    },
    RuleSpec {
        id: "policy.lifecycle.reverification_interval_days.range",
        severity: PolicySeverity::Error,
        message: "lifecycle.reverification_interval_days must be within 1..=366",
        path: "lifecycle.reverification_interval_days",
        kind: RuleKind::NumberRange(1, MAX_REVERIFICATION_INTERVAL_DAYS as u64),
    },
    RuleSpec {
        id: "policy.signals.logging_window_hours.range",
        severity: PolicySeverity::Error,
        message: "signals.logging_window_hours must be within 1..=720",
        path: "signals.logging_window_hours",
        kind: RuleKind::NumberRange(1, MAX_LOGGING_WINDOW_HOURS as u64),
    },
];

#[must_use]
pub fn evaluate_policy(policy: &ScoringPolicy) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();
    let value = match serde_json::to_value(policy) {
        Ok(value) => value,
        Err(error) => {
            violations.push(PolicyViolation {
                id: "policy.serialization.failure",
                severity: PolicySeverity::Error,
                message: "policy serialization failed",
                evidence: error.to_string(),
            });
            return violations;
        }
    };

    for rule in POLICY_RULES {
        apply_rule(&value, *rule, &mut violations);
    }

    let tiers = &policy.tiers;
    if !(tiers.bronze < tiers.silver && tiers.silver < tiers.gold) {
        violations.push(PolicyViolation {
            id: "policy.tiers.order.invalid",
            severity: PolicySeverity::Error,
            message: "tier thresholds must be strictly increasing bronze < silver < gold",
            evidence: format!(
                "bronze={} silver={} gold={}",
                tiers.bronze, tiers.silver, tiers.gold
            ),
        });
    }

    if policy.lifecycle.not_eligible_below > tiers.bronze {
        violations.push(PolicyViolation {
            id: "policy.lifecycle.not_eligible_below.above_bronze",
            severity: PolicySeverity::Error,
            message: "lifecycle.not_eligible_below must not exceed tiers.bronze",
            evidence: format!(
                "not_eligible_below={} bronze={}",
                policy.lifecycle.not_eligible_below, tiers.bronze
            ),
        });
    }

    let validity_days_floor = u64::from(policy.lifecycle.validity_months) * 28;
    if u64::from(policy.lifecycle.reverification_interval_days) > validity_days_floor {
        violations.push(PolicyViolation {
            id: "policy.lifecycle.reverification_after_expiry",
            severity: PolicySeverity::Warning,
            message: "re-verification interval may exceed the validity window; it will be capped",
            evidence: format!(
                "reverification_interval_days={} validity_months={}",
                policy.lifecycle.reverification_interval_days, policy.lifecycle.validity_months
            ),
        });
    }

    if policy.weights.bonus_per_signal == 0 {
        violations.push(PolicyViolation {
            id: "policy.weights.bonus_per_signal.disabled",
            severity: PolicySeverity::Info,
            message: "signal bonuses are disabled",
            evidence: "weights.bonus_per_signal=0".to_string(),
        });
    }

    violations
}

fn apply_rule(root: &Value, rule: RuleSpec, out: &mut Vec<PolicyViolation>) {
    let Some(value) = field_path(root, rule.path) else {
        out.push(PolicyViolation {
            id: rule.id,
            severity: PolicySeverity::Error,
            message: "required policy path missing",
            evidence: format!("path={}", rule.path),
        });
        return;
    };

    let pass = match rule.kind {
        RuleKind::NumberRange(min, max) => value.as_u64().is_some_and(|n| n >= min && n <= max),
    };

    if !pass {
        out.push(PolicyViolation {
            id: rule.id,
            severity: rule.severity,
            message: rule.message,
            evidence: format!("path={} value={}", rule.path, value),
        });
    }
}

fn field_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path.split('.') {
        cur = cur.get(seg)?;
    }
    Some(cur)
}
