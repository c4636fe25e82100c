// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HitlRule {
    pub id: String,
    pub enabled: bool,
}

/// Latest view of the monitoring SDK attached to an AI agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentTelemetry {
    pub sdk_connected: bool,
    #[serde(default)]
    pub last_event_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hitl_rules: Vec<HitlRule>,
}

impl AgentTelemetry {
    #[must_use]
    pub fn enabled_hitl_rule_count(&self) -> usize {
        self.hitl_rules.iter().filter(|rule| rule.enabled).count()
    }
}
