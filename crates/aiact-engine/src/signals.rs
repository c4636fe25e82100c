// SPDX-License-Identifier: Apache-2.0

use aiact_model::{AgentTelemetry, ComplianceChecks, Incident};
use aiact_policies::SignalPolicy;
use chrono::{DateTime, Duration, Utc};

/// Derives the four compliance checks. Telemetry-based checks require a
/// connected SDK; missing telemetry leaves them all false.
#[must_use]
pub fn derive_checks(
    telemetry: Option<&AgentTelemetry>,
    incidents: &[Incident],
    now: DateTime<Utc>,
    signals: &SignalPolicy,
) -> ComplianceChecks {
    let sdk_connected = telemetry.is_some_and(|t| t.sdk_connected);
    let hitl_rules_active =
        sdk_connected && telemetry.is_some_and(|t| t.enabled_hitl_rule_count() > 0);
    let logging_active = sdk_connected
        && telemetry
            .and_then(|t| t.last_event_at)
            .is_some_and(|at| within_window(at, now, signals.logging_window_hours));
    let no_open_incidents = !incidents.iter().any(|i| i.status.is_open());

    ComplianceChecks {
        sdk_connected,
        hitl_rules_active,
        no_open_incidents,
        logging_active,
    }
}

fn within_window(at: DateTime<Utc>, now: DateTime<Utc>, hours: u32) -> bool {
    let window = Duration::hours(i64::from(hours));
    let delta = now.signed_duration_since(at);
    delta < window && -delta < window
}
