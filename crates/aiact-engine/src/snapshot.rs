// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use aiact_model::{AgentTelemetry, AiSystem, Incident, IssuedCertificate, Organization};
use serde::{Deserialize, Serialize};

/// Everything a projection reads about one system, fetched in one store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemSnapshot {
    pub organization: Organization,
    pub system: AiSystem,
    #[serde(default)]
    pub completed_requirements: BTreeSet<String>,
    #[serde(default)]
    pub telemetry: Option<AgentTelemetry>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    /// Most recently issued certificate, expired or not.
    #[serde(default)]
    pub certificate: Option<IssuedCertificate>,
}
