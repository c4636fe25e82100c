// SPDX-License-Identifier: Apache-2.0

use aiact_core::OrganizationId;

/// Organization on whose behalf a call runs. Passed explicitly to every
/// store read and projection; there is no ambient session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantContext {
    pub organization_id: OrganizationId,
}

impl TenantContext {
    #[must_use]
    pub fn new(organization_id: OrganizationId) -> Self {
        Self { organization_id }
    }

    pub fn parse(raw: &str) -> Result<Self, aiact_core::Error> {
        Ok(Self::new(OrganizationId::new(raw.trim())?))
    }

    #[must_use]
    pub fn owns(&self, organization_id: &OrganizationId) -> bool {
        &self.organization_id == organization_id
    }
}
