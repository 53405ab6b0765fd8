//! Tenant scope — the owner triple that partitions every topic key.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  id::{EnvironmentId, OrganizationId, UserId},
};

/// The `{organization, environment, user}` triple a request acts within.
///
/// Topic keys are unique per full triple. Subscribers and topic lookups by id
/// are resolved within the organization and environment only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantScope {
  pub organization_id: OrganizationId,
  pub environment_id:  EnvironmentId,
  pub user_id:         UserId,
}

impl TenantScope {
  pub fn new(
    organization_id: OrganizationId,
    environment_id: EnvironmentId,
    user_id: UserId,
  ) -> Self {
    Self { organization_id, environment_id, user_id }
  }

  /// Parse the three identifiers from their external string form.
  pub fn parse(
    organization_id: &str,
    environment_id: &str,
    user_id: &str,
  ) -> Result<Self> {
    Ok(Self {
      organization_id: organization_id.parse()?,
      environment_id:  environment_id.parse()?,
      user_id:         user_id.parse()?,
    })
  }

  /// Whether a record owned by `(organization_id, environment_id)` is visible
  /// from this scope.
  pub fn covers(
    &self,
    organization_id: OrganizationId,
    environment_id: EnvironmentId,
  ) -> bool {
    self.organization_id == organization_id
      && self.environment_id == environment_id
  }

  /// The same organization and environment acting as a different user.
  pub fn with_user(self, user_id: UserId) -> Self { Self { user_id, ..self } }
}
