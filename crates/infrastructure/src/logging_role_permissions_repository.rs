//! Persistence stub that only logs saved permission sets.

use async_trait::async_trait;
use qms_application::RolePermissionsRepository;
use qms_core::AppResult;
use qms_domain::RoleId;
use tracing::info;

/// Development backend that logs role permission saves to tracing output.
#[derive(Debug, Clone)]
pub struct LoggingRolePermissionsRepository;

impl LoggingRolePermissionsRepository {
    /// Creates a new logging repository.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingRolePermissionsRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RolePermissionsRepository for LoggingRolePermissionsRepository {
    async fn persist_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[String],
    ) -> AppResult<()> {
        info!(
            role_id = %role_id,
            permission_count = permission_ids.len(),
            permissions = %permission_ids.join(","),
            "persisting role permissions"
        );

        Ok(())
    }
}
