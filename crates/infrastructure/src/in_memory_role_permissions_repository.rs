use std::collections::HashMap;

use async_trait::async_trait;
use qms_application::RolePermissionsRepository;
use qms_core::AppResult;
use qms_domain::{PermissionSet, RoleId};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory backend keeping the last saved permission set per role.
#[derive(Debug, Default)]
pub struct InMemoryRolePermissionsRepository {
    saved: RwLock<HashMap<RoleId, PermissionSet>>,
}

impl InMemoryRolePermissionsRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last saved permission set of a role.
    pub async fn saved_permissions(&self, role_id: RoleId) -> Option<PermissionSet> {
        self.saved.read().await.get(&role_id).cloned()
    }
}

#[async_trait]
impl RolePermissionsRepository for InMemoryRolePermissionsRepository {
    async fn persist_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[String],
    ) -> AppResult<()> {
        let permissions: PermissionSet = permission_ids.iter().map(String::as_str).collect();
        debug!(
            role_id = %role_id,
            permission_count = permissions.len(),
            "stored role permissions in memory"
        );
        self.saved.write().await.insert(role_id, permissions);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use qms_application::RolePermissionsRepository;
    use qms_domain::{PermissionSet, RoleId};

    use super::InMemoryRolePermissionsRepository;

    #[tokio::test]
    async fn later_save_replaces_earlier_one() {
        let repository = InMemoryRolePermissionsRepository::new();
        let role_id = RoleId::new();

        let first = repository
            .persist_role_permissions(role_id, &["doc_view".to_owned(), "doc_edit".to_owned()])
            .await;
        assert!(first.is_ok());
        let second = repository
            .persist_role_permissions(role_id, &["doc_view".to_owned()])
            .await;
        assert!(second.is_ok());

        let expected: PermissionSet = ["doc_view"].into_iter().collect();
        assert_eq!(repository.saved_permissions(role_id).await, Some(expected));
    }

    #[tokio::test]
    async fn unknown_role_has_no_saved_permissions() {
        let repository = InMemoryRolePermissionsRepository::new();
        assert!(repository.saved_permissions(RoleId::new()).await.is_none());
    }
}
