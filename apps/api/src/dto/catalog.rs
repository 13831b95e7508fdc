use qms_domain::{Permission, PermissionCatalog, PermissionGroup};
use serde::Serialize;
use ts_rs::TS;

/// API representation of one catalog permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub module: String,
    pub action: String,
    pub label: String,
    pub description: String,
    pub requires_audit_trail: bool,
}

/// API representation of a permission group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-group-response.ts"
)]
pub struct PermissionGroupResponse {
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
    pub permissions: Vec<PermissionResponse>,
}

/// API representation of the permission catalog.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-catalog-response.ts"
)]
pub struct PermissionCatalogResponse {
    pub permission_count: usize,
    pub groups: Vec<PermissionGroupResponse>,
}

impl From<&Permission> for PermissionResponse {
    fn from(value: &Permission) -> Self {
        Self {
            permission_id: value.id().to_owned(),
            module: value.module().to_owned(),
            action: value.action().as_str().to_owned(),
            label: value.label().to_owned(),
            description: value.description().to_owned(),
            requires_audit_trail: value.requires_audit_trail(),
        }
    }
}

impl From<&PermissionGroup> for PermissionGroupResponse {
    fn from(value: &PermissionGroup) -> Self {
        Self {
            group_id: value.id().to_owned(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            sort_order: value.sort_order(),
            permissions: value
                .permissions()
                .iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

impl From<&PermissionCatalog> for PermissionCatalogResponse {
    fn from(value: &PermissionCatalog) -> Self {
        Self {
            permission_count: value.permission_count(),
            groups: value
                .groups()
                .iter()
                .map(PermissionGroupResponse::from)
                .collect(),
        }
    }
}
