use serde::Serialize;
use ts_rs::TS;

mod audit;
mod catalog;
mod editor;
mod roles;

pub use audit::{AuditLogEntryResponse, AuditLogQueryParams};
pub use catalog::{PermissionCatalogResponse, PermissionGroupResponse, PermissionResponse};
pub use editor::{
    EditorViewResponse, GroupSelectionRequest, GroupViewResponse, NoticeResponse,
    PermissionFilterRequest, PermissionViewResponse, RoleListItemResponse, SelectRoleRequest,
    SelectedRoleResponse, TogglePermissionRequest,
};
pub use roles::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub permission_count: usize,
}

/// Role mutation result together with the refreshed editor view.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-mutation-response.ts"
)]
pub struct RoleMutationResponse {
    pub role: RoleResponse,
    pub editor: EditorViewResponse,
}

#[cfg(test)]
mod tests {
    use super::{
        AuditLogEntryResponse, AuditLogQueryParams, CreateRoleRequest, EditorViewResponse,
        GroupSelectionRequest, GroupViewResponse, HealthResponse, NoticeResponse,
        PermissionCatalogResponse, PermissionFilterRequest, PermissionGroupResponse,
        PermissionResponse, PermissionViewResponse, RoleListItemResponse, RoleMutationResponse,
        RoleResponse, SelectRoleRequest, SelectedRoleResponse, TogglePermissionRequest,
        UpdateRoleRequest,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        PermissionResponse::export(&config)?;
        PermissionGroupResponse::export(&config)?;
        PermissionCatalogResponse::export(&config)?;
        CreateRoleRequest::export(&config)?;
        UpdateRoleRequest::export(&config)?;
        RoleResponse::export(&config)?;
        RoleMutationResponse::export(&config)?;
        SelectRoleRequest::export(&config)?;
        TogglePermissionRequest::export(&config)?;
        GroupSelectionRequest::export(&config)?;
        PermissionFilterRequest::export(&config)?;
        NoticeResponse::export(&config)?;
        RoleListItemResponse::export(&config)?;
        PermissionViewResponse::export(&config)?;
        GroupViewResponse::export(&config)?;
        SelectedRoleResponse::export(&config)?;
        EditorViewResponse::export(&config)?;
        AuditLogQueryParams::export(&config)?;
        AuditLogEntryResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;

        Ok(())
    }
}
