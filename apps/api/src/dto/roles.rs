use std::str::FromStr;

use qms_application::{CreateRoleInput, UpdateRoleInput};
use qms_core::AppError;
use qms_domain::{Role, RoleColor, RoleId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
    pub base_role_id: Option<String>,
}

/// Incoming payload for role edits. Missing fields keep their value.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

/// API representation of a role record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub is_active: bool,
    pub user_count: u32,
    pub color: String,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub modified_at: String,
}

impl TryFrom<CreateRoleRequest> for CreateRoleInput {
    type Error = AppError;

    fn try_from(value: CreateRoleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            description: value.description.unwrap_or_default(),
            color: value
                .color
                .as_deref()
                .map(RoleColor::from_str)
                .transpose()?
                .unwrap_or_default(),
            is_active: value.is_active.unwrap_or(true),
            base_role_id: value
                .base_role_id
                .as_deref()
                .filter(|role_id| !role_id.trim().is_empty())
                .map(RoleId::from_str)
                .transpose()?,
        })
    }
}

impl TryFrom<UpdateRoleRequest> for UpdateRoleInput {
    type Error = AppError;

    fn try_from(value: UpdateRoleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            description: value.description,
            color: value.color.as_deref().map(RoleColor::from_str).transpose()?,
            is_active: value.is_active,
        })
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            kind: value.kind().as_str().to_owned(),
            is_active: value.is_active(),
            user_count: value.user_count(),
            color: value.color().as_str().to_owned(),
            permissions: value.permissions().iter().map(str::to_owned).collect(),
            created_at: value.created_at().to_rfc3339(),
            modified_at: value.modified_at().to_rfc3339(),
        }
    }
}
