use qms_application::{
    GroupView, Notice, NoticeLevel, PermissionView, RoleEditorView, RoleListItem,
    SelectedRoleView,
};
use qms_domain::SelectionState;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for switching the selected role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/select-role-request.ts"
)]
pub struct SelectRoleRequest {
    pub role_id: String,
    #[serde(default)]
    pub discard_unsaved: bool,
}

/// Incoming payload for flipping one permission.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/toggle-permission-request.ts"
)]
pub struct TogglePermissionRequest {
    pub permission_id: String,
}

/// Incoming payload for a group select-all checkbox.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-selection-request.ts"
)]
pub struct GroupSelectionRequest {
    pub checked: bool,
}

/// Incoming payload for the permission filter. Missing fields keep their value.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-filter-request.ts"
)]
pub struct PermissionFilterRequest {
    pub search_text: Option<String>,
    pub actions: Option<Vec<String>>,
}

/// API representation of a toast notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notice-response.ts"
)]
pub struct NoticeResponse {
    pub level: String,
    pub message: String,
}

/// API representation of one role list row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-list-item-response.ts"
)]
pub struct RoleListItemResponse {
    pub role_id: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub is_active: bool,
    pub user_count: u32,
    pub color: String,
    pub permission_count: usize,
    pub is_selected: bool,
}

/// API representation of one permission checkbox.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-view-response.ts"
)]
pub struct PermissionViewResponse {
    pub permission_id: String,
    pub module: String,
    pub action: String,
    pub label: String,
    pub description: String,
    pub requires_audit_trail: bool,
    pub is_selected: bool,
}

/// API representation of one permission group in the matrix.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-view-response.ts"
)]
pub struct GroupViewResponse {
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub selected: usize,
    pub total: usize,
    pub state: String,
    pub permissions: Vec<PermissionViewResponse>,
}

/// API representation of the selected role detail panel.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/selected-role-response.ts"
)]
pub struct SelectedRoleResponse {
    pub role_id: String,
    pub name: String,
    pub kind: String,
    pub is_dirty: bool,
    pub selected: usize,
    pub total: usize,
    pub groups: Vec<GroupViewResponse>,
}

/// API representation of the full role editor view.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/editor-view-response.ts"
)]
pub struct EditorViewResponse {
    pub roles: Vec<RoleListItemResponse>,
    pub selected: Option<SelectedRoleResponse>,
    pub search_text: String,
    pub action_filter: Vec<String>,
    pub validation_error: Option<String>,
    pub notices: Vec<NoticeResponse>,
}

fn selection_state_value(state: SelectionState) -> &'static str {
    match state {
        SelectionState::None => "none",
        SelectionState::Partial => "partial",
        SelectionState::All => "all",
    }
}

impl From<Notice> for NoticeResponse {
    fn from(value: Notice) -> Self {
        let level = match value.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };

        Self {
            level: level.to_owned(),
            message: value.message,
        }
    }
}

impl From<RoleListItem> for RoleListItemResponse {
    fn from(value: RoleListItem) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            name: value.name,
            description: value.description,
            kind: value.kind.as_str().to_owned(),
            is_active: value.is_active,
            user_count: value.user_count,
            color: value.color.as_str().to_owned(),
            permission_count: value.permission_count,
            is_selected: value.is_selected,
        }
    }
}

impl From<PermissionView> for PermissionViewResponse {
    fn from(value: PermissionView) -> Self {
        Self {
            permission_id: value.permission_id,
            module: value.module,
            action: value.action.as_str().to_owned(),
            label: value.label,
            description: value.description,
            requires_audit_trail: value.requires_audit_trail,
            is_selected: value.is_selected,
        }
    }
}

impl From<GroupView> for GroupViewResponse {
    fn from(value: GroupView) -> Self {
        Self {
            group_id: value.group_id,
            name: value.name,
            description: value.description,
            selected: value.count.selected,
            total: value.count.total,
            state: selection_state_value(value.state).to_owned(),
            permissions: value
                .permissions
                .into_iter()
                .map(PermissionViewResponse::from)
                .collect(),
        }
    }
}

impl From<SelectedRoleView> for SelectedRoleResponse {
    fn from(value: SelectedRoleView) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            name: value.name,
            kind: value.kind.as_str().to_owned(),
            is_dirty: value.is_dirty,
            selected: value.total.selected,
            total: value.total.total,
            groups: value
                .groups
                .into_iter()
                .map(GroupViewResponse::from)
                .collect(),
        }
    }
}

impl From<RoleEditorView> for EditorViewResponse {
    fn from(value: RoleEditorView) -> Self {
        Self {
            roles: value
                .roles
                .into_iter()
                .map(RoleListItemResponse::from)
                .collect(),
            selected: value.selected.map(SelectedRoleResponse::from),
            search_text: value.search_text,
            action_filter: value
                .action_filter
                .iter()
                .map(|action| action.as_str().to_owned())
                .collect(),
            validation_error: value.validation_error,
            notices: value
                .notices
                .into_iter()
                .map(NoticeResponse::from)
                .collect(),
        }
    }
}
