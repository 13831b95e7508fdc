use std::collections::BTreeSet;

use qms_domain::{
    Permission, PermissionAction, PermissionCatalog, RoleColor, RoleId, RoleKind, SelectionCount,
    SelectionState, filter_visible_permissions, group_selection_count, is_dirty,
    total_selection_count,
};

use super::{Notice, RoleEditorState};

/// Derived view model rendered by the role editor surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEditorView {
    /// Role list entries.
    pub roles: Vec<RoleListItem>,
    /// Detail panel of the selected role.
    pub selected: Option<SelectedRoleView>,
    /// Current search text.
    pub search_text: String,
    /// Current action filter.
    pub action_filter: BTreeSet<PermissionAction>,
    /// Inline name field error.
    pub validation_error: Option<String>,
    /// Pending toast notifications.
    pub notices: Vec<Notice>,
}

/// One row of the role list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListItem {
    /// Role id.
    pub role_id: RoleId,
    /// Role name.
    pub name: String,
    /// Role description.
    pub description: String,
    /// Role kind.
    pub kind: RoleKind,
    /// Active flag.
    pub is_active: bool,
    /// Assigned users, display only.
    pub user_count: u32,
    /// Badge color.
    pub color: RoleColor,
    /// Number of committed permission ids.
    pub permission_count: usize,
    /// Whether this row is selected.
    pub is_selected: bool,
}

/// Permission matrix of the selected role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRoleView {
    /// Role id.
    pub role_id: RoleId,
    /// Role name.
    pub name: String,
    /// Role kind.
    pub kind: RoleKind,
    /// Whether working permissions differ from the saved snapshot.
    pub is_dirty: bool,
    /// Held versus catalog-wide permission counts.
    pub total: SelectionCount,
    /// Groups in catalog order. Groups emptied by an active filter are left out.
    pub groups: Vec<GroupView>,
}

/// One permission group of the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    /// Group id.
    pub group_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Selection counts over the whole group, ignoring filters.
    pub count: SelectionCount,
    /// Select-all checkbox state.
    pub state: SelectionState,
    /// Permissions passing the current filter.
    pub permissions: Vec<PermissionView>,
}

/// One permission checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionView {
    /// Permission id.
    pub permission_id: String,
    /// Owning module.
    pub module: String,
    /// Action verb.
    pub action: PermissionAction,
    /// Label.
    pub label: String,
    /// Description.
    pub description: String,
    /// Whether granting leaves an audit trail.
    pub requires_audit_trail: bool,
    /// Whether the working set holds the permission.
    pub is_selected: bool,
}

impl RoleEditorView {
    pub(super) fn build(state: &RoleEditorState, catalog: &PermissionCatalog) -> Self {
        let selected_role_id = state.store().selected_role_id();

        let roles = state
            .store()
            .roles()
            .iter()
            .map(|role| RoleListItem {
                role_id: role.id(),
                name: role.name().to_owned(),
                description: role.description().to_owned(),
                kind: role.kind(),
                is_active: role.is_active(),
                user_count: role.user_count(),
                color: role.color(),
                permission_count: role.permissions().len(),
                is_selected: Some(role.id()) == selected_role_id,
            })
            .collect();

        let selected = state.store().selected_role().map(|role| {
            let working = state.working_permissions();
            let filter = state.filter();

            let groups = catalog
                .groups()
                .iter()
                .filter_map(|group| {
                    let permissions: Vec<PermissionView> =
                        filter_visible_permissions(group, filter)
                            .map(|permission| {
                                PermissionView::build(permission, working.contains(permission.id()))
                            })
                            .collect();

                    if permissions.is_empty() && !filter.is_empty() {
                        return None;
                    }

                    let count = group_selection_count(working, group);
                    Some(GroupView {
                        group_id: group.id().to_owned(),
                        name: group.name().to_owned(),
                        description: group.description().to_owned(),
                        count,
                        state: count.selection_state(),
                        permissions,
                    })
                })
                .collect();

            SelectedRoleView {
                role_id: role.id(),
                name: role.name().to_owned(),
                kind: role.kind(),
                is_dirty: is_dirty(working, state.saved_permissions()),
                total: total_selection_count(working, catalog),
                groups,
            }
        });

        Self {
            roles,
            selected,
            search_text: state.filter().search_text().to_owned(),
            action_filter: state.filter().actions().clone(),
            validation_error: state.validation_error().map(str::to_owned),
            notices: state.notices().to_vec(),
        }
    }
}

impl PermissionView {
    fn build(permission: &Permission, is_selected: bool) -> Self {
        Self {
            permission_id: permission.id().to_owned(),
            module: permission.module().to_owned(),
            action: permission.action(),
            label: permission.label().to_owned(),
            description: permission.description().to_owned(),
            requires_audit_trail: permission.requires_audit_trail(),
            is_selected,
        }
    }
}
