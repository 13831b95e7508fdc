use std::collections::BTreeSet;

use qms_domain::{PermissionAction, Role, RoleId};

use crate::role_store::{CreateRoleInput, UpdateRoleInput};

/// User intents accepted by the role editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleEditorIntent {
    /// Flip one permission of the selected role.
    TogglePermission(String),
    /// Grant or revoke a whole permission group on the selected role.
    SetGroupSelection {
        /// Catalog group id.
        group_id: String,
        /// `true` grants, `false` revokes.
        checked: bool,
    },
    /// Create a custom role.
    CreateRole(CreateRoleInput),
    /// Patch role details.
    UpdateRole {
        /// Edited role.
        role_id: RoleId,
        /// Form patch.
        input: UpdateRoleInput,
    },
    /// Delete a custom role.
    DeleteRole(RoleId),
    /// Switch the selected role.
    SelectRole {
        /// Role to select.
        role_id: RoleId,
        /// Caller confirmed that unsaved changes may be dropped.
        discard_unsaved: bool,
    },
    /// Change the permission search text.
    SetSearch(String),
    /// Change the action filter.
    SetActionFilter(BTreeSet<PermissionAction>),
    /// Change search text and action filter together. `None` keeps the
    /// current value.
    SetFilter {
        /// New search text.
        search_text: Option<String>,
        /// New action filter.
        actions: Option<BTreeSet<PermissionAction>>,
    },
    /// Commit the working permission set.
    SaveChanges,
    /// Reset the working permission set to the last saved snapshot.
    DiscardChanges,
}

/// Result of an accepted intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State changed.
    Applied,
    /// Nothing to do.
    Unchanged,
    /// A role was created.
    RoleCreated(Role),
    /// A role was updated.
    RoleUpdated(Role),
    /// A role was deleted.
    RoleDeleted(Role),
    /// Working permissions were saved for a role.
    PermissionsSaved(Role),
    /// Switching would drop unsaved changes; resend with confirmation.
    ConfirmationRequired {
        /// Role the caller tried to select.
        pending_role_id: RoleId,
    },
}
