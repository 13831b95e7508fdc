//! Domain entities and invariants.

#![forbid(unsafe_code)]

/// Permission assignment engine.
pub mod assignment;
mod audit;
mod catalog;
mod permission;
mod permission_set;
mod role;

pub use assignment::{
    PermissionFilter, SelectionCount, SelectionState, VisiblePermissions, audited_permissions,
    filter_visible_permissions, group_selection_count, is_dirty, set_group_selection, toggle,
    total_selection_count,
};
pub use audit::AuditAction;
pub use catalog::PermissionCatalog;
pub use permission::{Permission, PermissionAction, PermissionGroup};
pub use permission_set::PermissionSet;
pub use role::{
    ROLE_NAME_MIN_LENGTH, Role, RoleColor, RoleId, RoleKind, RoleName, RoleNameViolation,
    validate_role_name,
};
