//! Application services and ports.

#![forbid(unsafe_code)]

mod role_editor;
mod role_editor_ports;
mod role_store;

pub use role_editor::{
    DispatchOutcome, GroupView, Notice, NoticeLevel, PermissionView, RoleEditor,
    RoleEditorIntent, RoleEditorState, RoleEditorView, RoleListItem, SelectedRoleView,
    SubscriptionId, parse_action_filter,
};
pub use role_editor_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    RolePermissionsRepository,
};
pub use role_store::{CreateRoleInput, RoleStore, UpdateRoleInput};
