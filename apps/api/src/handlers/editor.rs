use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use qms_application::{
    CreateRoleInput, DispatchOutcome, RoleEditorIntent, UpdateRoleInput, parse_action_filter,
};
use qms_core::AppError;
use qms_domain::{Role, RoleId};

use crate::dto::{
    CreateRoleRequest, EditorViewResponse, GroupSelectionRequest, PermissionFilterRequest,
    RoleMutationResponse, RoleResponse, SelectRoleRequest, TogglePermissionRequest,
    UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod commands;
mod roles;

pub use commands::{
    discard_changes_handler, editor_view_handler, save_changes_handler, select_role_handler,
    set_group_selection_handler, set_permission_filter_handler, toggle_permission_handler,
};
pub use roles::{create_role_handler, delete_role_handler, update_role_handler};

/// Dispatches one intent and returns its outcome with the refreshed view.
///
/// Pending notices are drained into the view. A rejected intent drains them too
/// since the error body already carries the message.
async fn dispatch_intent(
    state: &AppState,
    intent: RoleEditorIntent,
) -> ApiResult<(DispatchOutcome, EditorViewResponse)> {
    let mut editor = state.role_editor.lock().await;

    let outcome = match editor.dispatch(intent).await {
        Ok(outcome) => outcome,
        Err(error) => {
            editor.take_notices();
            return Err(error.into());
        }
    };

    if let DispatchOutcome::ConfirmationRequired { pending_role_id } = outcome {
        return Err(AppError::Conflict(format!(
            "role selection '{pending_role_id}' would discard unsaved permission changes"
        ))
        .into());
    }

    let view = EditorViewResponse::from(editor.view());
    editor.take_notices();

    Ok((outcome, view))
}
