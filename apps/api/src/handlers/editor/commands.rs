use super::*;

pub async fn editor_view_handler(State(state): State<AppState>) -> Json<EditorViewResponse> {
    let mut editor = state.role_editor.lock().await;
    let view = EditorViewResponse::from(editor.view());
    editor.take_notices();
    Json(view)
}

pub async fn select_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<SelectRoleRequest>,
) -> ApiResult<Json<EditorViewResponse>> {
    let role_id = RoleId::from_str(payload.role_id.as_str())?;
    let (_, view) = dispatch_intent(
        &state,
        RoleEditorIntent::SelectRole {
            role_id,
            discard_unsaved: payload.discard_unsaved,
        },
    )
    .await?;

    Ok(Json(view))
}

pub async fn toggle_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<TogglePermissionRequest>,
) -> ApiResult<Json<EditorViewResponse>> {
    let (_, view) = dispatch_intent(
        &state,
        RoleEditorIntent::TogglePermission(payload.permission_id),
    )
    .await?;

    Ok(Json(view))
}

pub async fn set_group_selection_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(payload): Json<GroupSelectionRequest>,
) -> ApiResult<Json<EditorViewResponse>> {
    let (_, view) = dispatch_intent(
        &state,
        RoleEditorIntent::SetGroupSelection {
            group_id,
            checked: payload.checked,
        },
    )
    .await?;

    Ok(Json(view))
}

pub async fn set_permission_filter_handler(
    State(state): State<AppState>,
    Json(payload): Json<PermissionFilterRequest>,
) -> ApiResult<Json<EditorViewResponse>> {
    let actions = payload
        .actions
        .as_ref()
        .map(|values| parse_action_filter(values.iter().map(String::as_str)))
        .transpose()?;

    let (_, view) = dispatch_intent(
        &state,
        RoleEditorIntent::SetFilter {
            search_text: payload.search_text,
            actions,
        },
    )
    .await?;

    Ok(Json(view))
}

pub async fn save_changes_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<EditorViewResponse>> {
    let (_, view) = dispatch_intent(&state, RoleEditorIntent::SaveChanges).await?;
    Ok(Json(view))
}

pub async fn discard_changes_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<EditorViewResponse>> {
    let (_, view) = dispatch_intent(&state, RoleEditorIntent::DiscardChanges).await?;
    Ok(Json(view))
}
