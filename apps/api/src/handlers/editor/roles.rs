use super::*;

fn mutated_role(outcome: DispatchOutcome) -> Result<Role, AppError> {
    match outcome {
        DispatchOutcome::RoleCreated(role)
        | DispatchOutcome::RoleUpdated(role)
        | DispatchOutcome::RoleDeleted(role) => Ok(role),
        other => Err(AppError::Internal(format!(
            "unexpected role editor outcome {other:?}"
        ))),
    }
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleMutationResponse>)> {
    let input = CreateRoleInput::try_from(payload)?;
    let (outcome, editor) = dispatch_intent(&state, RoleEditorIntent::CreateRole(input)).await?;
    let role = mutated_role(outcome)?;

    Ok((
        StatusCode::CREATED,
        Json(RoleMutationResponse {
            role: RoleResponse::from(role),
            editor,
        }),
    ))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleMutationResponse>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let input = UpdateRoleInput::try_from(payload)?;
    let (outcome, editor) =
        dispatch_intent(&state, RoleEditorIntent::UpdateRole { role_id, input }).await?;
    let role = mutated_role(outcome)?;

    Ok(Json(RoleMutationResponse {
        role: RoleResponse::from(role),
        editor,
    }))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleMutationResponse>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let (outcome, editor) = dispatch_intent(&state, RoleEditorIntent::DeleteRole(role_id)).await?;
    let role = mutated_role(outcome)?;

    Ok(Json(RoleMutationResponse {
        role: RoleResponse::from(role),
        editor,
    }))
}
