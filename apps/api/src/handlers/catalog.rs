use axum::Json;
use axum::extract::State;

use crate::dto::PermissionCatalogResponse;
use crate::state::AppState;

pub async fn permission_catalog_handler(
    State(state): State<AppState>,
) -> Json<PermissionCatalogResponse> {
    Json(PermissionCatalogResponse::from(state.catalog.as_ref()))
}
