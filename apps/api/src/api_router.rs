use axum::Router;
use axum::routing::{get, post, put};
use qms_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let editor_routes = Router::new()
        .route(
            "/api/catalog",
            get(handlers::catalog::permission_catalog_handler),
        )
        .route("/api/editor", get(handlers::editor::editor_view_handler))
        .route(
            "/api/editor/select",
            post(handlers::editor::select_role_handler),
        )
        .route(
            "/api/editor/toggle",
            post(handlers::editor::toggle_permission_handler),
        )
        .route(
            "/api/editor/groups/{group_id}",
            put(handlers::editor::set_group_selection_handler),
        )
        .route(
            "/api/editor/filter",
            put(handlers::editor::set_permission_filter_handler),
        )
        .route(
            "/api/editor/save",
            post(handlers::editor::save_changes_handler),
        )
        .route(
            "/api/editor/discard",
            post(handlers::editor::discard_changes_handler),
        )
        .route("/api/roles", post(handlers::editor::create_role_handler))
        .route(
            "/api/roles/{role_id}",
            put(handlers::editor::update_role_handler)
                .delete(handlers::editor::delete_role_handler),
        )
        .route("/api/audit", get(handlers::audit::list_audit_log_handler));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(editor_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use qms_core::AppError;

    use super::cors::build_cors_layer;

    #[test]
    fn cors_rejects_unparseable_frontend_url() {
        assert!(build_cors_layer("http://localhost:3000/").is_ok());
        assert!(matches!(
            build_cors_layer("http://bad\nhost"),
            Err(AppError::Validation(_))
        ));
    }
}
