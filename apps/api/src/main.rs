//! Quality management role administration API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use qms_application::{RoleEditor, RolePermissionsRepository, RoleStore};
use qms_core::AppError;
use qms_domain::PermissionCatalog;
use qms_infrastructure::{
    InMemoryAuditRepository, InMemoryRolePermissionsRepository, LoggingRolePermissionsRepository,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api_config::{ApiConfig, PersistenceBackend};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let catalog = Arc::new(PermissionCatalog::standard()?);

    let roles = if config.seed_demo_roles {
        dev_seed::demo_roles(&catalog)?
    } else {
        Vec::new()
    };
    let store = RoleStore::new(roles)?;

    let permissions_repository: Arc<dyn RolePermissionsRepository> = match config.persistence {
        PersistenceBackend::Log => Arc::new(LoggingRolePermissionsRepository::new()),
        PersistenceBackend::Memory => Arc::new(InMemoryRolePermissionsRepository::new()),
    };
    let audit_repository = Arc::new(InMemoryAuditRepository::new());

    let mut role_editor = RoleEditor::new(
        catalog.clone(),
        store,
        permissions_repository,
        audit_repository.clone(),
        config.audit_subject.clone(),
    );
    role_editor.subscribe(|state| {
        debug!(
            roles = state.store().roles().len(),
            selected_role_id = ?state.store().selected_role_id(),
            is_dirty = state.is_dirty(),
            "role editor state changed"
        );
    });

    let app_state = AppState {
        catalog: catalog.clone(),
        role_editor: Arc::new(Mutex::new(role_editor)),
        audit_log_repository: audit_repository,
    };

    let app = api_router::build_router(app_state, config.frontend_url.as_str())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(
        %address,
        permission_count = catalog.permission_count(),
        persistence = ?config.persistence,
        "qms api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
