use std::sync::Arc;

use qms_application::{AuditLogRepository, RoleEditor};
use qms_domain::PermissionCatalog;
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PermissionCatalog>,
    pub role_editor: Arc<Mutex<RoleEditor>>,
    pub audit_log_repository: Arc<dyn AuditLogRepository>,
}
