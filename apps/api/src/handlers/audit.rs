use axum::Json;
use axum::extract::{Query, State};

use qms_application::AuditLogQuery;
use qms_domain::AuditAction;

use crate::dto::{AuditLogEntryResponse, AuditLogQueryParams};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_AUDIT_PAGE_SIZE: usize = 50;
const MAX_AUDIT_PAGE_SIZE: usize = 500;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQueryParams>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let action = query
        .action
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(str::parse::<AuditAction>)
        .transpose()?;

    let entries = state
        .audit_log_repository
        .list_recent_entries(AuditLogQuery {
            limit: query
                .limit
                .unwrap_or(DEFAULT_AUDIT_PAGE_SIZE)
                .min(MAX_AUDIT_PAGE_SIZE),
            offset: query.offset.unwrap_or(0),
            action,
        })
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
