use async_trait::async_trait;
use chrono::Utc;
use qms_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
use qms_core::AppResult;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Append-only in-memory audit log.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let entry = AuditLogEntry {
            event_id: Uuid::new_v4().to_string(),
            subject: event.subject,
            action: event.action.as_str().to_owned(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            detail: event.detail,
            created_at: Utc::now().to_rfc3339(),
        };

        info!(
            event_id = %entry.event_id,
            subject = %entry.subject,
            action = %entry.action,
            resource_id = %entry.resource_id,
            "audit event recorded"
        );

        self.entries.write().await.push(entry);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let action = query.action.map(|action| action.as_str());

        Ok(self
            .entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|entry| action.is_none_or(|action| entry.action == action))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}
