//! Role editor: single source of truth for the role administration surface.
//!
//! The editor owns the [`RoleStore`], the working permission set of the
//! selected role and the snapshot it was loaded from. Callers send
//! [`RoleEditorIntent`]s through [`RoleEditor::dispatch`], read derived state
//! through [`RoleEditor::view`], and can subscribe to change notifications.
//!
//! Failed intents never leave the store partially mutated. Validation errors
//! are kept as the inline name field message; protected and not-found
//! conditions are queued as [`Notice`]s.

mod intents;
mod view;

use std::collections::BTreeSet;
use std::sync::Arc;

use qms_core::{AppError, AppResult};
use qms_domain::{
    AuditAction, PermissionAction, PermissionCatalog, PermissionFilter, PermissionSet, Role,
    RoleId, audited_permissions, is_dirty, set_group_selection, toggle,
};

use crate::role_editor_ports::{AuditEvent, AuditRepository, RolePermissionsRepository};
use crate::role_store::{CreateRoleInput, RoleStore, UpdateRoleInput};

pub use intents::{DispatchOutcome, RoleEditorIntent};
pub use view::{GroupView, PermissionView, RoleEditorView, RoleListItem, SelectedRoleView};

const ROLE_RESOURCE_TYPE: &str = "qms_role";

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// The intent was rejected.
    Error,
}

/// Transient notification shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message.
    pub message: String,
}

/// Observable editor state.
#[derive(Debug, Clone)]
pub struct RoleEditorState {
    store: RoleStore,
    working_permissions: PermissionSet,
    saved_permissions: PermissionSet,
    filter: PermissionFilter,
    validation_error: Option<String>,
    notices: Vec<Notice>,
}

impl RoleEditorState {
    fn new(store: RoleStore) -> Self {
        let saved_permissions = store
            .selected_role()
            .map(|role| role.permissions().clone())
            .unwrap_or_default();

        Self {
            store,
            working_permissions: saved_permissions.clone(),
            saved_permissions,
            filter: PermissionFilter::default(),
            validation_error: None,
            notices: Vec::new(),
        }
    }

    /// Returns the role store.
    #[must_use]
    pub fn store(&self) -> &RoleStore {
        &self.store
    }

    /// Returns the unsaved permission set of the selected role.
    #[must_use]
    pub fn working_permissions(&self) -> &PermissionSet {
        &self.working_permissions
    }

    /// Returns the last saved permission set of the selected role.
    #[must_use]
    pub fn saved_permissions(&self) -> &PermissionSet {
        &self.saved_permissions
    }

    /// Returns the active permission filter.
    #[must_use]
    pub fn filter(&self) -> &PermissionFilter {
        &self.filter
    }

    /// Returns the inline name field error.
    #[must_use]
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// Returns pending notices.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Returns whether the selected role has unsaved permission changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        is_dirty(&self.working_permissions, &self.saved_permissions)
    }

    fn load_selected(&mut self) {
        self.saved_permissions = self
            .store
            .selected_role()
            .map(|role| role.permissions().clone())
            .unwrap_or_default();
        self.working_permissions = self.saved_permissions.clone();
    }
}

/// Handle returned by [`RoleEditor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&RoleEditorState) + Send + Sync>;

/// Application service driving the role administration surface.
pub struct RoleEditor {
    catalog: Arc<PermissionCatalog>,
    state: RoleEditorState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription_id: u64,
    permissions_repository: Arc<dyn RolePermissionsRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    actor: String,
}

impl RoleEditor {
    /// Creates an editor over seeded roles.
    ///
    /// `actor` is recorded as the subject of emitted audit events.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        store: RoleStore,
        permissions_repository: Arc<dyn RolePermissionsRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            state: RoleEditorState::new(store),
            listeners: Vec::new(),
            next_subscription_id: 0,
            permissions_repository,
            audit_repository,
            actor: actor.into(),
        }
    }

    /// Returns the permission catalog.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &RoleEditorState {
        &self.state
    }

    /// Returns the derived view model.
    #[must_use]
    pub fn view(&self) -> RoleEditorView {
        RoleEditorView::build(&self.state, &self.catalog)
    }

    /// Registers a listener called after every state change.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&RoleEditorState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let subscription_id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.listeners.push((subscription_id, Box::new(listener)));
        subscription_id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, subscription_id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription_id);
        self.listeners.len() != before
    }

    /// Drains pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        let notices = std::mem::take(&mut self.state.notices);
        if !notices.is_empty() {
            self.notify();
        }
        notices
    }

    /// Applies one intent.
    ///
    /// Errors are also recorded in the state: validation errors as the
    /// inline field message, everything else as an error notice. Role
    /// mutations are rolled back when a later step fails, including the
    /// audit append.
    pub async fn dispatch(&mut self, intent: RoleEditorIntent) -> AppResult<DispatchOutcome> {
        let is_form_intent = matches!(
            intent,
            RoleEditorIntent::CreateRole(_) | RoleEditorIntent::UpdateRole { .. }
        );
        let rollback = matches!(
            intent,
            RoleEditorIntent::CreateRole(_)
                | RoleEditorIntent::UpdateRole { .. }
                | RoleEditorIntent::DeleteRole(_)
                | RoleEditorIntent::SaveChanges
        )
        .then(|| self.state.clone());

        let result = match intent {
            RoleEditorIntent::TogglePermission(permission_id) => {
                self.toggle_permission(permission_id.as_str())
            }
            RoleEditorIntent::SetGroupSelection { group_id, checked } => {
                self.set_group_selection(group_id.as_str(), checked)
            }
            RoleEditorIntent::CreateRole(input) => self.create_role(input).await,
            RoleEditorIntent::UpdateRole { role_id, input } => {
                self.update_role(role_id, input).await
            }
            RoleEditorIntent::DeleteRole(role_id) => self.delete_role(role_id).await,
            RoleEditorIntent::SelectRole {
                role_id,
                discard_unsaved,
            } => self.select_role(role_id, discard_unsaved),
            RoleEditorIntent::SetSearch(search_text) => {
                let actions = self.state.filter.actions().clone();
                Ok(self.set_filter(PermissionFilter::new(search_text, actions)))
            }
            RoleEditorIntent::SetActionFilter(actions) => {
                let search_text = self.state.filter.search_text().to_owned();
                Ok(self.set_filter(PermissionFilter::new(search_text, actions)))
            }
            RoleEditorIntent::SetFilter {
                search_text,
                actions,
            } => {
                let search_text =
                    search_text.unwrap_or_else(|| self.state.filter.search_text().to_owned());
                let actions = actions.unwrap_or_else(|| self.state.filter.actions().clone());
                Ok(self.set_filter(PermissionFilter::new(search_text, actions)))
            }
            RoleEditorIntent::SaveChanges => self.save_changes().await,
            RoleEditorIntent::DiscardChanges => Ok(self.discard_changes()),
        };

        match result {
            Ok(outcome) => {
                if is_form_intent {
                    self.state.validation_error = None;
                }
                if !matches!(
                    outcome,
                    DispatchOutcome::Unchanged | DispatchOutcome::ConfirmationRequired { .. }
                ) {
                    self.notify();
                }
                Ok(outcome)
            }
            Err(error) => {
                if let Some(snapshot) = rollback {
                    self.state = snapshot;
                }
                self.record_error(&error);
                self.notify();
                Err(error)
            }
        }
    }

    fn toggle_permission(&mut self, permission_id: &str) -> AppResult<DispatchOutcome> {
        self.require_selected_role()?;
        self.state.working_permissions = toggle(&self.state.working_permissions, permission_id);
        Ok(DispatchOutcome::Applied)
    }

    fn set_group_selection(&mut self, group_id: &str, checked: bool) -> AppResult<DispatchOutcome> {
        self.require_selected_role()?;
        let group = self.catalog.group(group_id).ok_or_else(|| {
            AppError::NotFound(format!("permission group '{group_id}' does not exist"))
        })?;

        let next = set_group_selection(&self.state.working_permissions, group, checked);
        if next == self.state.working_permissions {
            return Ok(DispatchOutcome::Unchanged);
        }

        self.state.working_permissions = next;
        Ok(DispatchOutcome::Applied)
    }

    async fn create_role(&mut self, input: CreateRoleInput) -> AppResult<DispatchOutcome> {
        let role = self.state.store.create(input)?;

        if !self.state.is_dirty() {
            self.state.store.select(role.id())?;
            self.state.load_selected();
        }

        self.append_audit_event(
            AuditAction::RoleCreated,
            &role,
            format!(
                "created role '{}' with {} permissions",
                role.name(),
                role.permissions().len()
            ),
        )
        .await?;

        Ok(DispatchOutcome::RoleCreated(role))
    }

    async fn update_role(
        &mut self,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<DispatchOutcome> {
        let role = self.state.store.update(role_id, input)?;

        self.append_audit_event(
            AuditAction::RoleUpdated,
            &role,
            format!("updated role '{}'", role.name()),
        )
        .await?;

        Ok(DispatchOutcome::RoleUpdated(role))
    }

    async fn delete_role(&mut self, role_id: RoleId) -> AppResult<DispatchOutcome> {
        let was_selected = self.state.store.selected_role_id() == Some(role_id);
        let role = self.state.store.delete(role_id)?;

        if was_selected {
            self.state.load_selected();
        }

        self.state.notices.push(Notice {
            level: NoticeLevel::Info,
            message: format!("role '{}' deleted", role.name()),
        });

        self.append_audit_event(
            AuditAction::RoleDeleted,
            &role,
            format!("deleted role '{}'", role.name()),
        )
        .await?;

        Ok(DispatchOutcome::RoleDeleted(role))
    }

    fn select_role(
        &mut self,
        role_id: RoleId,
        discard_unsaved: bool,
    ) -> AppResult<DispatchOutcome> {
        self.state.store.require(role_id)?;

        if self.state.store.selected_role_id() == Some(role_id) {
            return Ok(DispatchOutcome::Unchanged);
        }

        if self.state.is_dirty() && !discard_unsaved {
            return Ok(DispatchOutcome::ConfirmationRequired {
                pending_role_id: role_id,
            });
        }

        self.state.store.select(role_id)?;
        self.state.load_selected();
        self.state.validation_error = None;
        Ok(DispatchOutcome::Applied)
    }

    fn set_filter(&mut self, filter: PermissionFilter) -> DispatchOutcome {
        if filter == self.state.filter {
            return DispatchOutcome::Unchanged;
        }

        self.state.filter = filter;
        DispatchOutcome::Applied
    }

    fn discard_changes(&mut self) -> DispatchOutcome {
        if !self.state.is_dirty() {
            return DispatchOutcome::Unchanged;
        }

        self.state.working_permissions = self.state.saved_permissions.clone();
        DispatchOutcome::Applied
    }

    /// Persists the working permission set of the selected role.
    ///
    /// The backend is called before the store is touched, so a failing
    /// backend leaves the editor dirty and unchanged.
    async fn save_changes(&mut self) -> AppResult<DispatchOutcome> {
        let role_id = self.require_selected_role()?;

        if !self.state.is_dirty() {
            return Ok(DispatchOutcome::Unchanged);
        }

        let working = self.state.working_permissions.clone();
        let granted = working.difference(&self.state.saved_permissions);
        let revoked = self.state.saved_permissions.difference(&working);
        let permission_ids: Vec<String> = working.iter().map(str::to_owned).collect();

        self.permissions_repository
            .persist_role_permissions(role_id, &permission_ids)
            .await?;

        let role = self.state.store.replace_permissions(role_id, working)?;
        self.state.load_selected();

        let audited: Vec<&str> = audited_permissions(role.permissions(), &self.catalog)
            .into_iter()
            .map(|permission| permission.id())
            .collect();
        let detail = format!(
            "saved permissions of role '{}': granted [{}]; revoked [{}]; audited [{}]",
            role.name(),
            granted.join(", "),
            revoked.join(", "),
            audited.join(", ")
        );

        self.append_audit_event(AuditAction::RolePermissionsSaved, &role, detail)
            .await?;

        Ok(DispatchOutcome::PermissionsSaved(role))
    }

    fn require_selected_role(&self) -> AppResult<RoleId> {
        self.state
            .store
            .selected_role_id()
            .ok_or_else(|| AppError::NotFound("no role is selected".to_owned()))
    }

    fn record_error(&mut self, error: &AppError) {
        match error {
            AppError::Validation(message) => {
                self.state.validation_error = Some(message.clone());
            }
            other => self.state.notices.push(Notice {
                level: NoticeLevel::Error,
                message: other.message().to_owned(),
            }),
        }
    }

    async fn append_audit_event(
        &self,
        action: AuditAction,
        role: &Role,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: self.actor.clone(),
                action,
                resource_type: ROLE_RESOURCE_TYPE.to_owned(),
                resource_id: role.id().to_string(),
                detail: Some(detail),
            })
            .await
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

impl std::fmt::Debug for RoleEditor {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RoleEditor")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

/// Parses transport action values into an action filter.
pub fn parse_action_filter<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> AppResult<BTreeSet<PermissionAction>> {
    values.into_iter().map(str::parse).collect()
}

#[cfg(test)]
mod tests;
