use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use qms_core::{AppError, AppResult};
use qms_domain::{
    AuditAction, PermissionAction, PermissionCatalog, PermissionSet, Role, RoleColor, RoleId,
    RoleKind, SelectionCount, SelectionState, validate_role_name,
};

use crate::role_editor_ports::{AuditEvent, AuditRepository, RolePermissionsRepository};
use crate::role_store::{CreateRoleInput, RoleStore, UpdateRoleInput};

use super::{DispatchOutcome, NoticeLevel, RoleEditor, RoleEditorIntent, parse_action_filter};

#[derive(Default)]
struct FakeRolePermissionsRepository {
    saved: Mutex<Vec<(RoleId, Vec<String>)>>,
    fail: bool,
}

#[async_trait]
impl RolePermissionsRepository for FakeRolePermissionsRepository {
    async fn persist_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[String],
    ) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Internal("backend unavailable".to_owned()));
        }
        self.saved
            .lock()
            .await
            .push((role_id, permission_ids.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
    fail: bool,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Internal("audit log unavailable".to_owned()));
        }
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct Fixture {
    editor: RoleEditor,
    administrator_id: RoleId,
    reviewer_id: RoleId,
    permissions_repository: Arc<FakeRolePermissionsRepository>,
    audit_repository: Arc<FakeAuditRepository>,
}

fn role(name: &str, kind: RoleKind, permissions: &[&str]) -> Role {
    Role::new(
        RoleId::new(),
        validate_role_name(name, std::iter::empty()).unwrap_or_else(|_| unreachable!()),
        "",
        kind,
        RoleColor::Blue,
        permissions.iter().copied().collect(),
        Utc::now(),
    )
}

fn fixture_with(
    permissions_repository: FakeRolePermissionsRepository,
    audit_repository: FakeAuditRepository,
) -> Fixture {
    let catalog = Arc::new(PermissionCatalog::standard().unwrap_or_else(|_| unreachable!()));
    let administrator = role("Administrator", RoleKind::System, &["doc_view", "usr_assign"]);
    let reviewer = role("Reviewer", RoleKind::Custom, &["doc_view", "doc_review"]);
    let administrator_id = administrator.id();
    let reviewer_id = reviewer.id();
    let store = RoleStore::new(vec![administrator, reviewer]).unwrap_or_else(|_| unreachable!());

    let permissions_repository = Arc::new(permissions_repository);
    let audit_repository = Arc::new(audit_repository);
    let editor = RoleEditor::new(
        catalog,
        store,
        permissions_repository.clone(),
        audit_repository.clone(),
        "qa.admin",
    );

    Fixture {
        editor,
        administrator_id,
        reviewer_id,
        permissions_repository,
        audit_repository,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        FakeRolePermissionsRepository::default(),
        FakeAuditRepository::default(),
    )
}

fn fixture_with_failing_audit() -> Fixture {
    fixture_with(
        FakeRolePermissionsRepository::default(),
        FakeAuditRepository {
            fail: true,
            ..FakeAuditRepository::default()
        },
    )
}

async fn select(fixture: &mut Fixture, role_id: RoleId) {
    let outcome = fixture
        .editor
        .dispatch(RoleEditorIntent::SelectRole {
            role_id,
            discard_unsaved: false,
        })
        .await;
    assert_eq!(outcome.ok(), Some(DispatchOutcome::Applied));
}

fn documents_count(editor: &RoleEditor) -> Option<SelectionCount> {
    editor.view().selected.and_then(|selected| {
        selected
            .groups
            .into_iter()
            .find(|group| group.group_id == "documents")
            .map(|group| group.count)
    })
}

#[tokio::test]
async fn reviewer_documents_select_all_then_clear() {
    let mut fixture = fixture();
    let reviewer_id = fixture.reviewer_id;
    select(&mut fixture, reviewer_id).await;

    assert_eq!(
        documents_count(&fixture.editor),
        Some(SelectionCount {
            selected: 2,
            total: 8
        })
    );

    let enabled = fixture
        .editor
        .dispatch(RoleEditorIntent::SetGroupSelection {
            group_id: "documents".to_owned(),
            checked: true,
        })
        .await;
    assert!(enabled.is_ok());
    assert_eq!(
        documents_count(&fixture.editor),
        Some(SelectionCount {
            selected: 8,
            total: 8
        })
    );

    let cleared = fixture
        .editor
        .dispatch(RoleEditorIntent::SetGroupSelection {
            group_id: "documents".to_owned(),
            checked: false,
        })
        .await;
    assert!(cleared.is_ok());
    assert_eq!(
        documents_count(&fixture.editor),
        Some(SelectionCount {
            selected: 0,
            total: 8
        })
    );
}

#[tokio::test]
async fn toggle_marks_dirty_and_discard_restores_snapshot() {
    let mut fixture = fixture();

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
        .await;
    assert!(toggled.is_ok());
    assert!(fixture.editor.state().is_dirty());
    assert_eq!(
        fixture.editor.view().selected.map(|selected| selected.is_dirty),
        Some(true)
    );

    let discarded = fixture
        .editor
        .dispatch(RoleEditorIntent::DiscardChanges)
        .await;
    assert_eq!(discarded.ok(), Some(DispatchOutcome::Applied));
    assert!(!fixture.editor.state().is_dirty());
    assert!(!fixture.editor.state().working_permissions().contains("doc_edit"));
}

#[tokio::test]
async fn toggling_back_is_not_dirty() {
    let mut fixture = fixture();

    for _ in 0..2 {
        let result = fixture
            .editor
            .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
            .await;
        assert!(result.is_ok());
    }

    assert!(!fixture.editor.state().is_dirty());
}

#[tokio::test]
async fn switching_with_unsaved_changes_requires_confirmation() {
    let mut fixture = fixture();
    let administrator_id = fixture.administrator_id;
    let reviewer_id = fixture.reviewer_id;

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
        .await;
    assert!(toggled.is_ok());

    let unconfirmed = fixture
        .editor
        .dispatch(RoleEditorIntent::SelectRole {
            role_id: reviewer_id,
            discard_unsaved: false,
        })
        .await;
    assert_eq!(
        unconfirmed.ok(),
        Some(DispatchOutcome::ConfirmationRequired {
            pending_role_id: reviewer_id
        })
    );
    assert_eq!(
        fixture.editor.state().store().selected_role_id(),
        Some(administrator_id)
    );
    assert!(fixture.editor.state().is_dirty());

    let confirmed = fixture
        .editor
        .dispatch(RoleEditorIntent::SelectRole {
            role_id: reviewer_id,
            discard_unsaved: true,
        })
        .await;
    assert_eq!(confirmed.ok(), Some(DispatchOutcome::Applied));
    assert_eq!(
        fixture.editor.state().store().selected_role_id(),
        Some(reviewer_id)
    );
    assert!(!fixture.editor.state().is_dirty());

    let administrator = fixture
        .editor
        .state()
        .store()
        .get(administrator_id)
        .unwrap_or_else(|| unreachable!());
    assert!(!administrator.permissions().contains("doc_edit"));
}

#[tokio::test]
async fn save_persists_commits_and_audits() {
    let mut fixture = fixture();
    let administrator_id = fixture.administrator_id;

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_approve".to_owned()))
        .await;
    assert!(toggled.is_ok());

    let saved = fixture.editor.dispatch(RoleEditorIntent::SaveChanges).await;
    assert!(matches!(saved, Ok(DispatchOutcome::PermissionsSaved(_))));
    assert!(!fixture.editor.state().is_dirty());

    let persisted = fixture.permissions_repository.saved.lock().await.clone();
    assert_eq!(
        persisted,
        vec![(
            administrator_id,
            vec![
                "doc_approve".to_owned(),
                "doc_view".to_owned(),
                "usr_assign".to_owned()
            ]
        )]
    );

    let administrator = fixture
        .editor
        .state()
        .store()
        .get(administrator_id)
        .unwrap_or_else(|| unreachable!());
    assert!(administrator.permissions().contains("doc_approve"));

    let events = fixture.audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::RolePermissionsSaved);
    assert_eq!(events[0].subject, "qa.admin");
    let detail = events[0].detail.clone().unwrap_or_default();
    assert!(detail.contains("granted [doc_approve]"));
    assert!(detail.contains("audited [doc_approve, usr_assign]"));
}

#[tokio::test]
async fn save_without_changes_is_unchanged() {
    let mut fixture = fixture();

    let saved = fixture.editor.dispatch(RoleEditorIntent::SaveChanges).await;

    assert_eq!(saved.ok(), Some(DispatchOutcome::Unchanged));
    assert!(fixture.permissions_repository.saved.lock().await.is_empty());
}

#[tokio::test]
async fn failed_save_keeps_working_set_dirty() {
    let mut fixture = fixture_with(
        FakeRolePermissionsRepository {
            fail: true,
            ..FakeRolePermissionsRepository::default()
        },
        FakeAuditRepository::default(),
    );
    let administrator_id = fixture.administrator_id;

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_approve".to_owned()))
        .await;
    assert!(toggled.is_ok());

    let saved = fixture.editor.dispatch(RoleEditorIntent::SaveChanges).await;

    assert!(matches!(saved, Err(AppError::Internal(_))));
    assert!(fixture.editor.state().is_dirty());
    let administrator = fixture
        .editor
        .state()
        .store()
        .get(administrator_id)
        .unwrap_or_else(|| unreachable!());
    assert!(!administrator.permissions().contains("doc_approve"));
    assert_eq!(
        fixture.editor.state().notices().last().map(|notice| notice.level),
        Some(NoticeLevel::Error)
    );
}

#[tokio::test]
async fn failed_audit_rolls_back_created_role() {
    let mut fixture = fixture_with_failing_audit();
    let administrator_id = fixture.administrator_id;

    let created = fixture
        .editor
        .dispatch(RoleEditorIntent::CreateRole(CreateRoleInput::named("Trainer")))
        .await;

    assert!(matches!(created, Err(AppError::Internal(_))));
    assert_eq!(fixture.editor.state().store().roles().len(), 2);
    assert_eq!(
        fixture.editor.state().store().selected_role_id(),
        Some(administrator_id)
    );
    assert_eq!(
        fixture.editor.state().notices().last().map(|notice| notice.level),
        Some(NoticeLevel::Error)
    );
}

#[tokio::test]
async fn failed_audit_rolls_back_saved_permissions() {
    let mut fixture = fixture_with_failing_audit();
    let administrator_id = fixture.administrator_id;

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
        .await;
    assert!(toggled.is_ok());

    let saved = fixture.editor.dispatch(RoleEditorIntent::SaveChanges).await;

    assert!(matches!(saved, Err(AppError::Internal(_))));
    assert!(fixture.editor.state().is_dirty());
    assert!(fixture.editor.state().working_permissions().contains("doc_edit"));
    let administrator = fixture
        .editor
        .state()
        .store()
        .get(administrator_id)
        .unwrap_or_else(|| unreachable!());
    assert!(!administrator.permissions().contains("doc_edit"));
}

#[tokio::test]
async fn failed_audit_keeps_deleted_role() {
    let mut fixture = fixture_with_failing_audit();
    let reviewer_id = fixture.reviewer_id;

    let deleted = fixture
        .editor
        .dispatch(RoleEditorIntent::DeleteRole(reviewer_id))
        .await;

    assert!(matches!(deleted, Err(AppError::Internal(_))));
    assert!(fixture.editor.state().store().get(reviewer_id).is_some());
    assert!(
        fixture
            .editor
            .state()
            .notices()
            .iter()
            .all(|notice| notice.level == NoticeLevel::Error)
    );
}

#[tokio::test]
async fn create_duplicate_name_sets_inline_error() {
    let mut fixture = fixture();
    let created = fixture
        .editor
        .dispatch(RoleEditorIntent::CreateRole(CreateRoleInput::named("qa manager")))
        .await;
    assert!(matches!(created, Ok(DispatchOutcome::RoleCreated(_))));

    let duplicate = fixture
        .editor
        .dispatch(RoleEditorIntent::CreateRole(CreateRoleInput::named("QA Manager")))
        .await;

    assert!(matches!(duplicate, Err(AppError::Validation(_))));
    assert_eq!(
        fixture.editor.state().validation_error(),
        Some("name already exists")
    );
    assert_eq!(fixture.editor.state().store().roles().len(), 3);

    let renamed = fixture
        .editor
        .dispatch(RoleEditorIntent::CreateRole(CreateRoleInput::named("QA Lead")))
        .await;
    assert!(renamed.is_ok());
    assert_eq!(fixture.editor.state().validation_error(), None);
}

#[tokio::test]
async fn create_clones_base_role_and_selects_it() {
    let mut fixture = fixture();
    let reviewer_id = fixture.reviewer_id;

    let created = fixture
        .editor
        .dispatch(RoleEditorIntent::CreateRole(CreateRoleInput {
            base_role_id: Some(reviewer_id),
            ..CreateRoleInput::named("Senior Reviewer")
        }))
        .await;

    let Ok(DispatchOutcome::RoleCreated(role)) = created else {
        panic!("expected role to be created");
    };
    let expected: PermissionSet = ["doc_view", "doc_review"].into_iter().collect();
    assert_eq!(role.permissions(), &expected);
    assert_eq!(
        fixture.editor.state().store().selected_role_id(),
        Some(role.id())
    );
    assert_eq!(fixture.editor.state().working_permissions(), &expected);

    let events = fixture.audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::RoleCreated);
}

#[tokio::test]
async fn create_keeps_selection_when_dirty() {
    let mut fixture = fixture();
    let administrator_id = fixture.administrator_id;

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
        .await;
    assert!(toggled.is_ok());

    let created = fixture
        .editor
        .dispatch(RoleEditorIntent::CreateRole(CreateRoleInput::named("Trainer")))
        .await;

    assert!(created.is_ok());
    assert_eq!(
        fixture.editor.state().store().selected_role_id(),
        Some(administrator_id)
    );
    assert!(fixture.editor.state().is_dirty());
}

#[tokio::test]
async fn update_with_own_name_passes() {
    let mut fixture = fixture();
    let reviewer_id = fixture.reviewer_id;

    let updated = fixture
        .editor
        .dispatch(RoleEditorIntent::UpdateRole {
            role_id: reviewer_id,
            input: UpdateRoleInput {
                name: Some("Reviewer".to_owned()),
                color: Some(RoleColor::Teal),
                ..UpdateRoleInput::default()
            },
        })
        .await;

    let Ok(DispatchOutcome::RoleUpdated(role)) = updated else {
        panic!("expected role to be updated");
    };
    assert_eq!(role.color(), RoleColor::Teal);
}

#[tokio::test]
async fn delete_system_role_is_rejected_with_notice() {
    let mut fixture = fixture();
    let administrator_id = fixture.administrator_id;

    let deleted = fixture
        .editor
        .dispatch(RoleEditorIntent::DeleteRole(administrator_id))
        .await;

    assert!(matches!(deleted, Err(AppError::Protected(_))));
    assert_eq!(fixture.editor.state().store().roles().len(), 2);
    assert_eq!(fixture.editor.state().validation_error(), None);

    let notices = fixture.editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(fixture.editor.state().notices().is_empty());
    assert!(fixture.audit_repository.events.lock().await.is_empty());
}

#[tokio::test]
async fn delete_selected_role_loads_fallback_selection() {
    let mut fixture = fixture();
    let administrator_id = fixture.administrator_id;
    let reviewer_id = fixture.reviewer_id;
    select(&mut fixture, reviewer_id).await;

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
        .await;
    assert!(toggled.is_ok());

    let deleted = fixture
        .editor
        .dispatch(RoleEditorIntent::DeleteRole(reviewer_id))
        .await;

    assert!(matches!(deleted, Ok(DispatchOutcome::RoleDeleted(_))));
    assert_eq!(
        fixture.editor.state().store().selected_role_id(),
        Some(administrator_id)
    );
    assert!(!fixture.editor.state().is_dirty());
    let expected: PermissionSet = ["doc_view", "usr_assign"].into_iter().collect();
    assert_eq!(fixture.editor.state().working_permissions(), &expected);
}

#[tokio::test]
async fn stale_role_id_surfaces_not_found_notice() {
    let mut fixture = fixture();

    let selected = fixture
        .editor
        .dispatch(RoleEditorIntent::SelectRole {
            role_id: RoleId::new(),
            discard_unsaved: true,
        })
        .await;

    assert!(matches!(selected, Err(AppError::NotFound(_))));
    assert_eq!(fixture.editor.state().notices().len(), 1);
}

#[tokio::test]
async fn unknown_group_is_not_found() {
    let mut fixture = fixture();

    let result = fixture
        .editor
        .dispatch(RoleEditorIntent::SetGroupSelection {
            group_id: "payroll".to_owned(),
            checked: true,
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(!fixture.editor.state().is_dirty());
}

#[tokio::test]
async fn filters_narrow_visible_groups() {
    let mut fixture = fixture();

    let searched = fixture
        .editor
        .dispatch(RoleEditorIntent::SetSearch("close".to_owned()))
        .await;
    assert!(searched.is_ok());
    let filtered = fixture
        .editor
        .dispatch(RoleEditorIntent::SetActionFilter(BTreeSet::from([
            PermissionAction::Close,
        ])))
        .await;
    assert!(filtered.is_ok());

    let view = fixture.editor.view();
    assert_eq!(view.search_text, "close");
    let groups: Vec<(String, Vec<String>)> = view
        .selected
        .map(|selected| selected.groups)
        .unwrap_or_default()
        .into_iter()
        .map(|group| {
            (
                group.group_id,
                group
                    .permissions
                    .into_iter()
                    .map(|permission| permission.permission_id)
                    .collect(),
            )
        })
        .collect();

    assert_eq!(
        groups,
        vec![
            ("training".to_owned(), vec!["trn_close".to_owned()]),
            ("capa".to_owned(), vec!["capa_close".to_owned()]),
            ("audits".to_owned(), vec!["aud_close".to_owned()]),
        ]
    );
}

#[tokio::test]
async fn combined_filter_update_notifies_once() {
    let mut fixture = fixture();
    let calls = Arc::new(AtomicUsize::new(0));
    let listener_calls = calls.clone();
    fixture.editor.subscribe(move |_| {
        listener_calls.fetch_add(1, Ordering::SeqCst);
    });

    let filtered = fixture
        .editor
        .dispatch(RoleEditorIntent::SetFilter {
            search_text: Some("close".to_owned()),
            actions: Some(BTreeSet::from([PermissionAction::Close])),
        })
        .await;
    assert_eq!(filtered.ok(), Some(DispatchOutcome::Applied));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let view = fixture.editor.view();
    assert_eq!(view.search_text, "close");
    assert_eq!(view.action_filter, BTreeSet::from([PermissionAction::Close]));

    let kept = fixture
        .editor
        .dispatch(RoleEditorIntent::SetFilter {
            search_text: Some(" CLOSE ".to_owned()),
            actions: None,
        })
        .await;
    assert_eq!(kept.ok(), Some(DispatchOutcome::Unchanged));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn view_reports_group_state_and_totals() {
    let fixture = fixture();
    let view = fixture.editor.view();

    assert_eq!(view.roles.len(), 2);
    assert!(view.roles[0].is_selected);

    let selected = view.selected.unwrap_or_else(|| unreachable!());
    assert_eq!(
        selected.total,
        SelectionCount {
            selected: 2,
            total: 41
        }
    );
    let documents = selected
        .groups
        .iter()
        .find(|group| group.group_id == "documents")
        .unwrap_or_else(|| unreachable!());
    assert_eq!(documents.state, SelectionState::Partial);
    assert_eq!(selected.groups.len(), 8);
}

#[tokio::test]
async fn subscribers_are_notified_until_unsubscribed() {
    let mut fixture = fixture();
    let calls = Arc::new(AtomicUsize::new(0));
    let listener_calls = calls.clone();
    let subscription = fixture.editor.subscribe(move |_| {
        listener_calls.fetch_add(1, Ordering::SeqCst);
    });

    let toggled = fixture
        .editor
        .dispatch(RoleEditorIntent::TogglePermission("doc_edit".to_owned()))
        .await;
    assert!(toggled.is_ok());
    let unchanged = fixture
        .editor
        .dispatch(RoleEditorIntent::SetSearch(String::new()))
        .await;
    assert_eq!(unchanged.ok(), Some(DispatchOutcome::Unchanged));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(fixture.editor.unsubscribe(subscription));
    let discarded = fixture
        .editor
        .dispatch(RoleEditorIntent::DiscardChanges)
        .await;
    assert!(discarded.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!fixture.editor.unsubscribe(subscription));
}

#[test]
fn action_filter_parses_transport_values() {
    let parsed = parse_action_filter(["view", "close"]);
    assert_eq!(
        parsed.ok(),
        Some(BTreeSet::from([
            PermissionAction::View,
            PermissionAction::Close
        ]))
    );
    assert!(parse_action_filter(["publish"]).is_err());
}
