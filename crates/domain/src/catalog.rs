//! Permission catalog reference data.
//!
//! The catalog is built once at process start and shared read-only. Every
//! permission belongs to exactly one group; construction rejects duplicated
//! group or permission identifiers.

use std::collections::HashSet;

use qms_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::permission::{Permission, PermissionAction, PermissionGroup};

/// Fixed, ordered list of permission groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    groups: Vec<PermissionGroup>,
}

impl PermissionCatalog {
    /// Creates a catalog from groups, ordering them by `sort_order`.
    pub fn new(mut groups: Vec<PermissionGroup>) -> AppResult<Self> {
        let mut group_ids = HashSet::new();
        let mut permission_ids = HashSet::new();

        for group in &groups {
            if !group_ids.insert(group.id()) {
                return Err(AppError::Validation(format!(
                    "permission group '{}' is defined twice",
                    group.id()
                )));
            }

            for permission_id in group.permission_ids() {
                if !permission_ids.insert(permission_id) {
                    return Err(AppError::Validation(format!(
                        "permission '{permission_id}' belongs to more than one group"
                    )));
                }
            }
        }

        groups.sort_by_key(PermissionGroup::sort_order);

        Ok(Self { groups })
    }

    /// Returns groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[PermissionGroup] {
        &self.groups
    }

    /// Finds a group by identifier.
    #[must_use]
    pub fn group(&self, group_id: &str) -> Option<&PermissionGroup> {
        self.groups.iter().find(|group| group.id() == group_id)
    }

    /// Finds a permission by identifier.
    #[must_use]
    pub fn permission(&self, permission_id: &str) -> Option<&Permission> {
        self.groups
            .iter()
            .flat_map(PermissionGroup::permissions)
            .find(|permission| permission.id() == permission_id)
    }

    /// Returns the group owning a permission.
    #[must_use]
    pub fn group_of(&self, permission_id: &str) -> Option<&PermissionGroup> {
        self.groups
            .iter()
            .find(|group| group.contains(permission_id))
    }

    /// Returns the number of permissions across all groups.
    #[must_use]
    pub fn permission_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.permissions().len())
            .sum()
    }

    /// Returns the built-in QMS catalog.
    #[rustfmt::skip]
    pub fn standard() -> AppResult<Self> {
        use PermissionAction::{
            Approve, Archive, Assign, Close, Create, Delete, Edit, Export, Review, View,
        };

        Self::new(vec![
            PermissionGroup::new(
                "documents",
                "Documents",
                "Controlled document lifecycle",
                vec![
                    Permission::new("doc_view", "documents", View, "View documents", "Open and read released and draft documents", false)?,
                    Permission::new("doc_create", "documents", Create, "Create documents", "Start new controlled documents", true)?,
                    Permission::new("doc_edit", "documents", Edit, "Edit documents", "Revise draft documents", true)?,
                    Permission::new("doc_delete", "documents", Delete, "Delete documents", "Remove draft documents that were never released", true)?,
                    Permission::new("doc_review", "documents", Review, "Review documents", "Comment on documents in review", true)?,
                    Permission::new("doc_approve", "documents", Approve, "Approve documents", "Sign off documents for release", true)?,
                    Permission::new("doc_archive", "documents", Archive, "Archive documents", "Move superseded documents to the archive", true)?,
                    Permission::new("doc_export", "documents", Export, "Export documents", "Download documents as PDF", false)?,
                ],
                10,
            )?,
            PermissionGroup::new(
                "templates",
                "Templates",
                "Document templates",
                vec![
                    Permission::new("tpl_view", "templates", View, "View templates", "Browse the template library", false)?,
                    Permission::new("tpl_create", "templates", Create, "Create templates", "Add new templates", true)?,
                    Permission::new("tpl_edit", "templates", Edit, "Edit templates", "Change template content and fields", true)?,
                    Permission::new("tpl_delete", "templates", Delete, "Delete templates", "Remove unused templates", true)?,
                    Permission::new("tpl_approve", "templates", Approve, "Approve templates", "Release templates for use", true)?,
                ],
                20,
            )?,
            PermissionGroup::new(
                "archive",
                "Archive",
                "Retention and archived records",
                vec![
                    Permission::new("arc_view", "archive", View, "View archive", "Browse archived records and retention status", false)?,
                    Permission::new("arc_edit", "archive", Edit, "Edit retention", "Change retention periods of archived records", true)?,
                    Permission::new("arc_export", "archive", Export, "Export archive", "Export archived records", true)?,
                    Permission::new("arc_delete", "archive", Delete, "Destroy records", "Destroy records whose retention has expired", true)?,
                ],
                30,
            )?,
            PermissionGroup::new(
                "training",
                "Training",
                "Training records and assignments",
                vec![
                    Permission::new("trn_view", "training", View, "View training", "See training plans and records", false)?,
                    Permission::new("trn_create", "training", Create, "Create training", "Plan new training sessions", false)?,
                    Permission::new("trn_assign", "training", Assign, "Assign training", "Assign training to employees", true)?,
                    Permission::new("trn_close", "training", Close, "Close training", "Mark training as completed", true)?,
                ],
                40,
            )?,
            PermissionGroup::new(
                "capa",
                "CAPA",
                "Corrective and preventive actions",
                vec![
                    Permission::new("capa_view", "capa", View, "View CAPA", "Read corrective and preventive actions", false)?,
                    Permission::new("capa_create", "capa", Create, "Create CAPA", "Raise a new CAPA", true)?,
                    Permission::new("capa_edit", "capa", Edit, "Edit CAPA", "Update root cause and action plan", true)?,
                    Permission::new("capa_assign", "capa", Assign, "Assign CAPA", "Assign owners to CAPA actions", true)?,
                    Permission::new("capa_approve", "capa", Approve, "Approve CAPA", "Approve action plans and effectiveness checks", true)?,
                    Permission::new("capa_close", "capa", Close, "Close CAPA", "Close verified CAPA records", true)?,
                ],
                50,
            )?,
            PermissionGroup::new(
                "audits",
                "Audits",
                "Internal and supplier audits",
                vec![
                    Permission::new("aud_view", "audits", View, "View audits", "Read audit plans and reports", false)?,
                    Permission::new("aud_create", "audits", Create, "Plan audits", "Schedule new audits", true)?,
                    Permission::new("aud_edit", "audits", Edit, "Edit audits", "Record findings", true)?,
                    Permission::new("aud_review", "audits", Review, "Review audits", "Review audit reports before release", true)?,
                    Permission::new("aud_close", "audits", Close, "Close audits", "Close audits once findings are resolved", true)?,
                    Permission::new("aud_export", "audits", Export, "Export audits", "Export audit reports", false)?,
                ],
                60,
            )?,
            PermissionGroup::new(
                "users",
                "Users & roles",
                "User accounts and role administration",
                vec![
                    Permission::new("usr_view", "users", View, "View users", "List user accounts", false)?,
                    Permission::new("usr_create", "users", Create, "Create users", "Invite new users", true)?,
                    Permission::new("usr_edit", "users", Edit, "Edit users", "Change user details and deactivate accounts", true)?,
                    Permission::new("usr_delete", "users", Delete, "Delete users", "Remove user accounts", true)?,
                    Permission::new("usr_assign", "users", Assign, "Assign roles", "Manage roles and their permissions", true)?,
                ],
                70,
            )?,
            PermissionGroup::new(
                "system",
                "System",
                "System configuration and information",
                vec![
                    Permission::new("sys_view", "system", View, "View system info", "See version and configuration panels", false)?,
                    Permission::new("sys_edit", "system", Edit, "Edit configuration", "Change system configuration", true)?,
                    Permission::new("sys_export", "system", Export, "Export audit trail", "Export the system audit trail", true)?,
                ],
                80,
            )?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::PermissionCatalog;
    use crate::permission::{Permission, PermissionAction, PermissionGroup};

    fn standard() -> PermissionCatalog {
        PermissionCatalog::standard().unwrap_or_else(|_| unreachable!())
    }

    fn group(id: &str, sort_order: i32, permission_ids: &[&str]) -> PermissionGroup {
        let permissions = permission_ids
            .iter()
            .map(|permission_id| {
                Permission::new(
                    *permission_id,
                    id,
                    PermissionAction::View,
                    *permission_id,
                    "",
                    false,
                )
                .unwrap_or_else(|_| unreachable!())
            })
            .collect();
        PermissionGroup::new(id, id, "", permissions, sort_order).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn standard_catalog_documents_group_has_eight_permissions() {
        let catalog = standard();
        let documents = catalog.group("documents");

        assert!(documents.is_some());
        let documents = documents.unwrap_or_else(|| unreachable!());
        assert_eq!(documents.permissions().len(), 8);
        assert!(documents.contains("doc_view"));
        assert!(documents.contains("doc_review"));
    }

    #[test]
    fn permission_count_sums_all_groups() {
        let catalog = standard();
        let expected: usize = catalog
            .groups()
            .iter()
            .map(|group| group.permissions().len())
            .sum();

        assert_eq!(catalog.permission_count(), expected);
        assert_eq!(catalog.permission_count(), 41);
    }

    #[test]
    fn groups_are_ordered_by_sort_order() {
        let catalog = PermissionCatalog::new(vec![
            group("late", 20, &["b"]),
            group("early", 10, &["a"]),
        ])
        .unwrap_or_else(|_| unreachable!());

        let ids: Vec<&str> = catalog.groups().iter().map(|group| group.id()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn permission_in_two_groups_is_rejected() {
        let catalog =
            PermissionCatalog::new(vec![group("left", 1, &["shared"]), group("right", 2, &["shared"])]);
        assert!(catalog.is_err());
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let catalog = PermissionCatalog::new(vec![group("same", 1, &["a"]), group("same", 2, &["b"])]);
        assert!(catalog.is_err());
    }

    #[test]
    fn lookups_resolve_owning_group() {
        let catalog = standard();

        assert_eq!(
            catalog.group_of("capa_close").map(|group| group.id()),
            Some("capa")
        );
        assert_eq!(
            catalog.permission("aud_review").map(|permission| permission.action()),
            Some(PermissionAction::Review)
        );
        assert!(catalog.permission("missing").is_none());
    }
}
