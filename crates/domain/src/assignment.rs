//! Permission assignment engine.
//!
//! Pure functions over a role's permission set and the immutable catalog.
//! Nothing here mutates its inputs; mutations return a new set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::PermissionCatalog;
use crate::permission::{Permission, PermissionAction, PermissionGroup};
use crate::permission_set::PermissionSet;

/// Selected versus total permission counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCount {
    /// Number of selected permissions.
    pub selected: usize,
    /// Number of selectable permissions.
    pub total: usize,
}

impl SelectionCount {
    /// Returns whether every permission is selected in a non-empty scope.
    #[must_use]
    pub fn is_fully_enabled(&self) -> bool {
        self.total > 0 && self.selected == self.total
    }

    /// Returns the tri-state checkbox value for the scope.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        if self.is_fully_enabled() {
            SelectionState::All
        } else if self.selected == 0 {
            SelectionState::None
        } else {
            SelectionState::Partial
        }
    }
}

/// Tri-state of a group "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing selected.
    None,
    /// Some, not all, selected.
    Partial,
    /// Everything selected.
    All,
}

/// Adds the permission when absent, removes it when present.
///
/// Ids unknown to the catalog are stored like any other id.
#[must_use]
pub fn toggle(permissions: &PermissionSet, permission_id: &str) -> PermissionSet {
    let mut next = permissions.clone();
    if !next.remove(permission_id) {
        next.insert(permission_id);
    }
    next
}

/// Grants (`checked`) or revokes every permission of a group.
#[must_use]
pub fn set_group_selection(
    permissions: &PermissionSet,
    group: &PermissionGroup,
    checked: bool,
) -> PermissionSet {
    let mut next = permissions.clone();
    if checked {
        next.extend(group.permission_ids());
    } else {
        for permission_id in group.permission_ids() {
            next.remove(permission_id);
        }
    }
    next
}

/// Counts the group's permissions held by the set.
#[must_use]
pub fn group_selection_count(
    permissions: &PermissionSet,
    group: &PermissionGroup,
) -> SelectionCount {
    SelectionCount {
        selected: group
            .permission_ids()
            .filter(|permission_id| permissions.contains(permission_id))
            .count(),
        total: group.permissions().len(),
    }
}

/// Counts held permissions against the whole catalog.
///
/// `selected` is the raw size of the set, so ids missing from the catalog
/// inflate it.
#[must_use]
pub fn total_selection_count(
    permissions: &PermissionSet,
    catalog: &PermissionCatalog,
) -> SelectionCount {
    SelectionCount {
        selected: permissions.len(),
        total: catalog.permission_count(),
    }
}

/// Returns whether two sets differ in membership.
#[must_use]
pub fn is_dirty(current: &PermissionSet, original: &PermissionSet) -> bool {
    current != original
}

/// Returns held permissions that require an audit trail, in catalog order.
#[must_use]
pub fn audited_permissions<'a>(
    permissions: &PermissionSet,
    catalog: &'a PermissionCatalog,
) -> Vec<&'a Permission> {
    catalog
        .groups()
        .iter()
        .flat_map(PermissionGroup::permissions)
        .filter(|permission| {
            permission.requires_audit_trail() && permissions.contains(permission.id())
        })
        .collect()
}

/// Search text and action filter applied to a permission list.
///
/// Equality compares the trimmed, lowercased search and the actions, so two
/// filters that select the same permissions are equal.
#[derive(Debug, Clone, Default)]
pub struct PermissionFilter {
    search_text: String,
    normalized_search: String,
    actions: BTreeSet<PermissionAction>,
}

impl PermissionFilter {
    /// Creates a filter. Empty search and empty actions match everything.
    #[must_use]
    pub fn new(search_text: impl Into<String>, actions: BTreeSet<PermissionAction>) -> Self {
        let search_text = search_text.into();
        let normalized_search = search_text.trim().to_lowercase();
        Self {
            search_text,
            normalized_search,
            actions,
        }
    }

    /// Returns the search text as entered.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.search_text.as_str()
    }

    /// Returns the action filter.
    #[must_use]
    pub fn actions(&self) -> &BTreeSet<PermissionAction> {
        &self.actions
    }

    /// Returns whether nothing is filtered out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized_search.is_empty() && self.actions.is_empty()
    }

    /// Returns whether the permission passes both criteria.
    #[must_use]
    pub fn matches(&self, permission: &Permission) -> bool {
        let matches_search = self.normalized_search.is_empty()
            || permission
                .label()
                .to_lowercase()
                .contains(self.normalized_search.as_str())
            || permission
                .description()
                .to_lowercase()
                .contains(self.normalized_search.as_str());

        let matches_action = self.actions.is_empty() || self.actions.contains(&permission.action());

        matches_search && matches_action
    }
}

impl PartialEq for PermissionFilter {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_search == other.normalized_search && self.actions == other.actions
    }
}

impl Eq for PermissionFilter {}

/// Lazy, restartable view over the visible permissions of a group.
///
/// Cloning restarts from the current position; a fresh call to
/// [`filter_visible_permissions`] restarts from the beginning.
#[derive(Debug, Clone)]
pub struct VisiblePermissions<'a> {
    permissions: std::slice::Iter<'a, Permission>,
    filter: &'a PermissionFilter,
}

impl<'a> Iterator for VisiblePermissions<'a> {
    type Item = &'a Permission;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.permissions
            .by_ref()
            .find(|permission| filter.matches(permission))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.permissions.size_hint().1)
    }
}

/// Returns the group's permissions that pass the filter, in catalog order.
#[must_use]
pub fn filter_visible_permissions<'a>(
    group: &'a PermissionGroup,
    filter: &'a PermissionFilter,
) -> VisiblePermissions<'a> {
    VisiblePermissions {
        permissions: group.permissions().iter(),
        filter,
    }
}
