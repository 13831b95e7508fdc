use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Order-independent set of permission identifiers held by a role.
///
/// Identifiers are not checked against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the id is held.
    #[must_use]
    pub fn contains(&self, permission_id: &str) -> bool {
        self.0.contains(permission_id)
    }

    /// Adds an id, returning whether it was newly inserted.
    pub fn insert(&mut self, permission_id: impl Into<String>) -> bool {
        self.0.insert(permission_id.into())
    }

    /// Removes an id, returning whether it was present.
    pub fn remove(&mut self, permission_id: &str) -> bool {
        self.0.remove(permission_id)
    }

    /// Returns the number of held ids, catalog-known or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no id is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Returns ids held here but not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<String> {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for PermissionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(value: PermissionSet) -> Self {
        value.0.into_iter().collect()
    }
}
