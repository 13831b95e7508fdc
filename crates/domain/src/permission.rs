use std::str::FromStr;

use qms_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Action verbs a permission can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Read access.
    View,
    /// Creating new records.
    Create,
    /// Changing existing records.
    Edit,
    /// Removing records.
    Delete,
    /// Signing off a record.
    Approve,
    /// Moving a record into the archive.
    Archive,
    /// Exporting records out of the system.
    Export,
    /// Assigning records or roles to users.
    Assign,
    /// Closing an open record.
    Close,
    /// Reviewing a record before approval.
    Review,
}

impl PermissionAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Archive => "archive",
            Self::Export => "export",
            Self::Assign => "assign",
            Self::Close => "close",
            Self::Review => "review",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::View,
            PermissionAction::Create,
            PermissionAction::Edit,
            PermissionAction::Delete,
            PermissionAction::Approve,
            PermissionAction::Archive,
            PermissionAction::Export,
            PermissionAction::Assign,
            PermissionAction::Close,
            PermissionAction::Review,
        ];

        ALL
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission action '{value}'")))
    }
}

/// Atomic capability scoped to a module and an action verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: NonEmptyString,
    module: NonEmptyString,
    action: PermissionAction,
    label: NonEmptyString,
    description: String,
    requires_audit_trail: bool,
}

impl Permission {
    /// Creates a permission with validated identifiers.
    pub fn new(
        id: impl Into<String>,
        module: impl Into<String>,
        action: PermissionAction,
        label: impl Into<String>,
        description: impl Into<String>,
        requires_audit_trail: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            module: NonEmptyString::new(module)?,
            action,
            label: NonEmptyString::new(label)?,
            description: description.into(),
            requires_audit_trail,
        })
    }

    /// Returns the stable permission identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the owning module name.
    #[must_use]
    pub fn module(&self) -> &str {
        self.module.as_str()
    }

    /// Returns the action verb.
    #[must_use]
    pub fn action(&self) -> PermissionAction {
        self.action
    }

    /// Returns the human label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the long description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns whether granting this permission must leave an audit trail.
    #[must_use]
    pub fn requires_audit_trail(&self) -> bool {
        self.requires_audit_trail
    }
}

/// Named, ordered bucket of related permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    id: NonEmptyString,
    name: NonEmptyString,
    description: String,
    permissions: Vec<Permission>,
    sort_order: i32,
}

impl PermissionGroup {
    /// Creates a permission group.
    ///
    /// Permission ids must be unique inside the group.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: Vec<Permission>,
        sort_order: i32,
    ) -> AppResult<Self> {
        let id = NonEmptyString::new(id)?;

        for (index, permission) in permissions.iter().enumerate() {
            if permissions[..index]
                .iter()
                .any(|previous| previous.id() == permission.id())
            {
                return Err(AppError::Validation(format!(
                    "permission '{}' is listed twice in group '{}'",
                    permission.id(),
                    id
                )));
            }
        }

        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: description.into(),
            permissions,
            sort_order,
        })
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns permissions in catalog order.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Returns the sort order.
    #[must_use]
    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    /// Returns permission ids in catalog order.
    pub fn permission_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.permissions.iter().map(Permission::id)
    }

    /// Returns whether the group contains the permission id.
    #[must_use]
    pub fn contains(&self, permission_id: &str) -> bool {
        self.permission_ids().any(|id| id == permission_id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Permission, PermissionAction, PermissionGroup};

    #[test]
    fn action_roundtrip_storage_value() {
        for action in PermissionAction::all() {
            let restored = PermissionAction::from_str(action.as_str());
            assert!(matches!(restored, Ok(value) if value == *action));
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(PermissionAction::from_str("publish").is_err());
    }

    #[test]
    fn permission_requires_identifier() {
        let permission =
            Permission::new(" ", "documents", PermissionAction::View, "View", "", false);
        assert!(permission.is_err());
    }

    #[test]
    fn group_rejects_duplicate_permission_ids() {
        let view = Permission::new(
            "doc_view",
            "documents",
            PermissionAction::View,
            "View documents",
            "",
            false,
        )
        .unwrap_or_else(|_| unreachable!());

        let group = PermissionGroup::new(
            "documents",
            "Documents",
            "",
            vec![view.clone(), view],
            1,
        );

        assert!(group.is_err());
    }
}
