//! Role entity and role name rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use qms_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permission_set::PermissionSet;

/// Minimum role name length after trimming, in characters.
pub const ROLE_NAME_MIN_LENGTH: usize = 3;

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid role id '{value}': {error}")))
    }
}

/// Whether a role ships with the system or was created by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Built-in role. Permissions are editable, the role is not deletable.
    System,
    /// Administrator-defined role.
    Custom,
}

impl RoleKind {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Custom => "custom",
        }
    }

    /// Returns whether roles of this kind may be deleted.
    #[must_use]
    pub fn is_deletable(&self) -> bool {
        match self {
            Self::System => false,
            Self::Custom => true,
        }
    }
}

/// Display color tag of a role badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleColor {
    /// Blue badge.
    #[default]
    Blue,
    /// Green badge.
    Green,
    /// Amber badge.
    Amber,
    /// Red badge.
    Red,
    /// Purple badge.
    Purple,
    /// Teal badge.
    Teal,
    /// Gray badge.
    Gray,
}

impl RoleColor {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Teal => "teal",
            Self::Gray => "gray",
        }
    }
}

impl FromStr for RoleColor {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "amber" => Ok(Self::Amber),
            "red" => Ok(Self::Red),
            "purple" => Ok(Self::Purple),
            "teal" => Ok(Self::Teal),
            "gray" => Ok(Self::Gray),
            _ => Err(AppError::Validation(format!("unknown role color '{value}'"))),
        }
    }
}

/// Reasons a role name is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleNameViolation {
    /// Name is empty after trimming.
    Required,
    /// Name is shorter than [`ROLE_NAME_MIN_LENGTH`].
    TooShort,
    /// Another role already uses the name.
    AlreadyExists,
}

impl RoleNameViolation {
    /// Returns the inline message shown next to the name field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "name required",
            Self::TooShort => "name too short",
            Self::AlreadyExists => "name already exists",
        }
    }
}

impl std::fmt::Display for RoleNameViolation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<RoleNameViolation> for AppError {
    fn from(value: RoleNameViolation) -> Self {
        AppError::Validation(value.as_str().to_owned())
    }
}

/// Trimmed role name that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Validates a role name against the names of all other roles.
///
/// When editing, callers leave the edited role out of `other_names` so that
/// keeping the current name passes.
pub fn validate_role_name<'a>(
    candidate: &str,
    other_names: impl IntoIterator<Item = &'a str>,
) -> Result<RoleName, RoleNameViolation> {
    let trimmed = candidate.trim();

    if trimmed.is_empty() {
        return Err(RoleNameViolation::Required);
    }

    if trimmed.chars().count() < ROLE_NAME_MIN_LENGTH {
        return Err(RoleNameViolation::TooShort);
    }

    let normalized = trimmed.to_lowercase();
    if other_names
        .into_iter()
        .any(|name| name.trim().to_lowercase() == normalized)
    {
        return Err(RoleNameViolation::AlreadyExists);
    }

    Ok(RoleName(trimmed.to_owned()))
}

/// Named, reusable bundle of permission ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: RoleName,
    description: String,
    kind: RoleKind,
    is_active: bool,
    user_count: u32,
    permissions: PermissionSet,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    color: RoleColor,
}

impl Role {
    /// Creates an active role with no assigned users.
    #[must_use]
    pub fn new(
        id: RoleId,
        name: RoleName,
        description: impl Into<String>,
        kind: RoleKind,
        color: RoleColor,
        permissions: PermissionSet,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description: description.into(),
            kind,
            is_active: true,
            user_count: 0,
            permissions,
            created_at,
            modified_at: created_at,
            color,
        }
    }

    /// Sets the display-only assigned user count.
    #[must_use]
    pub fn with_user_count(mut self, user_count: u32) -> Self {
        self.user_count = user_count;
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the role kind.
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        self.kind
    }

    /// Returns whether the role is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the display-only assigned user count.
    #[must_use]
    pub fn user_count(&self) -> u32 {
        self.user_count
    }

    /// Returns the held permission ids.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns the color tag.
    #[must_use]
    pub fn color(&self) -> RoleColor {
        self.color
    }

    /// Renames the role.
    pub fn rename(&mut self, name: RoleName, now: DateTime<Utc>) {
        self.name = name;
        self.modified_at = now;
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>, now: DateTime<Utc>) {
        self.description = description.into();
        self.modified_at = now;
    }

    /// Changes the active flag.
    pub fn set_active(&mut self, is_active: bool, now: DateTime<Utc>) {
        self.is_active = is_active;
        self.modified_at = now;
    }

    /// Changes the color tag.
    pub fn set_color(&mut self, color: RoleColor, now: DateTime<Utc>) {
        self.color = color;
        self.modified_at = now;
    }

    /// Replaces the held permission ids.
    pub fn set_permissions(&mut self, permissions: PermissionSet, now: DateTime<Utc>) {
        self.permissions = permissions;
        self.modified_at = now;
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::{Role, RoleColor, RoleId, RoleKind, RoleNameViolation, validate_role_name};
    use crate::permission_set::PermissionSet;

    #[test]
    fn blank_and_short_names_are_rejected() {
        assert_eq!(
            validate_role_name("", std::iter::empty()),
            Err(RoleNameViolation::Required)
        );
        assert_eq!(
            validate_role_name("  ", std::iter::empty()),
            Err(RoleNameViolation::Required)
        );
        assert_eq!(
            validate_role_name("ab", std::iter::empty()),
            Err(RoleNameViolation::TooShort)
        );
    }

    #[test]
    fn short_check_counts_trimmed_characters() {
        assert_eq!(
            validate_role_name("  ab  ", std::iter::empty()),
            Err(RoleNameViolation::TooShort)
        );
        assert!(validate_role_name("Ärz", std::iter::empty()).is_ok());
    }

    #[test]
    fn unique_name_passes_and_is_trimmed() {
        let name = validate_role_name("  QA Manager ", ["Administrator", "Reviewer"]);
        assert_eq!(
            name.map(|value| value.as_str().to_owned()),
            Ok("QA Manager".to_owned())
        );
    }

    #[test]
    fn duplicate_name_is_rejected_case_insensitively() {
        assert_eq!(
            validate_role_name("QA Manager", ["qa manager"]),
            Err(RoleNameViolation::AlreadyExists)
        );
    }

    #[test]
    fn violation_converts_into_validation_error() {
        let error: qms_core::AppError = RoleNameViolation::TooShort.into();
        assert!(
            matches!(error, qms_core::AppError::Validation(message) if message == "name too short")
        );
    }

    #[test]
    fn system_roles_are_not_deletable() {
        assert!(!RoleKind::System.is_deletable());
        assert!(RoleKind::Custom.is_deletable());
    }

    #[test]
    fn mutations_bump_modified_at() {
        let created_at = Utc::now() - chrono::Duration::hours(1);
        let name = validate_role_name("Reviewer", std::iter::empty())
            .unwrap_or_else(|_| unreachable!());
        let mut role = Role::new(
            RoleId::new(),
            name,
            "",
            RoleKind::Custom,
            RoleColor::Green,
            PermissionSet::new(),
            created_at,
        );
        assert_eq!(role.modified_at(), created_at);

        let now = Utc::now();
        role.set_permissions(["doc_view"].into_iter().collect(), now);

        assert_eq!(role.modified_at(), now);
        assert_eq!(role.created_at(), created_at);
        assert!(role.permissions().contains("doc_view"));
    }

    #[test]
    fn role_id_parses_from_string() {
        let id = RoleId::new();
        let parsed = RoleId::from_str(id.to_string().as_str());
        assert!(matches!(parsed, Ok(value) if value == id));
        assert!(RoleId::from_str("not-a-uuid").is_err());
    }
}
