//! Canonical in-memory role collection.

use std::collections::HashSet;

use chrono::Utc;
use qms_core::{AppError, AppResult};
use qms_domain::{
    PermissionSet, Role, RoleColor, RoleId, RoleKind, validate_role_name,
};

/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name, validated after trimming.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Badge color.
    pub color: RoleColor,
    /// Initial active flag.
    pub is_active: bool,
    /// Role whose permissions seed the new role.
    pub base_role_id: Option<RoleId>,
}

impl CreateRoleInput {
    /// Creates an active, blue, empty-permission role input.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: RoleColor::default(),
            is_active: true,
            base_role_id: None,
        }
    }
}

/// Patch applied by the role edit form. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New badge color.
    pub color: Option<RoleColor>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Owns the role list and the selected role id.
#[derive(Debug, Clone, Default)]
pub struct RoleStore {
    roles: Vec<Role>,
    selected_role_id: Option<RoleId>,
}

impl RoleStore {
    /// Creates a store from seed roles and selects the first one.
    pub fn new(roles: Vec<Role>) -> AppResult<Self> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for role in &roles {
            if !ids.insert(role.id()) {
                return Err(AppError::Conflict(format!(
                    "role id '{}' is used twice",
                    role.id()
                )));
            }

            if !names.insert(role.name().to_lowercase()) {
                return Err(AppError::Conflict(format!(
                    "role name '{}' is used twice",
                    role.name()
                )));
            }
        }

        let selected_role_id = roles.first().map(Role::id);

        Ok(Self {
            roles,
            selected_role_id,
        })
    }

    /// Returns roles in insertion order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Finds a role by id.
    #[must_use]
    pub fn get(&self, role_id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| role.id() == role_id)
    }

    /// Finds a role by id or fails with `NotFound`.
    pub fn require(&self, role_id: RoleId) -> AppResult<&Role> {
        self.get(role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    /// Returns the selected role id.
    #[must_use]
    pub fn selected_role_id(&self) -> Option<RoleId> {
        self.selected_role_id
    }

    /// Returns the selected role.
    #[must_use]
    pub fn selected_role(&self) -> Option<&Role> {
        self.selected_role_id.and_then(|role_id| self.get(role_id))
    }

    /// Creates a custom role.
    ///
    /// Permissions are copied from `base_role_id` when it resolves; an
    /// unknown base role yields an empty set.
    pub fn create(&mut self, input: CreateRoleInput) -> AppResult<Role> {
        let name = validate_role_name(
            input.name.as_str(),
            self.roles.iter().map(Role::name),
        )?;

        let permissions = input
            .base_role_id
            .and_then(|base_role_id| self.get(base_role_id))
            .map(|base_role| base_role.permissions().clone())
            .unwrap_or_else(PermissionSet::new);

        let role = Role::new(
            RoleId::new(),
            name,
            input.description.trim(),
            RoleKind::Custom,
            input.color,
            permissions,
            Utc::now(),
        )
        .with_active(input.is_active);

        self.roles.push(role.clone());
        Ok(role)
    }

    /// Applies an edit-form patch.
    pub fn update(&mut self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let position = self.position(role_id)?;

        let name = input
            .name
            .as_deref()
            .map(|candidate| {
                validate_role_name(
                    candidate,
                    self.roles
                        .iter()
                        .filter(|role| role.id() != role_id)
                        .map(Role::name),
                )
            })
            .transpose()?;

        let now = Utc::now();
        let role = &mut self.roles[position];

        if let Some(name) = name {
            role.rename(name, now);
        }
        if let Some(description) = input.description {
            role.set_description(description.trim(), now);
        }
        if let Some(color) = input.color {
            role.set_color(color, now);
        }
        if let Some(is_active) = input.is_active {
            role.set_active(is_active, now);
        }

        Ok(role.clone())
    }

    /// Replaces the committed permission set of a role.
    pub fn replace_permissions(
        &mut self,
        role_id: RoleId,
        permissions: PermissionSet,
    ) -> AppResult<Role> {
        let position = self.position(role_id)?;
        let role = &mut self.roles[position];
        role.set_permissions(permissions, Utc::now());
        Ok(role.clone())
    }

    /// Deletes a custom role.
    ///
    /// When the deleted role was selected, selection moves to the first
    /// remaining role.
    pub fn delete(&mut self, role_id: RoleId) -> AppResult<Role> {
        let position = self.position(role_id)?;

        let role = &self.roles[position];
        if !role.kind().is_deletable() {
            return Err(AppError::Protected(format!(
                "role '{}' is a system role and cannot be deleted",
                role.name()
            )));
        }

        let removed = self.roles.remove(position);
        if self.selected_role_id == Some(role_id) {
            self.selected_role_id = self.roles.first().map(Role::id);
        }

        Ok(removed)
    }

    /// Marks a role as selected.
    pub fn select(&mut self, role_id: RoleId) -> AppResult<()> {
        self.require(role_id)?;
        self.selected_role_id = Some(role_id);
        Ok(())
    }

    fn position(&self, role_id: RoleId) -> AppResult<usize> {
        self.roles
            .iter()
            .position(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}
