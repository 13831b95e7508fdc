use chrono::{Duration, Utc};
use qms_core::AppResult;
use qms_domain::{
    PermissionAction, PermissionCatalog, PermissionGroup, PermissionSet, Role, RoleColor, RoleId,
    RoleKind, validate_role_name,
};

struct SeedRole {
    name: &'static str,
    description: &'static str,
    kind: RoleKind,
    color: RoleColor,
    user_count: u32,
    age_days: i64,
}

/// Builds the demo role set used when `QMS_SEED_DEMO_ROLES` is enabled.
pub fn demo_roles(catalog: &PermissionCatalog) -> AppResult<Vec<Role>> {
    let everything: PermissionSet = catalog
        .groups()
        .iter()
        .flat_map(PermissionGroup::permission_ids)
        .collect();

    let view_only: PermissionSet = catalog
        .groups()
        .iter()
        .flat_map(PermissionGroup::permissions)
        .filter(|permission| permission.action() == PermissionAction::View)
        .map(|permission| permission.id())
        .collect();

    let document_control: PermissionSet = ["documents", "templates", "archive"]
        .into_iter()
        .filter_map(|group_id| catalog.group(group_id))
        .flat_map(PermissionGroup::permission_ids)
        .collect();

    let mut quality = everything.clone();
    for permission_id in ["sys_edit", "usr_delete"] {
        quality.remove(permission_id);
    }

    let mut auditing = view_only.clone();
    auditing.extend(
        catalog
            .group("audits")
            .into_iter()
            .flat_map(PermissionGroup::permission_ids),
    );
    auditing.insert("sys_export");

    let seeds = [
        (
            SeedRole {
                name: "Administrator",
                description: "Full access to every module and system configuration",
                kind: RoleKind::System,
                color: RoleColor::Red,
                user_count: 2,
                age_days: 400,
            },
            everything,
        ),
        (
            SeedRole {
                name: "Quality Manager",
                description: "Owns the quality system, approves documents and CAPA",
                kind: RoleKind::System,
                color: RoleColor::Purple,
                user_count: 3,
                age_days: 400,
            },
            quality,
        ),
        (
            SeedRole {
                name: "Document Controller",
                description: "Maintains controlled documents, templates and the archive",
                kind: RoleKind::System,
                color: RoleColor::Blue,
                user_count: 4,
                age_days: 400,
            },
            document_control,
        ),
        (
            SeedRole {
                name: "Reviewer",
                description: "Reviews documents before approval",
                kind: RoleKind::Custom,
                color: RoleColor::Green,
                user_count: 12,
                age_days: 120,
            },
            ["doc_view", "doc_review"].into_iter().collect(),
        ),
        (
            SeedRole {
                name: "Internal Auditor",
                description: "Plans and performs internal audits",
                kind: RoleKind::Custom,
                color: RoleColor::Amber,
                user_count: 5,
                age_days: 90,
            },
            auditing,
        ),
        (
            SeedRole {
                name: "Viewer",
                description: "Read-only access",
                kind: RoleKind::Custom,
                color: RoleColor::Gray,
                user_count: 48,
                age_days: 30,
            },
            view_only,
        ),
    ];

    let now = Utc::now();
    let mut roles: Vec<Role> = Vec::with_capacity(seeds.len());

    for (seed, permissions) in seeds {
        let name = validate_role_name(seed.name, roles.iter().map(Role::name))?;
        roles.push(
            Role::new(
                RoleId::new(),
                name,
                seed.description,
                seed.kind,
                seed.color,
                permissions,
                now - Duration::days(seed.age_days),
            )
            .with_user_count(seed.user_count),
        );
    }

    Ok(roles)
}
