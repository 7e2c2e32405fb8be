//! Effective-permission resolution for a user's role list.
//!
//! Permissions merge by OR across all roles a user holds. The `superadmin`
//! role is a separate tier that is not encoded in the permission flags.

use serde::Serialize;

use crate::types::{EffectivePermissions, Permissions, Role, User, SUPERADMIN_ROLE};

/// Find a role in the catalog by id.
pub fn find_role<'a>(catalog: &'a [Role], role_id: &str) -> Option<&'a Role> {
    catalog.iter().find(|r| r.id == role_id)
}

/// OR together the permissions of every role in `user.roles`.
///
/// Role ids missing from the catalog contribute nothing.
pub fn resolve_permissions(user: &User, catalog: &[Role]) -> EffectivePermissions {
    resolve_role_ids(&user.roles, catalog)
}

/// Same as [`resolve_permissions`] for a bare list of role ids.
pub fn resolve_role_ids<S: AsRef<str>>(role_ids: &[S], catalog: &[Role]) -> EffectivePermissions {
    let mut merged = Permissions::NONE;
    for role_id in role_ids {
        if let Some(role) = find_role(catalog, role_id.as_ref()) {
            merged.merge(&role.permissions);
        }
    }
    merged
}

pub fn is_super_admin(user: &User) -> bool {
    user.has_role(SUPERADMIN_ROLE)
}

/// The role's display name, or the id itself when the role is unknown or unnamed.
pub fn display_name<'a>(role_id: &'a str, catalog: &'a [Role]) -> &'a str {
    find_role(catalog, role_id)
        .filter(|r| !r.name.is_empty())
        .map_or(role_id, |r| r.name.as_str())
}

/// Property operations gated by role permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAction {
    Add,
    Update,
    Delete,
}

impl std::fmt::Display for PropertyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyAction::Add => write!(f, "add property"),
            PropertyAction::Update => write!(f, "update property"),
            PropertyAction::Delete => write!(f, "delete property"),
        }
    }
}

/// Authorization tier of a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "camelCase")]
pub enum AccessTier {
    /// Manages users and roles; bypasses property permission checks.
    SuperAdmin,
    Member { permissions: EffectivePermissions },
}

impl AccessTier {
    pub fn allows(&self, action: PropertyAction) -> bool {
        match self {
            AccessTier::SuperAdmin => true,
            AccessTier::Member { permissions } => match action {
                PropertyAction::Add => permissions.add_property,
                PropertyAction::Update => permissions.update_property,
                PropertyAction::Delete => permissions.delete_property,
            },
        }
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, AccessTier::SuperAdmin)
    }
}

pub fn access_tier(user: &User, catalog: &[Role]) -> AccessTier {
    if is_super_admin(user) {
        AccessTier::SuperAdmin
    } else {
        AccessTier::Member {
            permissions: resolve_permissions(user, catalog),
        }
    }
}
