use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de_null_default;

/// Reserved role id with implicit full access.
pub const SUPERADMIN_ROLE: &str = "superadmin";

/// Property permission flags carried by a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default, deserialize_with = "de_null_default")]
    pub add_property: bool,
    #[serde(default, deserialize_with = "de_null_default")]
    pub update_property: bool,
    #[serde(default, deserialize_with = "de_null_default")]
    pub delete_property: bool,
}

/// Permissions a user ends up with after merging all of their roles.
pub type EffectivePermissions = Permissions;

impl Permissions {
    pub const NONE: Permissions = Permissions {
        add_property: false,
        update_property: false,
        delete_property: false,
    };

    pub const ALL: Permissions = Permissions {
        add_property: true,
        update_property: true,
        delete_property: true,
    };

    /// OR `other` into `self`. Never clears a flag.
    pub fn merge(&mut self, other: &Permissions) {
        self.add_property |= other.add_property;
        self.update_property |= other.update_property;
        self.delete_property |= other.delete_property;
    }

    /// True if every flag set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Permissions) -> bool {
        (!self.add_property || other.add_property)
            && (!self.update_property || other.update_property)
            && (!self.delete_property || other.delete_property)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    /// May be blank in the catalog; display falls back to the id.
    #[serde(default, deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de_null_default")]
    pub permissions: Permissions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions,
            extra: Map::new(),
        }
    }

    pub fn is_superadmin(&self) -> bool {
        self.id == SUPERADMIN_ROLE
    }
}
