use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_id, de_null_default, SUPERADMIN_ROLE};

/// A user record as stored by the backend.
///
/// Older records carry a single `role` string instead of a `roles` list. That
/// shape is folded into `roles` during deserialization, so the rest of the
/// crate only ever sees `roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUser")]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Stored and compared as plaintext by the backend.
    pub password: String,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Fields this crate does not model, sent back untouched on update.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The singular `role` the record was stored with, if any. Not sent back:
    /// an update writes `roles`.
    #[serde(skip)]
    pub legacy_role: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    #[serde(default, deserialize_with = "de_id")]
    id: String,
    #[serde(default, deserialize_with = "de_null_default")]
    name: String,
    #[serde(default, deserialize_with = "de_null_default")]
    email: String,
    #[serde(default, deserialize_with = "de_null_default")]
    password: String,
    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        let roles = match (raw.roles, &raw.role) {
            (Some(roles), _) => roles,
            (None, Some(role)) => vec![role.clone()],
            (None, None) => Vec::new(),
        };
        Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            password: raw.password,
            roles,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            extra: raw.extra,
            legacy_role: raw.role,
        }
    }
}

impl User {
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }

    /// True for the old root-account shape: a singular `role` of `superadmin`.
    pub fn is_legacy_superadmin(&self) -> bool {
        self.legacy_role.as_deref() == Some(SUPERADMIN_ROLE)
    }
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<String>,
    pub created_at: String,
}
