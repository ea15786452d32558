//! Canonical role slugs.
//!
//! DESIGN
//! ======
//! The backend has shipped user roles both as plain strings (`"SUPER_ADMIN"`)
//! and as role objects (`{ "slug": "SUPER_ADMIN", "name": "Super Admin" }`).
//! Both shapes collapse into [`Role`] when a profile is deserialized, so guards
//! and labels only ever compare uppercase slugs.

#[cfg(test)]
#[path = "roles_test.rs"]
mod roles_test;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const SUPER_ADMIN: &str = "SUPER_ADMIN";
pub const SYSTEM_ADMIN: &str = "SYSTEM_ADMIN";
pub const ADMIN: &str = "ADMIN";
pub const DEAN: &str = "DEAN";

/// Roles allowed through the admin guard.
pub const PRIVILEGED_ROLES: [&str; 3] = [SYSTEM_ADMIN, SUPER_ADMIN, ADMIN];

/// Canonical uppercase role slug.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    /// Build a role from any slug-like text, uppercasing it.
    #[must_use]
    pub fn new(slug: &str) -> Self {
        Self(slug.to_uppercase())
    }

    /// Normalize one raw `roles` entry.
    ///
    /// Strings pass through; objects yield `slug`, else `name`, else `""`.
    /// Anything else (numbers, null) yields the empty role.
    #[must_use]
    pub fn normalize(raw: &Value) -> Self {
        match raw {
            Value::String(slug) => Self::new(slug),
            Value::Object(map) => {
                let pick = |key: &str| map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
                Self::new(pick("slug").or_else(|| pick("name")).unwrap_or_default())
            }
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_privileged(&self) -> bool {
        PRIVILEGED_ROLES.contains(&self.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|raw| Self::normalize(&raw))
    }
}

/// Deserialize a `roles` field; a non-array value becomes an empty list.
pub(crate) fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_all(&Value::deserialize(deserializer)?))
}

/// Normalize a raw JSON `roles` value into canonical roles.
#[must_use]
pub fn normalize_all(raw: &Value) -> Vec<Role> {
    raw.as_array()
        .map(|items| items.iter().map(Role::normalize).collect())
        .unwrap_or_default()
}

fn has(roles: &[Role], slug: &str) -> bool {
    roles.iter().any(|r| r.as_str() == slug)
}

/// Whether any role intersects [`PRIVILEGED_ROLES`].
#[must_use]
pub fn is_admin(roles: &[Role]) -> bool {
    roles.iter().any(Role::is_privileged)
}

#[must_use]
pub fn is_super_admin(roles: &[Role]) -> bool {
    has(roles, SUPER_ADMIN)
}

/// Department managers: super admins, system admins and deans.
#[must_use]
pub fn is_manager(roles: &[Role]) -> bool {
    has(roles, SUPER_ADMIN) || has(roles, SYSTEM_ADMIN) || has(roles, DEAN)
}

/// Header label for the signed-in user.
#[must_use]
pub fn display_role(roles: &[Role]) -> String {
    if has(roles, SUPER_ADMIN) {
        "Super Admin".to_owned()
    } else if has(roles, SYSTEM_ADMIN) {
        "System Admin".to_owned()
    } else if let Some(first) = roles.first() {
        first.to_string()
    } else {
        "User".to_owned()
    }
}
