//! Tab-scoped session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session is the single source of truth for "who is logged in". It is
//! written by the redirect handler and the invitation flow, read by route
//! guards and the gateway client on every navigation/request, and cleared on
//! logout or whenever the backend rejects a request as unauthenticated.
//!
//! TRADE-OFFS
//! ==========
//! There is no expiry bookkeeping: a stale token is only discovered by the
//! first 401. A profile that no longer parses is treated as "no session" so a
//! corrupt storage entry degrades to a login prompt instead of an error.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::roles::{self, Role};

pub const TOKEN_KEY: &str = "authToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Error returned when a session cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to serialize user profile: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("session storage unavailable: {0}")]
    Storage(String),
}

/// Minimal key/value storage contract, shaped like the Web Storage API.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the backing store rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;

    fn remove_item(&self, key: &str);
}

/// In-memory storage. Clones share the same map, like handles to one tab's storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Department reference carried on the user profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
}

/// Identity record cached alongside the bearer token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: String,
    /// Canonical roles; both backend shapes normalize here.
    #[serde(default, deserialize_with = "roles::deserialize_roles")]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
    #[serde(default, alias = "avatar", alias = "picture", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl SessionUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        roles::is_admin(&self.roles)
    }

    /// Department label, or the generic section title when none is assigned.
    #[must_use]
    pub fn department_name(&self) -> &str {
        self.department
            .as_ref()
            .map(|d| d.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Department")
    }
}

/// A committed session as read back from storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub auth_token: String,
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

/// Accessor over the session keys. `commit`, `read` and `clear` are the only
/// operations that touch them.
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store a new session, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be serialized or storage rejects a write.
    pub fn commit(&self, token: &str, refresh_token: Option<&str>, user: &SessionUser) -> Result<(), SessionError> {
        let profile = serde_json::to_string(user)?;
        self.storage.set_item(TOKEN_KEY, token)?;
        self.storage.set_item(USER_KEY, &profile)?;
        match refresh_token {
            Some(refresh) => self.storage.set_item(REFRESH_TOKEN_KEY, refresh)?,
            None => self.storage.remove_item(REFRESH_TOKEN_KEY),
        }
        log::info!("session committed for user {}", user.id);
        Ok(())
    }

    /// Read the current session. Missing or unparseable entries mean "no session".
    pub fn read(&self) -> Option<Session> {
        let auth_token = self.storage.get_item(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let raw_user = self.storage.get_item(USER_KEY)?;
        let user = match serde_json::from_str::<SessionUser>(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                log::warn!("discarding unreadable stored profile: {e}");
                return None;
            }
        };
        let refresh_token = self.storage.get_item(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty());
        Some(Session { auth_token, refresh_token, user })
    }

    /// Remove every session key. Clearing an empty session is a no-op.
    pub fn clear(&self) {
        self.storage.remove_item(TOKEN_KEY);
        self.storage.remove_item(REFRESH_TOKEN_KEY);
        self.storage.remove_item(USER_KEY);
        log::info!("session cleared");
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}

/// Text field that the backend may send as `null`.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an identifier written as either a JSON string or a number.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}
