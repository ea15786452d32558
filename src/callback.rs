//! OAuth redirect consumer.
//!
//! After the provider round-trip the backend sends the browser back with the
//! outcome encoded in query parameters:
//!
//! - `error`: one of a small vocabulary, or any opaque code
//! - `token` / `accessToken`, `refreshToken`: bearer credentials
//! - `user`: URL-encoded JSON profile
//! - `isFirstUser`: `"true"` when this account bootstrapped the tenant
//!
//! The parameters are decoded once into [`AuthRedirect`] and then matched
//! exhaustively, so every terminal transition is enumerable.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use percent_encoding::percent_decode_str;

use crate::routes::AppRoute;
use crate::session::{SessionStorage, SessionStore, SessionUser};

pub const GENERIC_FAILURE: &str = "Authentication failed. Please try again.";

/// Error codes the backend may put in the `error` parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthErrorCode {
    DomainNotAllowed,
    AuthFailed,
    NoCode,
    AccessDenied,
    Other(String),
}

impl AuthErrorCode {
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "domain_not_allowed" => Self::DomainNotAllowed,
            "auth_failed" => Self::AuthFailed,
            "no_code" => Self::NoCode,
            "access_denied" => Self::AccessDenied,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::DomainNotAllowed => "Your email domain is not authorized".to_owned(),
            Self::AuthFailed => GENERIC_FAILURE.to_owned(),
            Self::NoCode => "Authorization code missing".to_owned(),
            Self::AccessDenied => "You declined to grant access.".to_owned(),
            Self::Other(code) => format!("Sign-in error: {code}"),
        }
    }
}

/// Decoded redirect parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRedirect {
    Error(AuthErrorCode),
    Success {
        token: String,
        refresh_token: Option<String>,
        /// Still URL-encoded profile JSON, exactly as the backend sent it.
        user_json: String,
        first_user: bool,
    },
    Empty,
}

impl AuthRedirect {
    /// Decode already-split query pairs. Empty values count as absent and an
    /// `error` wins over any credentials sent alongside it.
    pub fn from_query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut error = None;
        let mut token = None;
        let mut access_token = None;
        let mut refresh_token = None;
        let mut user_json = None;
        let mut first_user = false;

        for (key, value) in pairs {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "error" => &mut error,
                "token" => &mut token,
                "accessToken" => &mut access_token,
                "refreshToken" => &mut refresh_token,
                "user" => &mut user_json,
                "isFirstUser" => {
                    first_user = value == "true";
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_owned());
            }
        }

        if let Some(code) = error {
            return Self::Error(AuthErrorCode::parse(&code));
        }
        match (token.or(access_token), user_json) {
            (Some(token), Some(user_json)) => Self::Success { token, refresh_token, user_json, first_user },
            _ => Self::Empty,
        }
    }

    /// Decode a raw query string (with or without the leading `?`).
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        Self::from_query(parse_query(query))
    }
}

/// Split a query string into decoded key/value pairs (`+` is a space).
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parse the `user` parameter: one more round of percent-decoding, then JSON.
fn parse_user(user_json: &str) -> Option<SessionUser> {
    let decoded = percent_decode_str(user_json).decode_utf8().ok()?;
    match serde_json::from_str(&decoded) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("redirect carried an unreadable user profile: {e}");
            None
        }
    }
}

/// Apply a decoded redirect to the session store and pick the next screen.
///
/// Exactly one route is returned per redirect:
/// - a disallowed domain goes to the blocked screen,
/// - any other error goes to login with a message,
/// - credentials are committed and lead to the dashboard, or to admin settings
///   for the first user,
/// - nothing at all goes to login.
pub fn complete_sign_in<S: SessionStorage>(store: &SessionStore<S>, redirect: AuthRedirect) -> AppRoute {
    match redirect {
        AuthRedirect::Error(AuthErrorCode::DomainNotAllowed) => {
            log::warn!("sign-in rejected: email domain not allowed");
            AppRoute::NotFound
        }
        AuthRedirect::Error(code) => {
            log::warn!("sign-in failed with {code:?}");
            AppRoute::login_with_notice(code.message())
        }
        AuthRedirect::Success { token, refresh_token, user_json, first_user } => {
            let Some(user) = parse_user(&user_json) else {
                return AppRoute::login_with_notice(GENERIC_FAILURE);
            };
            if let Err(e) = store.commit(&token, refresh_token.as_deref(), &user) {
                log::warn!("could not store session: {e}");
                return AppRoute::login_with_notice(GENERIC_FAILURE);
            }
            if first_user {
                log::info!("first user signed in, opening admin settings");
                AppRoute::AdminSettings
            } else {
                AppRoute::Dashboard
            }
        }
        AuthRedirect::Empty => AppRoute::login(),
    }
}
