//! Portal configuration.
//!
//! Native callers read the process environment with [`PortalConfig::from_env`].
//! The browser build has no environment at runtime, so the web client captures
//! the same variables at compile time and feeds them to
//! [`PortalConfig::from_lookup`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_ALLOWED_DOMAIN: &str = "itec.hcmus.edu.vn";

pub const API_BASE_URL_VAR: &str = "OKR_API_BASE_URL";
pub const ALLOWED_DOMAIN_VAR: &str = "OKR_FALLBACK_ALLOWED_DOMAIN";
pub const GOOGLE_CLIENT_ID_VAR: &str = "OKR_GOOGLE_CLIENT_ID";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidBaseUrl { var: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Microsoft,
}

impl OAuthProvider {
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    /// Backend origin, without a trailing slash.
    pub api_base_url: String,
    /// Shown on the login screen when the allowed-domain list cannot be fetched.
    pub fallback_allowed_domain: String,
    /// Google Identity Services client id for the invitation page.
    pub google_client_id: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            fallback_allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_owned(),
            google_client_id: None,
        }
    }
}

impl PortalConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `OKR_API_BASE_URL`: default `http://localhost:3000`
    /// - `OKR_FALLBACK_ALLOWED_DOMAIN`: default `itec.hcmus.edu.vn`
    /// - `OKR_GOOGLE_CLIENT_ID`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-http(s) base URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base_url = match get(API_BASE_URL_VAR) {
            Some(url) => parse_base_url(&url)?,
            None => DEFAULT_API_BASE_URL.to_owned(),
        };
        let fallback_allowed_domain = get(ALLOWED_DOMAIN_VAR)
            .map(|d| d.trim_start_matches('@').to_owned())
            .unwrap_or_else(|| DEFAULT_ALLOWED_DOMAIN.to_owned());
        let google_client_id = get(GOOGLE_CLIENT_ID_VAR);

        Ok(Self { api_base_url, fallback_allowed_domain, google_client_id })
    }

    /// Absolute URL for a backend path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    /// Where the browser goes to start an OAuth sign-in.
    #[must_use]
    pub fn oauth_start_url(&self, provider: OAuthProvider) -> String {
        self.endpoint(&format!("auth/{}", provider.slug()))
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let valid = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.len() > scheme.len() && trimmed.starts_with(scheme));
    if valid {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidBaseUrl { var: API_BASE_URL_VAR, value: raw.to_owned() })
    }
}
