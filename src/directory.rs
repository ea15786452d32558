//! Allowed sign-in domains shown on the login screen.

#[cfg(test)]
#[path = "directory_test.rs"]
mod directory_test;

use serde::Deserialize;

use crate::config::PortalConfig;
use crate::gateway::{ApiClient, Navigator, Transport};
use crate::session::SessionStorage;

const ALLOWED_DOMAINS_ENDPOINT: &str = "/auth/allowed-domains";

#[derive(Debug, Deserialize)]
struct AllowedDomainsResponse {
    #[serde(default)]
    domains: Vec<String>,
}

/// Fetch the email domains allowed to sign in. Failures and empty answers
/// fall back to the configured domain.
pub async fn fetch_allowed_domains<T, S, N>(api: &ApiClient<T, S, N>, config: &PortalConfig) -> Vec<String>
where
    T: Transport,
    S: SessionStorage,
    N: Navigator,
{
    match api.get_json::<AllowedDomainsResponse>(ALLOWED_DOMAINS_ENDPOINT).await {
        Ok(body) if !body.domains.is_empty() => body.domains,
        Ok(_) => vec![config.fallback_allowed_domain.clone()],
        Err(e) => {
            log::warn!("allowed domains unavailable: {e}");
            vec![config.fallback_allowed_domain.clone()]
        }
    }
}

/// Access-requirement line for the login card.
#[must_use]
pub fn allowed_domains_notice(domains: &[String]) -> String {
    if domains.is_empty() {
        return "System is restricted to authorized personnel.".to_owned();
    }
    let listed: Vec<String> = domains.iter().map(|d| format!("@{}", d.trim_start_matches('@'))).collect();
    format!("Only accounts ending in {} are authorized.", listed.join(", "))
}
