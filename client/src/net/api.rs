//! Browser bindings for the portal API client.
//!
//! Client-side (csr): real HTTP via `gloo-net` and hard navigation via
//! `window.location`. Native builds (tests) get a transport that never
//! produces a response and a navigator that only logs.
//!
//! CONFIGURATION
//! =============
//! The browser has no process environment, so the `OKR_*` variables are
//! captured when the crate is compiled.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use okr_portal::config::{self, PortalConfig};
use okr_portal::gateway::{ApiClient, ApiRequest, ApiResponse, Navigator, Transport, TransportError};
use okr_portal::routes::AppRoute;
use okr_portal::session::SessionStore;

use crate::util::storage::BrowserStorage;

pub type PortalApi = ApiClient<BrowserTransport, BrowserStorage, HardNavigator>;

/// `fetch` through `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

/// Full page loads through `window.location`, so nothing from the old session
/// survives in memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct HardNavigator;

fn compiled_var(key: &str) -> Option<String> {
    let value = match key {
        config::API_BASE_URL_VAR => option_env!("OKR_API_BASE_URL"),
        config::ALLOWED_DOMAIN_VAR => option_env!("OKR_FALLBACK_ALLOWED_DOMAIN"),
        config::GOOGLE_CLIENT_ID_VAR => option_env!("OKR_GOOGLE_CLIENT_ID"),
        _ => None,
    };
    value.map(str::to_owned)
}

fn config_or_default<F>(lookup: F) -> PortalConfig
where
    F: Fn(&str) -> Option<String>,
{
    PortalConfig::from_lookup(lookup).unwrap_or_else(|e| {
        log::error!("invalid portal configuration, using defaults: {e}");
        PortalConfig::default()
    })
}

/// Portal configuration captured at build time.
pub fn portal_config() -> PortalConfig {
    config_or_default(compiled_var)
}

/// Session store over `sessionStorage`.
pub fn portal_store() -> SessionStore<BrowserStorage> {
    SessionStore::new(BrowserStorage)
}

/// API client for the configured backend. Construction is cheap; every
/// handle shares the same browser storage.
pub fn portal() -> PortalApi {
    ApiClient::new(&portal_config().api_base_url, BrowserTransport, portal_store(), HardNavigator)
}

#[cfg(any(test, feature = "csr"))]
fn network_failure_message(method: &str, url: &str, cause: &str) -> String {
    format!("{method} {url}: {cause}")
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use okr_portal::gateway::Method;

            let method = request.method.as_str();
            let fail = |e: gloo_net::Error| TransportError(network_failure_message(method, &request.url, &e.to_string()));

            let mut builder = match request.method {
                Method::Get => gloo_net::http::Request::get(&request.url),
                Method::Post => gloo_net::http::Request::post(&request.url),
                Method::Put => gloo_net::http::Request::put(&request.url),
                Method::Patch => gloo_net::http::Request::patch(&request.url),
                Method::Delete => gloo_net::http::Request::delete(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if !request.query.is_empty() {
                builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            let built = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(fail)?;

            let resp = built.send().await.map_err(fail)?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError(format!("{} {} is only available in the browser", request.method.as_str(), request.url)))
        }
    }
}

impl Navigator for HardNavigator {
    fn navigate(&self, route: &AppRoute) {
        hard_navigate(&route.href());
    }
}

/// Leave the app for `url` with a full page load.
pub fn hard_navigate(url: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if window.location().set_href(url).is_err() {
                log::error!("navigation to {url} failed");
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        log::info!("navigation to {url} skipped outside the browser");
    }
}
