//! API gateway client.
//!
//! Every backend call goes through [`ApiClient::send`], which wraps the
//! platform [`Transport`] with two interceptors:
//!
//! - outbound: attach `Authorization: Bearer <token>` when a session exists,
//!   otherwise send the request anonymously and let the server decide;
//! - inbound: a 401 clears the session and forces navigation to login before
//!   the caller sees anything.
//!
//! ERROR HANDLING
//! ==============
//! Session-level failures are handled here, globally. Every other failure is
//! returned to the caller as an [`ApiError`] for local, recoverable display.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::routes::AppRoute;
use crate::session::{SessionStorage, SessionStore};

pub const UNAUTHORIZED: u16 = 401;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Outgoing request, before the base URL is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), query: Vec::new(), headers: Vec::new(), body: None }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Platform HTTP backend.
#[async_trait(?Send)]
pub trait Transport {
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Hard navigation used by the inbound interceptor.
pub trait Navigator {
    fn navigate(&self, route: &AppRoute);
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// The session was rejected; it has already been cleared.
    #[error("session expired")]
    Unauthenticated,
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for inline display: the server's own message when it sent one.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message: Some(message), .. } => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthenticated => Some(UNAUTHORIZED),
            _ => None,
        }
    }
}

/// First message from a `{ "message": string | string[] }` error body.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(messages) => messages.first().and_then(Value::as_str).map(str::to_owned),
        _ => None,
    };
    message.filter(|message| !message.is_empty())
}

/// Pull a list out of either a bare array, `{ "data": [...] }` or `{ <field>: [...] }`.
#[must_use]
pub fn extract_list<T: DeserializeOwned>(value: Value, field: &str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field).or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// The single HTTP client all backend calls flow through.
pub struct ApiClient<T, S, N> {
    base_url: String,
    transport: T,
    store: SessionStore<S>,
    navigator: N,
}

impl<T, S, N> ApiClient<T, S, N>
where
    T: Transport,
    S: SessionStorage,
    N: Navigator,
{
    pub fn new(base_url: &str, transport: T, store: SessionStore<S>, navigator: N) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), transport, store, navigator }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn prepare(&self, mut request: ApiRequest) -> ApiRequest {
        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            request.url = format!("{}/{}", self.base_url, request.url.trim_start_matches('/'));
        }
        request.headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        if let Some(session) = self.store.read() {
            request
                .headers
                .push(("Authorization".to_owned(), format!("Bearer {}", session.auth_token)));
        }
        request
    }

    /// Send a request through both interceptors.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] after clearing the session on a 401,
    /// [`ApiError::Status`] for other non-2xx responses and
    /// [`ApiError::Network`] when the transport produced no response.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request = self.prepare(request);
        let method = request.method;
        let url = request.url.clone();

        let response = self.transport.send(request).await.map_err(|e| {
            log::warn!("{} {url} failed: {e}", method.as_str());
            ApiError::Network(e.0)
        })?;

        if response.status == UNAUTHORIZED {
            log::warn!("{} {url} rejected as unauthenticated; signing out", method.as_str());
            self.store.clear();
            self.navigator.navigate(&AppRoute::login());
            return Err(ApiError::Unauthenticated);
        }
        if !response.is_success() {
            return Err(ApiError::Status { status: response.status, message: error_message(&response.body) });
        }
        Ok(response)
    }

    /// Send and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns, plus [`ApiError::Decode`].
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.send(request).await?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send_json(ApiRequest::new(Method::Get, path)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        self.send_json(ApiRequest::new(Method::Post, path).with_body(to_body(body)?))
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn put_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        self.send_json(ApiRequest::new(Method::Put, path).with_body(to_body(body)?))
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn patch_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        self.send_json(ApiRequest::new(Method::Patch, path).with_body(to_body(body)?))
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::new(Method::Delete, path)).await.map(|_| ())
    }

    /// Fetch a collection that may come back bare or wrapped.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_json`].
    pub async fn get_list<R: DeserializeOwned>(&self, request: ApiRequest, field: &str) -> Result<Vec<R>, ApiError> {
        let value: Value = self.send_json(request).await?;
        Ok(extract_list(value, field))
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
