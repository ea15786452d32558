//! Networking modules for the backend HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` binds the portal's `ApiClient` to `fetch` and `window.location`;
//! every page reaches the backend through [`api::portal`].

pub mod api;
