//! # okr-portal-web
//!
//! Leptos + WASM frontend for the OKR/KPI portal. Session, routing and
//! backend rules live in the `okr-portal` crate; this crate binds them to the
//! browser (session storage, `fetch`, `window.location`) and renders the
//! sign-in flows and the guarded route tree.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("okr portal starting");
    leptos::mount::mount_to_body(app::App);
}
