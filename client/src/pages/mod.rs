//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates session and
//! routing decisions to the `okr-portal` crate.

pub mod accept_invitation;
pub mod admin_settings;
pub mod auth_callback;
pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod section;
