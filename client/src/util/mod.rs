//! Browser bindings shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each module isolates one browser API so pages and components stay free of
//! `web_sys` plumbing and build without the `csr` feature.

pub mod google_identity;
pub mod storage;
