//! Reusable UI components.
//!
//! ARCHITECTURE
//! ============
//! Guards decide what a route may render; the layout pieces render the
//! signed-in chrome around the routed page.

pub mod guards;
pub mod header;
pub mod layout;
pub mod sidebar;
