//! # okr-portal
//!
//! Client-side authentication core for the OKR & KPI management portal.
//!
//! This crate owns everything the web client needs to decide *who is logged in*
//! and *where they may go*: the tab-scoped session store, role normalization,
//! the OAuth redirect decoder, the route table with its guards, the API gateway
//! client with its session interceptors, and the invitation acceptance flow.
//!
//! Browser specifics (storage handle, HTTP transport, hard navigation) stay
//! behind the [`session::SessionStorage`], [`gateway::Transport`] and
//! [`gateway::Navigator`] seams so every rule here is testable natively.

pub mod callback;
pub mod config;
pub mod directory;
pub mod gateway;
pub mod guards;
pub mod invitation;
pub mod roles;
pub mod routes;
pub mod session;

#[cfg(test)]
mod test_support;
