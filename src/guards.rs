//! Route guards.
//!
//! Guards are pure predicates over the session store, evaluated on every
//! protected render and never cached. A failed guard names the route to
//! redirect to; it does not navigate.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use crate::roles;
use crate::routes::AppRoute;
use crate::session::{SessionStorage, SessionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Requires a stored bearer token.
    Authenticated,
    /// Requires a privileged role. Only reached inside the authenticated layout.
    Admin,
    /// Keeps signed-in users off the login screen.
    PublicOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(AppRoute),
}

impl GuardOutcome {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Pass iff a session with a non-empty token exists; otherwise send the user to
/// login, remembering `attempted`.
pub fn authenticated<S: SessionStorage>(store: &SessionStore<S>, attempted: &str) -> GuardOutcome {
    if store.is_authenticated() {
        return GuardOutcome::Allow;
    }
    log::debug!("unauthenticated access to {attempted}, redirecting to login");
    let from = Some(attempted.to_owned()).filter(|p| !p.is_empty());
    GuardOutcome::Redirect(AppRoute::Login { notice: None, from })
}

/// Pass iff the stored roles intersect the privileged set. Under-privileged
/// users go back to the dashboard, not to login.
pub fn admin<S: SessionStorage>(store: &SessionStore<S>) -> GuardOutcome {
    let allowed = store.read().is_some_and(|session| roles::is_admin(&session.user.roles));
    if allowed {
        GuardOutcome::Allow
    } else {
        log::warn!("admin route denied, redirecting to dashboard");
        GuardOutcome::Redirect(AppRoute::Dashboard)
    }
}

/// Pass iff nobody is signed in.
pub fn public_only<S: SessionStorage>(store: &SessionStore<S>) -> GuardOutcome {
    if store.is_authenticated() {
        GuardOutcome::Redirect(AppRoute::Dashboard)
    } else {
        GuardOutcome::Allow
    }
}

/// Evaluate one guard. `attempted` is the location being visited, query included.
pub fn check<S: SessionStorage>(guard: Guard, store: &SessionStore<S>, attempted: &str) -> GuardOutcome {
    match guard {
        Guard::Authenticated => authenticated(store, attempted),
        Guard::Admin => admin(store),
        Guard::PublicOnly => public_only(store),
    }
}

/// Run the route's guard chain outermost first; the first redirect wins.
pub fn evaluate<S: SessionStorage>(store: &SessionStore<S>, route: &AppRoute, attempted: &str) -> GuardOutcome {
    route
        .guards()
        .iter()
        .map(|guard| check(*guard, store, attempted))
        .find(|outcome| !outcome.is_allowed())
        .unwrap_or(GuardOutcome::Allow)
}

/// Sign out: drop the whole session and head to login.
pub fn logout<S: SessionStorage>(store: &SessionStore<S>) -> AppRoute {
    store.clear();
    AppRoute::login()
}
