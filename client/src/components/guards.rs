//! Route guard wrapper.
//!
//! [`RouteGuard`] sits between the router and the route table. On every
//! location change it resolves the path to an [`AppRoute`] and runs that
//! route's guard chain against the stored session, then either renders the
//! routes or redirects. A redirect replaces the current history entry so
//! "back" does not bounce into the guard again.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;
use okr_portal::guards::{self, GuardOutcome};
use okr_portal::routes::AppRoute;

use crate::net::api::portal_store;
use crate::state::flash::use_flash;

/// Navigation that replaces the current history entry.
pub fn replacing() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Client-side redirect to `route`. Its notice, if any, goes to the flash.
pub fn redirect_to(route: &AppRoute) -> impl IntoView + use<> {
    use_flash().carry(route);
    view! { <Redirect path=route.href() options=replacing()/> }
}

/// Location as typed, `search` with or without its leading `?`.
pub(crate) fn attempted_location(pathname: &str, search: &str) -> String {
    let query = search.trim_start_matches('?');
    if query.is_empty() { pathname.to_owned() } else { format!("{pathname}?{query}") }
}

/// Guard outcome for a location against the browser session.
pub(crate) fn outcome_for(pathname: &str, search: &str) -> GuardOutcome {
    let route = AppRoute::resolve(pathname);
    guards::evaluate(&portal_store(), &route, &attempted_location(pathname, search))
}

/// Render `children` only while the current route's guard chain allows it.
#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let location = use_location();
    let outcome = Memo::new(move |_| outcome_for(&location.pathname.get(), &location.search.get()));

    move || match outcome.get() {
        GuardOutcome::Allow => children().into_any(),
        GuardOutcome::Redirect(route) => {
            log::info!("guard redirect to {}", route.href());
            redirect_to(&route).into_any()
        }
    }
}
