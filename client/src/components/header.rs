//! Top bar: page title, current user and logout.

#[cfg(test)]
#[path = "header_test.rs"]
mod header_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use okr_portal::guards;
use okr_portal::roles::display_role;
use okr_portal::routes::AppRoute;

use crate::components::guards::replacing;
use crate::net::api::portal_store;

/// Drop the session and return the login location. Replaces the history entry.
pub(crate) fn sign_out() -> (String, NavigateOptions) {
    (guards::logout(&portal_store()).href(), replacing())
}

#[component]
pub fn AppHeader() -> impl IntoView {
    let navigate = use_navigate();
    let location = use_location();

    let user = portal_store().read().map(|s| s.user).unwrap_or_default();
    let role = display_role(&user.roles);
    let avatar = user
        .avatar_url
        .clone()
        .map(|src| view! { <img class="app-header__avatar" src=src alt=""/> });

    let title = move || AppRoute::resolve(&location.pathname.get()).title();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        let (href, options) = sign_out();
        navigate(&href, options);
    };

    view! {
        <header class="app-header">
            <h1 class="app-header__title">{title}</h1>
            <div class="app-header__user">
                {avatar}
                <div class="app-header__identity">
                    <span class="app-header__name">{user.name}</span>
                    <span class="app-header__role">{role}</span>
                </div>
                <button class="app-header__logout" on:click=on_logout>
                    "Log out"
                </button>
            </div>
        </header>
    }
}
