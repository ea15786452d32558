//! OAuth callback consumer.
//!
//! Decodes the backend's redirect, stores the session on success and moves
//! on. Exactly one redirect is issued per visit.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use okr_portal::callback::{self, AuthRedirect};

use crate::components::guards::redirect_to;
use crate::net::api::portal_store;

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let search = use_location().search.get_untracked();
    let route = callback::complete_sign_in(&portal_store(), AuthRedirect::from_query_str(&search));

    view! {
        <div class="auth-callback">
            <div class="auth-callback__spinner"></div>
            <p>"Completing sign-in..."</p>
            {redirect_to(&route)}
        </div>
    }
}
