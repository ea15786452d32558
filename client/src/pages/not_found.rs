//! Blocked / not-found screen. Sign-ins from disallowed domains land here.

use leptos::prelude::*;
use okr_portal::routes::AppRoute;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"404"</h1>
                <p class="login-message">
                    "This page does not exist, or your account is not authorized to use the portal."
                </p>
                <a class="login-button" href=AppRoute::login().href()>"Back to login"</a>
            </div>
        </div>
    }
}
