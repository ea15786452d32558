//! Placeholder for portal sections whose screens live elsewhere.

use leptos::prelude::*;
use okr_portal::routes::AppRoute;

#[component]
pub fn SectionPage(route: AppRoute) -> impl IntoView {
    view! {
        <div class="section-page">
            <h2>{route.title()}</h2>
            <p class="section-page__empty">"Nothing to show here yet."</p>
        </div>
    }
}
