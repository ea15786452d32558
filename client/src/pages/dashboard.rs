//! Dashboard landing page for signed-in users.

use leptos::prelude::*;
use okr_portal::roles::display_role;

use crate::net::api::portal_store;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let user = portal_store().read().map(|s| s.user).unwrap_or_default();
    let department = user.department_name().to_owned();
    let role = display_role(&user.roles);

    view! {
        <div class="dashboard-page">
            <h2 class="dashboard-page__greeting">"Welcome, " {user.name}</h2>
            <dl class="dashboard-page__facts">
                <dt>"Email"</dt>
                <dd>{user.email}</dd>
                <dt>"Department"</dt>
                <dd>{department}</dd>
                <dt>"Role"</dt>
                <dd>{role}</dd>
            </dl>
        </div>
    }
}
