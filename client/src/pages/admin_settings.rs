//! Administration settings landing page. Reached only through the admin guard.

use leptos::prelude::*;
use okr_portal::roles;

use crate::net::api::{portal_config, portal_store};

#[component]
pub fn AdminSettingsPage() -> impl IntoView {
    let user = portal_store().read().map(|s| s.user).unwrap_or_default();
    let config = portal_config();
    let scope = if roles::is_super_admin(&user.roles) {
        "You can manage every department and administrator."
    } else {
        "You can manage departments and invitations."
    };

    view! {
        <div class="admin-settings">
            <h2>"System settings"</h2>
            <p>{scope}</p>
            <dl class="admin-settings__facts">
                <dt>"Backend"</dt>
                <dd>{config.api_base_url}</dd>
                <dt>"Default sign-in domain"</dt>
                <dd>{format!("@{}", config.fallback_allowed_domain)}</dd>
            </dl>
        </div>
    }
}
