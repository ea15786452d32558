//! Login page: OAuth provider buttons and the allowed-domain notice.
//!
//! The backend may also send its OAuth redirect here instead of to the
//! callback route, so the query string is decoded the same way first.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use okr_portal::callback::{self, AuthRedirect};
use okr_portal::config::OAuthProvider;
use okr_portal::directory;

use crate::components::guards::redirect_to;
use crate::net::api::{portal_config, portal_store};
use crate::state::flash::use_flash;

/// Button label for a provider.
fn provider_label(provider: OAuthProvider) -> &'static str {
    match provider {
        OAuthProvider::Google => "Sign in with Google",
        OAuthProvider::Microsoft => "Sign in with Microsoft",
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let search = use_location().search.get_untracked();
    match AuthRedirect::from_query_str(&search) {
        AuthRedirect::Empty => view! { <LoginCard/> }.into_any(),
        redirect => {
            let route = callback::complete_sign_in(&portal_store(), redirect);
            redirect_to(&route).into_any()
        }
    }
}

#[component]
fn LoginCard() -> impl IntoView {
    let config = portal_config();
    let notice = use_flash().take();
    let fallback = config.fallback_allowed_domain.clone();
    let domains = RwSignal::new(vec![fallback]);

    #[cfg(feature = "csr")]
    {
        let config = config.clone();
        leptos::task::spawn_local(async move {
            let fetched = directory::fetch_allowed_domains(&crate::net::api::portal(), &config).await;
            domains.set(fetched);
        });
    }

    let providers = [OAuthProvider::Google, OAuthProvider::Microsoft]
        .into_iter()
        .map(|provider| {
            let href = config.oauth_start_url(provider);
            view! {
                <a class=format!("login-button login-button--{}", provider.slug()) href=href>
                    {provider_label(provider)}
                </a>
            }
        })
        .collect_view();

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"OKR Portal"</h1>
                <p class="login-card__subtitle">"Sign in with your institutional account"</p>
                {notice.map(|text| view! { <p class="login-message login-message--error">{text}</p> })}
                <div class="login-providers">{providers}</div>
                <p class="login-message">{move || directory::allowed_domains_notice(&domains.get())}</p>
            </div>
        </div>
    }
}
