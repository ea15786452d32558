//! Invitation acceptance page.
//!
//! Verifies the token from the URL, then lets the invitee sign in with
//! Google. The credential must name the invited address before it is sent to
//! the backend; a successful accept signs the user in.

#[cfg(test)]
#[path = "accept_invitation_test.rs"]
mod accept_invitation_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use okr_portal::invitation::{self, InvitationFlow, InvitationPhase};
use okr_portal::routes::AppRoute;

use crate::components::guards::replacing;
use crate::net::api::{portal, portal_config, portal_store};
use crate::util::google_identity;

const BUTTON_CONTAINER_ID: &str = "invite-google-button";

/// Status line for phases that have no card of their own.
fn status_text(phase: &InvitationPhase) -> Option<&'static str> {
    match phase {
        InvitationPhase::Verifying => Some("Verifying invitation..."),
        InvitationPhase::Accepting { .. } => Some("Accepting invitation..."),
        InvitationPhase::Accepted => Some("Invitation accepted. Redirecting..."),
        InvitationPhase::Ready { .. } | InvitationPhase::Invalid { .. } => None,
    }
}

#[component]
pub fn AcceptInvitationPage() -> impl IntoView {
    let token = use_params_map().with_untracked(|params| params.get("token")).unwrap_or_default();
    let flow = RwSignal::new(InvitationFlow::new(&token));
    let navigate = use_navigate();

    leptos::task::spawn_local(async move {
        let result = invitation::verify_invitation(&portal(), &token).await;
        flow.update(|f| f.on_verified(result));
    });

    let on_credential = move |credential: Option<String>| {
        let Some(credential) = credential else {
            flow.update(InvitationFlow::on_provider_error);
            return;
        };
        let Some(Ok(request)) = flow.try_update(|f| f.begin_accept(&credential)) else {
            return;
        };
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let result = invitation::accept_invitation(&portal(), &request).await;
            let next = flow.try_update(|f| f.on_accepted(&portal_store(), result)).flatten();
            if let Some(route) = next {
                navigate(&route.href(), replacing());
            }
        });
    };

    let client_id = portal_config().google_client_id;
    let configured = client_id.is_some();
    let ready = Memo::new(move |_| flow.with(|f| matches!(f.phase(), InvitationPhase::Ready { .. })));
    let button_rendered = StoredValue::new(false);
    Effect::new(move |_| {
        if !ready.get() || button_rendered.get_value() {
            return;
        }
        match &client_id {
            Some(client_id) => {
                button_rendered.set_value(true);
                google_identity::render_button(BUTTON_CONTAINER_ID, client_id, on_credential.clone());
            }
            None => log::error!("OKR_GOOGLE_CLIENT_ID is not set; invitation sign-in unavailable"),
        }
    });

    let details = move || {
        flow.with(|f| match f.phase() {
            InvitationPhase::Invalid { message } => view! {
                <div class="invite-card invite-card--error">
                    <h2>"Invitation unavailable"</h2>
                    <p>{message.clone()}</p>
                    <a class="login-button" href=AppRoute::login().href()>"Go to login"</a>
                </div>
            }
            .into_any(),
            InvitationPhase::Ready { invitation, notice } => view! {
                <div class="invite-card">
                    <h2>"You're invited"</h2>
                    <p>"Invited email: " <strong>{invitation.email.clone()}</strong></p>
                    <p>"Role: " <strong>{invitation.role.clone()}</strong></p>
                    {notice.clone().map(|text| view! { <p class="login-message login-message--error">{text}</p> })}
                    {(!configured).then(|| view! { <p class="login-message">"Google sign-in is not configured."</p> })}
                </div>
            }
            .into_any(),
            phase => view! { <p class="invite-status">{status_text(phase)}</p> }.into_any(),
        })
    };

    view! {
        <div class="login-page">
            <div class="login-card" aria-busy=move || flow.with(InvitationFlow::is_busy).to_string()>
                <h1>"OKR Portal"</h1>
                {details}
                <div
                    id=BUTTON_CONTAINER_ID
                    class="invite-google-button"
                    style:display=move || if ready.get() { "flex" } else { "none" }
                ></div>
            </div>
        </div>
    }
}
