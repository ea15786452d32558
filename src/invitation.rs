//! Invitation acceptance flow.
//!
//! An invited user lands on `/invite/accept/{token}`. The page verifies the
//! token, has the user sign in with Google out-of-band, checks that the Google
//! identity is the invited address, and exchanges everything for a session.
//!
//! The credential is decoded without verifying its signature; the backend
//! re-checks it when the invitation is accepted.
//!
//! [`InvitationFlow`] holds the page state and its transitions; the network
//! calls are separate free functions so the state machine stays synchronous.

#[cfg(test)]
#[path = "invitation_test.rs"]
mod invitation_test;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::gateway::{ApiClient, ApiError, Navigator, Transport};
use crate::routes::AppRoute;
use crate::session::{SessionStorage, SessionStore, SessionUser, deserialize_text};

pub const VERIFY_FAILED: &str = "Failed to verify invitation";
pub const INVALID_INVITATION: &str = "Invalid invitation";
pub const ACCEPT_FAILED: &str = "Failed to accept invitation";
pub const PROVIDER_FAILED: &str = "Google sign-in failed";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvitationError {
    #[error("credential is not a JWT")]
    MalformedCredential,
    #[error("credential payload is not valid base64")]
    PayloadEncoding,
    #[error("credential payload is not valid JSON: {0}")]
    PayloadJson(String),
    #[error("Please sign in with {required} to accept this invitation")]
    EmailMismatch { required: String },
}

/// Pending onboarding offer returned by the verify endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub role: String,
}

/// Identity claims read from the provider's ID token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialIdentity {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Body of `POST /api/invitations/accept`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AcceptInvitation {
    pub token: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Response of `POST /api/invitations/accept`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AcceptedSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
}

/// Read the claims of a JWT without checking its signature.
///
/// # Errors
///
/// Returns an error when the token has no payload segment or the payload is
/// not base64-encoded JSON.
pub fn decode_credential(credential: &str) -> Result<CredentialIdentity, InvitationError> {
    let payload = credential.split('.').nth(1).filter(|p| !p.is_empty());
    let payload = payload.ok_or(InvitationError::MalformedCredential)?;
    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| InvitationError::PayloadEncoding)?;
    serde_json::from_slice(&bytes).map_err(|e| InvitationError::PayloadJson(e.to_string()))
}

/// The signed-in identity must be exactly the invited address.
///
/// The comparison is byte-for-byte: `A@x.com` does not match `a@x.com`.
///
/// # Errors
///
/// Returns [`InvitationError::EmailMismatch`] naming the required address.
pub fn check_identity(invitation: &Invitation, identity: &CredentialIdentity) -> Result<(), InvitationError> {
    if identity.email == invitation.email {
        Ok(())
    } else {
        Err(InvitationError::EmailMismatch { required: invitation.email.clone() })
    }
}

fn verify_endpoint(token: &str) -> String {
    format!("/api/invitations/verify/{token}")
}

const ACCEPT_ENDPOINT: &str = "/api/invitations/accept";

/// `GET /api/invitations/verify/{token}`.
///
/// # Errors
///
/// Propagates [`ApiError`] from the gateway.
pub async fn verify_invitation<T, S, N>(api: &ApiClient<T, S, N>, token: &str) -> Result<Invitation, ApiError>
where
    T: Transport,
    S: SessionStorage,
    N: Navigator,
{
    api.get_json(&verify_endpoint(token)).await
}

/// `POST /api/invitations/accept`.
///
/// # Errors
///
/// Propagates [`ApiError`] from the gateway.
pub async fn accept_invitation<T, S, N>(
    api: &ApiClient<T, S, N>,
    request: &AcceptInvitation,
) -> Result<AcceptedSession, ApiError>
where
    T: Transport,
    S: SessionStorage,
    N: Navigator,
{
    api.post_json(ACCEPT_ENDPOINT, request).await
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvitationPhase {
    Verifying,
    /// Waiting for the user to sign in. `notice` holds the last recoverable error.
    Ready { invitation: Invitation, notice: Option<String> },
    Accepting { invitation: Invitation },
    /// Terminal: the token could not be verified.
    Invalid { message: String },
    Accepted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvitationFlow {
    token: String,
    phase: InvitationPhase,
}

impl InvitationFlow {
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self { token: token.to_owned(), phase: InvitationPhase::Verifying }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn phase(&self) -> &InvitationPhase {
        &self.phase
    }

    #[must_use]
    pub fn invitation(&self) -> Option<&Invitation> {
        match &self.phase {
            InvitationPhase::Ready { invitation, .. } | InvitationPhase::Accepting { invitation } => Some(invitation),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, InvitationPhase::Verifying | InvitationPhase::Accepting { .. })
    }

    /// Apply the verify response.
    pub fn on_verified(&mut self, result: Result<Invitation, ApiError>) {
        self.phase = match result {
            Ok(invitation) => InvitationPhase::Ready { invitation, notice: None },
            Err(e) => {
                log::warn!("invitation verification failed: {e}");
                let fallback = match &e {
                    ApiError::Network(_) | ApiError::Decode(_) => VERIFY_FAILED,
                    _ => INVALID_INVITATION,
                };
                InvitationPhase::Invalid { message: e.user_message(fallback) }
            }
        };
    }

    /// Take the provider credential and, if it names the invited address,
    /// build the accept request and move to `Accepting`.
    ///
    /// # Errors
    ///
    /// Returns the notice to display when the flow cannot proceed; the flow
    /// stays ready so the user can sign in again.
    pub fn begin_accept(&mut self, credential: &str) -> Result<AcceptInvitation, String> {
        let InvitationPhase::Ready { invitation, .. } = &self.phase else {
            return Err(INVALID_INVITATION.to_owned());
        };
        let invitation = invitation.clone();

        let checked = decode_credential(credential).and_then(|identity| {
            check_identity(&invitation, &identity)?;
            Ok(identity)
        });
        match checked {
            Ok(identity) => {
                self.phase = InvitationPhase::Accepting { invitation };
                Ok(AcceptInvitation {
                    token: self.token.clone(),
                    email: identity.email,
                    name: identity.name,
                    picture: identity.picture,
                })
            }
            Err(e) => {
                let notice = if matches!(e, InvitationError::EmailMismatch { .. }) {
                    e.to_string()
                } else {
                    log::warn!("unusable sign-in credential: {e}");
                    ACCEPT_FAILED.to_owned()
                };
                self.phase = InvitationPhase::Ready { invitation, notice: Some(notice.clone()) };
                Err(notice)
            }
        }
    }

    /// Apply the accept response. On success the session is committed and
    /// the dashboard route is returned.
    pub fn on_accepted<S: SessionStorage>(
        &mut self,
        store: &SessionStore<S>,
        result: Result<AcceptedSession, ApiError>,
    ) -> Option<AppRoute> {
        let invitation = self.invitation().cloned()?;
        let failure = match result {
            Ok(accepted) => {
                match store.commit(&accepted.access_token, accepted.refresh_token.as_deref(), &accepted.user) {
                    Ok(()) => {
                        self.phase = InvitationPhase::Accepted;
                        return Some(AppRoute::Dashboard);
                    }
                    Err(e) => {
                        log::warn!("could not store invited session: {e}");
                        ACCEPT_FAILED.to_owned()
                    }
                }
            }
            Err(e) => {
                log::warn!("invitation acceptance failed: {e}");
                e.user_message(ACCEPT_FAILED)
            }
        };
        self.phase = InvitationPhase::Ready { invitation, notice: Some(failure) };
        None
    }

    /// The provider reported a failed sign-in.
    pub fn on_provider_error(&mut self) {
        if let Some(invitation) = self.invitation().cloned() {
            self.phase = InvitationPhase::Ready { invitation, notice: Some(PROVIDER_FAILED.to_owned()) };
        }
    }
}
