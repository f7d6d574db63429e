//! Auth actions: password login, sign-up, sign-out, Kakao OAuth, current user.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::fmt::Write;

use account::validation::{validate_login, validate_signup};
use account::{
    ActionError, ActionResult, ErrorKind, LoginInput, LoginOutcome, Navigate, SessionPayload, SignupInput, User, View,
};
use rand::Rng;
use serde_json::json;

use super::{invalid, remote_failure};
use crate::remote::{RemoteService, RemoteSession};

pub const KAKAO_PROVIDER: &str = "kakao";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Random 32-byte hex PKCE verifier (64 chars, inside the 43..=128 range).
#[must_use]
pub fn generate_code_verifier() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// A session the route layer turns into cookies, plus where to send the user.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub session: RemoteSession,
    pub navigate: Navigate,
}

impl Authenticated {
    #[must_use]
    pub fn outcome(&self) -> LoginOutcome {
        LoginOutcome { session: self.session.payload(), navigate: self.navigate.clone() }
    }
}

/// Provider URL to send the browser to, and the verifier the callback needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub url: String,
    pub code_verifier: String,
}

/// Sign in with email and password; on success the caller goes home.
///
/// # Errors
///
/// `Validation` for a malformed form (no remote call), `Auth` carrying the
/// provider's message when the credentials are rejected.
pub async fn login(remote: &dyn RemoteService, input: &LoginInput) -> ActionResult<Authenticated> {
    validate_login(input).map_err(|e| invalid(&e))?;

    let session = remote
        .sign_in_with_password(&input.email, &input.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "password sign-in rejected");
            remote_failure(ErrorKind::Auth, &e)
        })?;

    tracing::info!(user_id = %session.user.id, "signed in");
    Ok(Authenticated { session, navigate: View::Home.into() })
}

/// Register an account, then revoke whatever session the provider opened so
/// the new user has to log in explicitly.
///
/// # Errors
///
/// `Validation` for a malformed form, `Auth` when the provider refuses the
/// registration (e.g. the address is taken).
pub async fn signup(remote: &dyn RemoteService, input: &SignupInput) -> ActionResult<Navigate> {
    validate_signup(input).map_err(|e| invalid(&e))?;

    let session = remote
        .sign_up(&input.email, &input.password, json!({ "nickname": input.nickname }))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "sign-up rejected");
            remote_failure(ErrorKind::Auth, &e)
        })?;

    if let Some(session) = session {
        if let Err(e) = remote.sign_out(&session.access_token).await {
            tracing::warn!(error = %e, user_id = %session.user.id, "revoking sign-up session failed");
        }
    }
    Ok(View::Login.into())
}

/// End the session. Always lands on the login view; remote errors are logged.
///
/// # Errors
///
/// Never fails.
pub async fn signout(remote: &dyn RemoteService, access_token: Option<&str>) -> ActionResult<Navigate> {
    if let Some(token) = access_token.filter(|t| !t.is_empty()) {
        if let Err(e) = remote.sign_out(token).await {
            tracing::warn!(error = %e, "sign-out failed");
        }
    }
    Ok(View::Login.into())
}

/// Start the Kakao flow. Returns the provider URL; the caller navigates.
///
/// # Errors
///
/// `Auth` if the authorization URL cannot be built.
pub fn sign_in_with_kakao(remote: &dyn RemoteService, redirect_to: &str) -> ActionResult<OAuthRedirect> {
    let code_verifier = generate_code_verifier();
    let url = remote
        .authorize_url(KAKAO_PROVIDER, redirect_to, &code_verifier)
        .map_err(|e| {
            tracing::error!(error = %e, "building oauth url failed");
            remote_failure(ErrorKind::Auth, &e)
        })?;
    Ok(OAuthRedirect { url, code_verifier })
}

/// Finish the OAuth redirect: trade the callback code for a session.
///
/// # Errors
///
/// `Auth` when the verifier is missing or the provider rejects the code.
pub async fn complete_oauth(
    remote: &dyn RemoteService,
    auth_code: &str,
    code_verifier: Option<&str>,
) -> ActionResult<Authenticated> {
    let Some(code_verifier) = code_verifier.filter(|v| !v.is_empty()) else {
        tracing::warn!("oauth callback without code verifier");
        return Err(ActionError::auth("missing oauth code verifier"));
    };

    let session = remote.exchange_code(auth_code, code_verifier).await.map_err(|e| {
        tracing::warn!(error = %e, "oauth code exchange failed");
        remote_failure(ErrorKind::Auth, &e)
    })?;

    tracing::info!(user_id = %session.user.id, "signed in via oauth");
    Ok(Authenticated { session, navigate: View::Home.into() })
}

/// Renew a session whose access token is gone, from its refresh token.
///
/// # Errors
///
/// `Auth` when the refresh token is empty, spent or revoked.
pub async fn refresh(remote: &dyn RemoteService, refresh_token: &str) -> ActionResult<RemoteSession> {
    if refresh_token.is_empty() {
        return Err(ActionError::auth("missing refresh token"));
    }
    let session = remote.refresh_session(refresh_token).await.map_err(|e| {
        tracing::warn!(error = %e, "session refresh failed");
        remote_failure(ErrorKind::Auth, &e)
    })?;
    tracing::debug!(user_id = %session.user.id, "session refreshed");
    Ok(session)
}

/// Current session user, or `None`. Remote errors are logged, not returned.
///
/// # Errors
///
/// Never fails.
pub async fn get_user(remote: &dyn RemoteService, access_token: Option<&str>) -> ActionResult<Option<User>> {
    let Some(token) = access_token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match remote.get_user(token).await {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            tracing::warn!(error = %e, "get user failed");
            Ok(None)
        }
    }
}

/// Identity for the initial session notification.
///
/// # Errors
///
/// Never fails; an unknown token yields `None`.
pub async fn current_session(
    remote: &dyn RemoteService,
    access_token: Option<&str>,
) -> ActionResult<Option<SessionPayload>> {
    let user = get_user(remote, access_token).await?;
    Ok(user.zip(access_token).map(|(user, token)| SessionPayload {
        user_id: user.id,
        email: user.email.unwrap_or_default(),
        access_token: token.to_owned(),
    }))
}
