//! Auth routes: password login, sign-up, logout, Kakao OAuth, session lookup.
//!
//! The remote session lives in HttpOnly cookies; the browser never sees the
//! refresh token. The OAuth verifier rides in its own short-lived cookie
//! between `/api/auth/kakao` and `/login/callback`. Once the access cookie
//! lapses, [`refresh_session`] renews it from the refresh cookie on the next
//! request.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use account::{
    ActionError, ActionResult, LoginInput, LoginOutcome, Navigate, OAuthStart, SessionPayload, SignupInput, User, View,
};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderValue;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::Reply;
use super::extract::{ApiJson, ApiQuery};
use crate::remote::RemoteSession;
use crate::services::auth as auth_svc;
use crate::state::AppState;

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";
pub const VERIFIER_COOKIE: &str = "sb-code-verifier";

const VERIFIER_TTL_MINUTES: i64 = 10;
const LOGIN_REQUIRED: &str = "로그인이 필요합니다.";

// =============================================================================
// COOKIES
// =============================================================================

fn cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut c = cookie(name, String::new(), secure);
    c.set_max_age(Duration::ZERO);
    c
}

/// Store the session tokens. The access cookie expires with the token.
pub(crate) fn with_session(jar: CookieJar, session: &RemoteSession, secure: bool) -> CookieJar {
    let mut access = cookie(ACCESS_COOKIE, session.access_token.clone(), secure);
    if let Some(secs) = session.expires_in {
        access.set_max_age(Duration::seconds(secs));
    }
    jar.add(access)
        .add(cookie(REFRESH_COOKIE, session.refresh_token.clone(), secure))
}

pub(crate) fn without_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(expired(ACCESS_COOKIE, secure))
        .add(expired(REFRESH_COOKIE, secure))
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Access token from the session cookie, if any.
pub(crate) fn access_token(jar: &CookieJar) -> Option<String> {
    cookie_value(jar, ACCESS_COOKIE)
}

/// True when the response already sets (or expires) cookie `name`.
fn sets_cookie(response: &Response, name: &str) -> bool {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().is_ok_and(|s| s.starts_with(&prefix)))
}

/// Rewrite the request's `Cookie` header from `jar`.
fn replace_request_cookies(req: &mut Request, jar: &CookieJar) {
    let header = jar
        .iter()
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect::<Vec<_>>()
        .join("; ");
    req.headers_mut().remove(COOKIE);
    if let Ok(value) = HeaderValue::from_str(&header) {
        req.headers_mut().insert(COOKIE, value);
    }
}

// =============================================================================
// SESSION REFRESH
// =============================================================================

/// Renew the session when the access cookie is gone but a refresh cookie is
/// still held. `None` when there is nothing to renew.
pub(crate) async fn renew(state: &AppState, jar: &CookieJar) -> Option<ActionResult<RemoteSession>> {
    if access_token(jar).is_some() {
        return None;
    }
    let refresh = cookie_value(jar, REFRESH_COOKIE)?;
    Some(auth_svc::refresh(state.remote.as_ref(), &refresh).await)
}

/// Middleware: trade a held refresh cookie for a new session before the
/// handler runs. The handler sees the new access token; the browser gets the
/// new cookies unless the handler set its own. A refused refresh clears them.
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let secure = state.config.cookie_secure;
    match renew(&state, &jar).await {
        None => next.run(req).await,
        Some(Ok(session)) => {
            let renewed = jar.add(Cookie::new(ACCESS_COOKIE, session.access_token.clone()));
            replace_request_cookies(&mut req, &renewed);
            let response = next.run(req).await;
            if sets_cookie(&response, ACCESS_COOKIE) {
                return response;
            }
            (with_session(CookieJar::new(), &session, secure), response).into_response()
        }
        Some(Err(_)) => {
            let response = next.run(req).await;
            if sets_cookie(&response, REFRESH_COOKIE) {
                return response;
            }
            (without_session(CookieJar::new(), secure), response).into_response()
        }
    }
}

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Access token of a signed-in caller. Handlers taking this answer 401 with
/// an `auth` envelope when the cookie is absent; the remote service decides
/// whether the token is still good.
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Reply<()>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        access_token(&jar)
            .map(Self)
            .ok_or_else(|| Reply(Err(ActionError::auth(LOGIN_REQUIRED))))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login`: sign in, set session cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Response {
    match auth_svc::login(state.remote.as_ref(), &input).await {
        Ok(auth) => {
            let jar = with_session(jar, &auth.session, state.config.cookie_secure);
            (jar, Reply(Ok(auth.outcome()))).into_response()
        }
        Err(e) => Reply::<LoginOutcome>(Err(e)).into_response(),
    }
}

/// `POST /api/auth/signup`: register; the caller logs in afterwards. Any
/// session the browser already held is cleared, whatever the outcome.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<SignupInput>,
) -> (CookieJar, Reply<Navigate>) {
    let result = auth_svc::signup(state.remote.as_ref(), &input).await;
    (without_session(jar, state.config.cookie_secure), Reply(result))
}

/// `POST /api/auth/logout`: end the session, clear cookies. Always succeeds.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Reply<Navigate>) {
    let token = access_token(&jar);
    let result = auth_svc::signout(state.remote.as_ref(), token.as_deref()).await;
    (without_session(jar, state.config.cookie_secure), Reply(result))
}

/// `POST /api/auth/kakao`: provider URL for the browser to visit.
pub async fn kakao(State(state): State<AppState>, jar: CookieJar) -> Response {
    match auth_svc::sign_in_with_kakao(state.remote.as_ref(), &state.config.oauth_redirect_url) {
        Ok(redirect) => {
            let mut verifier = cookie(VERIFIER_COOKIE, redirect.code_verifier, state.config.cookie_secure);
            verifier.set_max_age(Duration::minutes(VERIFIER_TTL_MINUTES));
            (jar.add(verifier), Reply(Ok(OAuthStart { url: redirect.url }))).into_response()
        }
        Err(e) => Reply::<OAuthStart>(Err(e)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error_description: Option<String>,
}

/// `GET /login/callback`: provider landing. Exchanges the code, sets session
/// cookies and redirects home; any failure lands on the login page.
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiQuery(params): ApiQuery<CallbackQuery>,
) -> Response {
    let secure = state.config.cookie_secure;
    let verifier = jar.get(VERIFIER_COOKIE).map(|c| c.value().to_owned());
    let jar = jar.add(expired(VERIFIER_COOKIE, secure));

    let Some(code) = params.code.as_deref() else {
        tracing::warn!(error = ?params.error_description, "oauth callback without code");
        return (jar, Redirect::temporary(View::Login.path())).into_response();
    };

    match auth_svc::complete_oauth(state.remote.as_ref(), code, verifier.as_deref()).await {
        Ok(auth) => {
            let jar = with_session(jar, &auth.session, secure);
            (jar, Redirect::temporary(&auth.navigate.to)).into_response()
        }
        Err(_) => (jar, Redirect::temporary(View::Login.path())).into_response(),
    }
}

/// `GET /api/auth/user`: current remote user, or `null`.
pub async fn user(State(state): State<AppState>, jar: CookieJar) -> Reply<Option<User>> {
    let token = access_token(&jar);
    Reply(auth_svc::get_user(state.remote.as_ref(), token.as_deref()).await)
}

/// `GET /api/auth/session`: identity for the initial session notification.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Reply<Option<SessionPayload>> {
    let token = access_token(&jar);
    Reply(auth_svc::current_session(state.remote.as_ref(), token.as_deref()).await)
}
