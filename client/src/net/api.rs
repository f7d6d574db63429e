//! REST API helpers for the action endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call answers a network error, since these
//! endpoints are only meaningful in the browser.
//!
//! Every endpoint replies with an [`Envelope`]; [`decode_envelope`] turns the
//! body back into an `ActionResult` and anything unreadable becomes a
//! network error.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use account::{
    ActionError, ActionResult, AvatarUrlUpdate, LoginInput, LoginOutcome, Navigate, NicknameUpdate,
    OAuthStart, Row, SessionPayload, SignupInput, User, UserInfo,
};
use serde::de::DeserializeOwned;

#[derive(Clone, Copy, Debug)]
enum Method {
    Get,
    Post,
    Patch,
    Put,
}

struct Call<'a> {
    method: Method,
    url: String,
    query: Option<(&'a str, &'a str)>,
    body: Option<serde_json::Value>,
}

impl<'a> Call<'a> {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), query: None, body: None }
    }

    fn query(mut self, key: &'a str, value: &'a str) -> Self {
        self.query = Some((key, value));
        self
    }

    fn json(mut self, body: &impl serde::Serialize) -> ActionResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(|e| ActionError::network(e.to_string()))?);
        Ok(self)
    }
}

fn user_endpoint(user_id: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("/api/users/{user_id}")
    } else {
        format!("/api/users/{user_id}/{suffix}")
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn unexpected_response_message(status: u16) -> String {
    format!("unexpected response: {status}")
}

/// Decode an action endpoint reply.
///
/// # Errors
///
/// Returns the carried error for an error envelope, or a network error when
/// the body is not an envelope at all.
#[cfg(any(test, feature = "hydrate"))]
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ActionResult<T> {
    match serde_json::from_str::<account::Envelope<T>>(body) {
        Ok(envelope) => envelope.into_result(),
        Err(_) => Err(ActionError::network(unexpected_response_message(status))),
    }
}

#[cfg(feature = "hydrate")]
fn network(e: gloo_net::Error) -> ActionError {
    ActionError::network(e.to_string())
}

#[cfg(feature = "hydrate")]
async fn send<T: DeserializeOwned>(request: gloo_net::http::Request) -> ActionResult<T> {
    let resp = request.send().await.map_err(network)?;
    let status = resp.status();
    let body = resp.text().await.map_err(network)?;
    decode_envelope(status, &body)
}

#[cfg(feature = "hydrate")]
async fn dispatch<T: DeserializeOwned>(call: Call<'_>) -> ActionResult<T> {
    use gloo_net::http::Request;

    let mut builder = match call.method {
        Method::Get => Request::get(&call.url),
        Method::Post => Request::post(&call.url),
        Method::Patch => Request::patch(&call.url),
        Method::Put => Request::put(&call.url),
    };
    if let Some(pair) = call.query {
        builder = builder.query([pair]);
    }
    let request = match &call.body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(network)?;
    send(request).await
}

#[cfg(not(feature = "hydrate"))]
async fn dispatch<T: DeserializeOwned>(call: Call<'_>) -> ActionResult<T> {
    let _ = (call.method, call.url, call.query, call.body);
    Err(ActionError::network("not available on server"))
}

/// `POST /api/auth/login`
///
/// # Errors
///
/// Auth error with the remote message on rejected credentials.
pub async fn login(input: &LoginInput) -> ActionResult<LoginOutcome> {
    dispatch(Call::new(Method::Post, "/api/auth/login").json(input)?).await
}

/// `POST /api/auth/signup`
///
/// # Errors
///
/// Auth error with the remote message when registration is refused.
pub async fn signup(input: &SignupInput) -> ActionResult<Navigate> {
    dispatch(Call::new(Method::Post, "/api/auth/signup").json(input)?).await
}

/// `POST /api/auth/logout`. The server always answers with the login view.
///
/// # Errors
///
/// Network error only.
pub async fn logout() -> ActionResult<Navigate> {
    dispatch(Call::new(Method::Post, "/api/auth/logout")).await
}

/// `POST /api/auth/kakao`: provider URL to navigate to.
///
/// # Errors
///
/// Auth error when the redirect cannot be built.
pub async fn kakao() -> ActionResult<OAuthStart> {
    dispatch(Call::new(Method::Post, "/api/auth/kakao")).await
}

/// `GET /api/auth/user`
///
/// # Errors
///
/// Network error only; a missing session is `Ok(None)`.
pub async fn fetch_user() -> ActionResult<Option<User>> {
    dispatch(Call::new(Method::Get, "/api/auth/user")).await
}

/// `GET /api/auth/session`
///
/// # Errors
///
/// Network error only; a missing session is `Ok(None)`.
pub async fn fetch_session() -> ActionResult<Option<SessionPayload>> {
    dispatch(Call::new(Method::Get, "/api/auth/session")).await
}

/// # Errors
///
/// Data error when the profile row is missing or unreadable.
pub async fn get_user_info(user_id: &str) -> ActionResult<UserInfo> {
    dispatch(Call::new(Method::Get, user_endpoint(user_id, ""))).await
}

/// # Errors
///
/// Validation error for a malformed nickname, data error otherwise.
pub async fn update_nickname(user_id: &str, nickname: &str) -> ActionResult<UserInfo> {
    let body = NicknameUpdate { nickname: nickname.to_owned() };
    dispatch(Call::new(Method::Patch, user_endpoint(user_id, "nickname")).json(&body)?).await
}

/// `true` when no other user holds `nickname`.
///
/// # Errors
///
/// Data error when the lookup fails.
pub async fn check_nickname_availability(user_id: &str, nickname: &str) -> ActionResult<bool> {
    let call = Call::new(Method::Get, user_endpoint(user_id, "nickname-availability")).query("nickname", nickname);
    dispatch(call).await
}

/// # Errors
///
/// Data error when the query fails.
pub async fn get_my_posts(user_id: &str) -> ActionResult<Vec<Row>> {
    dispatch(Call::new(Method::Get, user_endpoint(user_id, "posts"))).await
}

/// Liked posts, each like row carrying its embedded post.
///
/// # Errors
///
/// Data error when the query fails.
pub async fn get_like_posts(user_id: &str) -> ActionResult<Vec<Row>> {
    dispatch(Call::new(Method::Get, user_endpoint(user_id, "likes"))).await
}

/// Store the avatar URL on the profile row.
///
/// # Errors
///
/// Data error when the update fails.
pub async fn update_avatar_url(user_id: &str, url: &str) -> ActionResult<UserInfo> {
    let body = AvatarUrlUpdate { url: url.to_owned() };
    dispatch(Call::new(Method::Put, user_endpoint(user_id, "avatar-url")).json(&body)?).await
}

/// Upload `file` as the `profileImage` form field. `Ok(None)` when the server
/// received no file.
///
/// # Errors
///
/// Upload error with the storage message.
#[cfg(feature = "hydrate")]
pub async fn upload_profile_image(user_id: &str, file: &web_sys::File) -> ActionResult<Option<account::PublicUrl>> {
    let form = web_sys::FormData::new().map_err(|_| ActionError::network("form data unavailable"))?;
    form.append_with_blob_and_filename("profileImage", file, &file.name())
        .map_err(|_| ActionError::network("form data unavailable"))?;
    let request = gloo_net::http::Request::post(&user_endpoint(user_id, "avatar"))
        .body(form)
        .map_err(network)?;
    send(request).await
}
