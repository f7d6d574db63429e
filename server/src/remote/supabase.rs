//! HTTP client for the managed backend (auth, REST tables, object storage).
//!
//! Thin wrapper over three provider APIs sharing one base URL:
//! - `/auth/v1/*`    sessions and users
//! - `/rest/v1/*`    table rows, filtered by query parameters
//! - `/storage/v1/*` blob objects
//!
//! Pure helpers (`endpoint`, `error_message`, `parse_session`, `parse_sign_up`)
//! carry the wire details so they can be tested without a network.

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;

use std::time::Duration;

use account::{Row, User};
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use super::query::Query;
use super::types::{RemoteError, RemoteService, RemoteSession, UploadOptions};
use crate::config::RemoteConfig;

const OAUTH_CHALLENGE_METHOD: &str = "plain";

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    base: Url,
    anon_key: String,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client fails to build.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RemoteError::HttpClientBuild(e.to_string()))?;
        let base = Url::parse(&config.url).map_err(|e| RemoteError::Url(format!("{}: {e}", config.url)))?;
        Ok(Self { http, base, anon_key: config.anon_key.clone() })
    }

    /// Requests carry the project key; `Authorization` is the user's token or,
    /// for anonymous calls, the project key again.
    fn request(&self, method: Method, url: Url, access_token: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    async fn send(request: RequestBuilder) -> Result<String, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        if !status.is_success() {
            let status = status.as_u16();
            return Err(RemoteError::Api { status, message: error_message(&text, status) });
        }
        Ok(text)
    }

    fn token_url(&self, grant_type: &str) -> Result<Url, RemoteError> {
        let mut url = endpoint(&self.base, ["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    fn rest_url(&self, table: &str) -> Result<Url, RemoteError> {
        endpoint(&self.base, ["rest", "v1", table])
    }
}

#[async_trait::async_trait]
impl RemoteService for SupabaseClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<RemoteSession, RemoteError> {
        let url = self.token_url("password")?;
        let body = Self::send(
            self.request(Method::POST, url, None)
                .json(&json!({ "email": email, "password": password })),
        )
        .await?;
        parse_session(&body)
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> Result<Option<RemoteSession>, RemoteError> {
        let url = endpoint(&self.base, ["auth", "v1", "signup"])?;
        let body = Self::send(
            self.request(Method::POST, url, None)
                .json(&json!({ "email": email, "password": password, "data": metadata })),
        )
        .await?;
        parse_sign_up(&body)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), RemoteError> {
        let url = endpoint(&self.base, ["auth", "v1", "logout"])?;
        Self::send(self.request(Method::POST, url, Some(access_token))).await?;
        Ok(())
    }

    fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> Result<String, RemoteError> {
        let mut url = endpoint(&self.base, ["auth", "v1", "authorize"])?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", OAUTH_CHALLENGE_METHOD);
        Ok(url.into())
    }

    async fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> Result<RemoteSession, RemoteError> {
        let url = self.token_url("pkce")?;
        let body = Self::send(
            self.request(Method::POST, url, None)
                .json(&json!({ "auth_code": auth_code, "code_verifier": code_verifier })),
        )
        .await?;
        parse_session(&body)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<RemoteSession, RemoteError> {
        let url = self.token_url("refresh_token")?;
        let body = Self::send(
            self.request(Method::POST, url, None)
                .json(&json!({ "refresh_token": refresh_token })),
        )
        .await?;
        parse_session(&body)
    }

    async fn get_user(&self, access_token: &str) -> Result<User, RemoteError> {
        let url = endpoint(&self.base, ["auth", "v1", "user"])?;
        let body = Self::send(self.request(Method::GET, url, Some(access_token))).await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))
    }

    async fn select(&self, access_token: &str, table: &str, query: &Query) -> Result<Vec<Row>, RemoteError> {
        let url = self.rest_url(table)?;
        let body = Self::send(
            self.request(Method::GET, url, Some(access_token))
                .query(&query.to_params()),
        )
        .await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))
    }

    async fn update(
        &self,
        access_token: &str,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Row>, RemoteError> {
        let url = self.rest_url(table)?;
        let body = Self::send(
            self.request(Method::PATCH, url, Some(access_token))
                .header("Prefer", "return=representation")
                .query(&query.to_params())
                .json(&patch),
        )
        .await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))
    }

    async fn upload(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        body: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), RemoteError> {
        let url = endpoint(&self.base, ["storage", "v1", "object", bucket].into_iter().chain(object_segments(path)))?;
        Self::send(
            self.request(Method::POST, url, Some(access_token))
                .header("x-upsert", if options.upsert { "true" } else { "false" })
                .header("cache-control", format!("max-age={}", options.cache_control_secs))
                .header("content-type", &options.content_type)
                .body(body),
        )
        .await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String, RemoteError> {
        let url = endpoint(
            &self.base,
            ["storage", "v1", "object", "public", bucket]
                .into_iter()
                .chain(object_segments(path)),
        )?;
        Ok(url.into())
    }
}

// =============================================================================
// WIRE HELPERS
// =============================================================================

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, RemoteError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| RemoteError::Url(format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Object keys are `/`-separated; empty segments (leading slash) are dropped.
fn object_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Pull the human-readable message out of a provider error body.
pub(crate) fn error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                if !message.is_empty() {
                    return message.to_owned();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("remote service returned status {status}")
    } else {
        trimmed.to_owned()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: User,
}

impl From<TokenResponse> for RemoteSession {
    fn from(t: TokenResponse) -> Self {
        Self { access_token: t.access_token, refresh_token: t.refresh_token, expires_in: t.expires_in, user: t.user }
    }
}

pub(crate) fn parse_session(body: &str) -> Result<RemoteSession, RemoteError> {
    let token: TokenResponse = serde_json::from_str(body).map_err(|e| RemoteError::Parse(e.to_string()))?;
    Ok(token.into())
}

/// Sign-up answers with a session when the account is confirmed on the spot,
/// with a bare user otherwise.
pub(crate) fn parse_sign_up(body: &str) -> Result<Option<RemoteSession>, RemoteError> {
    let value: Value = serde_json::from_str(body).map_err(|e| RemoteError::Parse(e.to_string()))?;
    let session = if value.get("access_token").is_some() {
        Some(value)
    } else {
        value.get("session").filter(|s| !s.is_null()).cloned()
    };
    session
        .map(|s| {
            serde_json::from_value::<TokenResponse>(s)
                .map(RemoteSession::from)
                .map_err(|e| RemoteError::Parse(e.to_string()))
        })
        .transpose()
}
