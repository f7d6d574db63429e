//! Provider-neutral remote types and the service trait.

use account::{Row, SessionPayload, User};

use super::query::Query;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by remote service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request did not complete.
    #[error("remote request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status. `message` is the
    /// provider's own text (e.g. "Invalid login credentials").
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized.
    #[error("remote response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A request URL could not be assembled from the configured base.
    #[error("invalid remote url: {0}")]
    Url(String),
}

impl RemoteError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Session issued by the auth service.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds, when reported.
    pub expires_in: Option<i64>,
    pub user: User,
}

impl RemoteSession {
    /// Identity fields mirrored by the client session store.
    #[must_use]
    pub fn payload(&self) -> SessionPayload {
        SessionPayload {
            user_id: self.user.id.clone(),
            email: self.user.email.clone().unwrap_or_default(),
            access_token: self.access_token.clone(),
        }
    }
}

/// Blob write options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    pub cache_control_secs: u32,
    /// Overwrite an existing object at the same key instead of failing.
    pub upsert: bool,
}

// =============================================================================
// SERVICE TRAIT
// =============================================================================

/// The managed backend: credentials, sessions, tables and blob storage.
///
/// `access_token` arguments carry the caller's session so row-level rules on
/// the remote side apply to the right user.
#[async_trait::async_trait]
pub trait RemoteService: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<RemoteSession, RemoteError>;

    /// Register a new identity. Returns a session when the provider signs the
    /// new account in immediately.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<Option<RemoteSession>, RemoteError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), RemoteError>;

    /// Build the third-party authorization URL. Makes no request.
    fn authorize_url(&self, provider: &str, redirect_to: &str, code_challenge: &str) -> Result<String, RemoteError>;

    /// Exchange an OAuth callback code for a session.
    async fn exchange_code(&self, auth_code: &str, code_verifier: &str) -> Result<RemoteSession, RemoteError>;

    /// Trade a refresh token for a fresh session. The old refresh token is spent.
    async fn refresh_session(&self, refresh_token: &str) -> Result<RemoteSession, RemoteError>;

    async fn get_user(&self, access_token: &str) -> Result<User, RemoteError>;

    async fn select(&self, access_token: &str, table: &str, query: &Query) -> Result<Vec<Row>, RemoteError>;

    /// Patch every row matching `query`, returning the updated rows.
    async fn update(
        &self,
        access_token: &str,
        table: &str,
        query: &Query,
        patch: serde_json::Value,
    ) -> Result<Vec<Row>, RemoteError>;

    async fn upload(
        &self,
        access_token: &str,
        bucket: &str,
        path: &str,
        body: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), RemoteError>;

    /// Public URL of an object. Makes no request.
    fn public_url(&self, bucket: &str, path: &str) -> Result<String, RemoteError>;
}
