//! Server configuration parsed from environment variables.
//!
//! Required:
//! - `SUPABASE_URL`: base URL of the remote identity & data service
//! - `SUPABASE_ANON_KEY`: public API key sent as `apikey` on every call
//!
//! Optional:
//! - `OAUTH_REDIRECT_URL`: where the OAuth provider lands (default local callback)
//! - `PORT`: default 3000
//! - `COOKIE_SECURE`: bool; inferred from an `https://` redirect URL when unset
//! - `REMOTE_REQUEST_TIMEOUT_SECS`: default 30
//! - `REMOTE_CONNECT_TIMEOUT_SECS`: default 10
//! - `MAX_UPLOAD_BYTES`: request body cap for avatar uploads, default 50 MiB

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_OAUTH_REDIRECT_URL: &str = "http://localhost:3000/login/callback";
pub const DEFAULT_REMOTE_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REMOTE_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Connection settings for the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
    pub timeouts: RemoteTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub oauth_redirect_url: String,
    pub port: u16,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or `PORT` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required("SUPABASE_URL")?.trim_end_matches('/').to_owned();
        let anon_key = required("SUPABASE_ANON_KEY")?;

        let oauth_redirect_url =
            std::env::var("OAUTH_REDIRECT_URL").unwrap_or_else(|_| DEFAULT_OAUTH_REDIRECT_URL.to_owned());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };
        let cookie_secure =
            env_bool("COOKIE_SECURE").unwrap_or_else(|| oauth_redirect_url.starts_with("https://"));

        let timeouts = RemoteTimeouts {
            request_secs: env_parse("REMOTE_REQUEST_TIMEOUT_SECS", DEFAULT_REMOTE_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("REMOTE_CONNECT_TIMEOUT_SECS", DEFAULT_REMOTE_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self {
            remote: RemoteConfig { url, anon_key, timeouts },
            oauth_redirect_url,
            port,
            cookie_secure,
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => Err(ConfigError::Missing(var)),
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
