//! Unified action result.
//!
//! DESIGN
//! ======
//! Every action returns `ActionResult<T>`. On the wire the result travels as an
//! [`Envelope`]: `{"ok": ...}` on success, `{"error": "<kind>", "message": ...}`
//! on failure. Callers decide per call site whether a failure is surfaced to
//! the user or only logged.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// Failure category of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected by the form rules before reaching the remote service.
    Validation,
    /// The remote service rejected credentials or the session is missing.
    Auth,
    /// A table query or mutation failed.
    Data,
    /// A blob storage write failed.
    Upload,
    /// The action endpoint itself could not be reached or decoded.
    Network,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::Data => "data",
            Self::Upload => "upload",
            Self::Network => "network",
        }
    }
}

/// Failure returned by an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ActionError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    #[must_use]
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    #[must_use]
    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upload, message)
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }
}

pub type ActionResult<T> = Result<T, ActionError>;

/// Wire form of an [`ActionResult`].
///
/// The error arm is listed first: with `T = Option<_>` an untagged decode
/// would otherwise accept an error body as `{"ok": null}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Err { error: ErrorKind, message: String },
    Ok { ok: T },
}

impl<T> Envelope<T> {
    /// Convert the envelope back into a result.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ActionError`] for the error arm.
    pub fn into_result(self) -> ActionResult<T> {
        match self {
            Self::Ok { ok } => Ok(ok),
            Self::Err { error, message } => Err(ActionError::new(error, message)),
        }
    }
}

impl<T> From<ActionResult<T>> for Envelope<T> {
    fn from(result: ActionResult<T>) -> Self {
        match result {
            Ok(ok) => Self::Ok { ok },
            Err(e) => Self::Err { error: e.kind, message: e.message },
        }
    }
}
