//! Shared account model for the action boundary.
//!
//! This crate owns the request/response shapes used by both `server` and
//! `client`: login/signup inputs, profile rows, the unified action result
//! envelope, and the form rules that gate submission on either side.

pub mod error;
pub mod models;
pub mod validation;

pub use error::{ActionError, ActionResult, Envelope, ErrorKind};
pub use models::{
    AvatarUrlUpdate, LoginInput, LoginOutcome, Navigate, NicknameUpdate, OAuthStart, PublicUrl, Row, SessionPayload,
    SignupInput, User, UserInfo, View,
};
pub use validation::{Field, FieldErrors};
