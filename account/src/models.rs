//! Request and record shapes exchanged across the action boundary.

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// Opaque table row (posts, likes). No mutation logic targets these.
pub type Row = serde_json::Value;

/// Email + password sign-in form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Registration form. The nickname travels as sign-up metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

/// Identity fields carried by a "signed in" notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

/// The remote session's user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl User {
    /// Nickname supplied at sign-up, if the provider echoed it back.
    #[must_use]
    pub fn nickname(&self) -> Option<&str> {
        self.user_metadata.get("nickname").and_then(serde_json::Value::as_str)
    }
}

/// One `user_info` row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    #[serde(default)]
    pub user_nickname: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicknameUpdate {
    pub nickname: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUrlUpdate {
    pub url: String,
}

/// Public URL of an uploaded avatar blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUrl {
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}

/// Provider redirect URL for a third-party sign-in. The caller navigates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthStart {
    pub url: String,
}

/// Top-level views an action may send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Login,
    Signup,
    MyPage,
}

impl View {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::MyPage => "/mypage",
        }
    }
}

/// Navigation side effect returned by an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigate {
    pub to: String,
}

impl From<View> for Navigate {
    fn from(view: View) -> Self {
        Self { to: view.path().to_owned() }
    }
}

/// Successful sign-in: the session to mirror client-side and where to go next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub session: SessionPayload,
    pub navigate: Navigate,
}
