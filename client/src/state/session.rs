//! Client session store: the signed-in identity for this tab.
//!
//! DESIGN
//! ======
//! The store is a plain value held in an `RwSignal` context. It changes only
//! through [`SessionState::apply`], fed by session notifications from
//! [`SessionSync`](super::session_sync::SessionSync). Default is logged out.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use account::SessionPayload;

/// Identity of the current browser user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub is_authenticated: bool,
}

/// Remote auth-state notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session found (or not) when the app starts.
    InitialSession(Option<SessionPayload>),
    SignedIn(SessionPayload),
    SignedOut,
    /// A new access token for the same user.
    TokenRefreshed(String),
}

impl SessionState {
    /// The single update entry point.
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::SignedIn(payload) | SessionEvent::InitialSession(Some(payload)) => {
                self.id.clone_from(&payload.user_id);
                self.email.clone_from(&payload.email);
                self.access_token.clone_from(&payload.access_token);
                self.is_authenticated = true;
            }
            SessionEvent::SignedOut | SessionEvent::InitialSession(None) => *self = Self::default(),
            SessionEvent::TokenRefreshed(token) => {
                if self.is_authenticated {
                    self.access_token.clone_from(token);
                }
            }
        }
    }

    /// Notification that brings this store in line with a freshly fetched
    /// server session. `None` when nothing changed.
    #[must_use]
    pub fn reconcile(&self, fetched: Option<SessionPayload>) -> Option<SessionEvent> {
        match fetched {
            None if self.is_authenticated => Some(SessionEvent::SignedOut),
            None => None,
            Some(payload) if self.is_authenticated && payload.user_id == self.id => {
                (payload.access_token != self.access_token).then(|| SessionEvent::TokenRefreshed(payload.access_token))
            }
            Some(payload) => Some(SessionEvent::SignedIn(payload)),
        }
    }

    /// User id while signed in.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.is_authenticated.then_some(self.id.as_str())
    }
}
