//! Action Layer services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Each action validates its input, makes the remote call(s) it needs and
//! returns an [`ActionResult`](account::ActionResult). Failures are logged
//! where they occur; route handlers only translate results into envelopes.

pub mod auth;
pub mod user;

use account::{ActionError, ErrorKind, FieldErrors};

use crate::remote::RemoteError;

/// Map a remote failure onto the action taxonomy. A request that never got
/// an answer is a network failure whatever the action.
pub(crate) fn remote_failure(kind: ErrorKind, err: &RemoteError) -> ActionError {
    match err {
        RemoteError::Request(_) => ActionError::network(err.to_string()),
        _ => ActionError::new(kind, err.to_string()),
    }
}

pub(crate) fn invalid(errors: &FieldErrors) -> ActionError {
    ActionError::validation(errors.first().unwrap_or_default())
}
