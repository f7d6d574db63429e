//! Client state containers.
//!
//! Plain values held in `RwSignal` contexts (`session`, `modal`) or owned by a
//! component (`profile_image`), plus the app-wide session sync service.

pub mod modal;
pub mod profile_image;
pub mod session;
pub mod session_sync;
