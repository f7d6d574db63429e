//! Remote identity & data service boundary.
//!
//! ARCHITECTURE
//! ============
//! Every call to the managed backend goes through [`RemoteService`]. The
//! production implementation speaks the provider's HTTP contract
//! ([`supabase::SupabaseClient`]); tests swap in an in-memory fake that
//! records each call so "no request was made" is observable.

#[cfg(test)]
pub mod memory;
pub mod query;
pub mod supabase;
pub mod types;

pub use query::Query;
pub use supabase::SupabaseClient;
pub use types::{RemoteError, RemoteService, RemoteSession, UploadOptions};
