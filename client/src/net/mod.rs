//! Networking: REST calls to the action endpoints.

pub mod api;
