//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the remote service behind a trait object (the HTTP client in
//! production, an in-memory fake in tests) and the loaded configuration.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::remote::RemoteService;

/// Clone is required by Axum; every field is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub remote: Arc<dyn RemoteService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>, config: AppConfig) -> Self {
        Self { remote, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
