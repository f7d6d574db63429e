//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the Action Layer's JSON/multipart endpoints and stitches
//! them with Leptos SSR rendering under a single Axum router. Every action
//! answers with an [`Envelope`]; the HTTP status mirrors the error kind.

pub mod auth;
pub mod extract;
pub mod users;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::path::PathBuf;

use account::{ActionResult, Envelope, ErrorKind};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post, put};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// =============================================================================
// ENVELOPE RESPONSES
// =============================================================================

/// HTTP status for a failed action.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Auth => StatusCode::UNAUTHORIZED,
        ErrorKind::Data | ErrorKind::Upload => StatusCode::BAD_GATEWAY,
        ErrorKind::Network => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// An action result rendered as an envelope response.
pub struct Reply<T>(pub ActionResult<T>);

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Ok(_) => StatusCode::OK,
            Err(e) => status_for(e.kind),
        };
        (status, Json(Envelope::from(self.0))).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Action endpoints, the OAuth landing and the health check.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/kakao", post(auth::kakao))
        .route("/api/auth/user", get(auth::user))
        .route("/api/auth/session", get(auth::session))
        .route("/login/callback", get(auth::oauth_callback))
        .route("/api/users/{id}", get(users::user_info))
        .route("/api/users/{id}/nickname", patch(users::update_nickname))
        .route("/api/users/{id}/nickname-availability", get(users::nickname_availability))
        .route("/api/users/{id}/posts", get(users::my_posts))
        .route("/api/users/{id}/likes", get(users::like_posts))
        .route("/api/users/{id}/avatar", post(users::upload_avatar).layer(upload_limit))
        .route("/api/users/{id}/avatar-url", put(users::update_avatar_url))
        .route("/images/default-profile", get(default_profile))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), auth::refresh_session))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes + Leptos SSR pages + the site's static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[[workspace.metadata.leptos]]` section).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    // WASM/JS bundle and stylesheet under /pkg; other public assets from the
    // site root.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .fallback_service(ServeDir::new(site_root_path)))
}

const DEFAULT_PROFILE_SVG: &str = include_str!("../../../public/images/default-profile.svg");

/// Placeholder avatar for profiles without an uploaded image.
async fn default_profile() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml"), (header::CACHE_CONTROL, "public, max-age=86400")],
        DEFAULT_PROFILE_SVG,
    )
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
