mod config;
mod remote;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let remote = remote::SupabaseClient::new(&config.remote).expect("remote client init failed");
    tracing::info!(url = %config.remote.url, "remote service configured");

    let port = config.port;
    let state = state::AppState::new(Arc::new(remote), config);

    let app = routes::leptos_app(state).expect("leptos app init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "ecostep listening");
    axum::serve(listener, app).await.expect("server failed");
}
