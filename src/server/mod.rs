//! HTTP surface — Axum server for the lookup and static endpoints.
//!
//! Routes are registered on an explicitly constructed `Router`; the
//! shared state is an immutable handle to the upstream fetcher, so no
//! process-global application object exists. CORS enabled for browser
//! consumers.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(routes::home))
        .route("/weather", get(routes::get_weather))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(routes::handle_panic))
        .layer(cors)
        .with_state(state)
}

/// Bind the listener on all interfaces and serve until the process is
/// terminated externally.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Server listening on http://0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
