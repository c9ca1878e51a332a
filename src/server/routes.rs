//! Route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServiceState>`.
//! Failures render through the `WeatherError` taxonomy so every path
//! yields a structured body with the right status code.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;

use crate::report;
use crate::types::WeatherError;
use crate::upstream::CurrentWeatherFetch;

/// Service name reported by the static endpoints.
pub const SERVICE_NAME: &str = "weathergate";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
///
/// Immutable after startup; nothing here is mutated across requests.
pub struct ServiceState {
    pub fetcher: Arc<dyn CurrentWeatherFetch>,
}

pub type AppState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
    pub example: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    pub city: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn home() -> Json<InfoResponse> {
    let mut endpoints = BTreeMap::new();
    endpoints.insert(
        "GET /".to_string(),
        "Service information".to_string(),
    );
    endpoints.insert(
        "GET /weather?city=<city>".to_string(),
        "Current weather for a city".to_string(),
    );
    endpoints.insert(
        "GET /health".to_string(),
        "Service health status".to_string(),
    );

    Json(InfoResponse {
        message: "Weathergate - current weather lookup by city".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
        example: "/weather?city=Buenos Aires".to_string(),
    })
}

/// GET /weather?city=<name>
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Response {
    let city = params.city.unwrap_or_default();
    match report::lookup(&city, state.fetcher.as_ref(), Utc::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        service: SERVICE_NAME.to_string(),
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    WeatherError::RouteNotFound.into_response()
}

/// Render an uncaught handler panic as a generic 500 body.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "Unhandled panic in request handler");
    WeatherError::Internal.into_response()
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
