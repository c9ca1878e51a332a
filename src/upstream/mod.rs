//! Upstream weather provider access.
//!
//! Defines the `CurrentWeatherFetch` trait and the explicit outcome
//! enumeration for the single outbound call. Handlers match on
//! `FetchError` exhaustively; no error-type downcasting.

pub mod openweathermap;

use async_trait::async_trait;

use crate::types::CurrentConditions;

/// Failure outcome of one outbound current-weather call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The provider does not know the requested city (HTTP 404).
    #[error("city not found upstream")]
    NotFound,

    /// The provider answered with any other non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The call exceeded the client timeout.
    #[error("upstream call timed out")]
    Timeout,

    /// DNS failure, connection refused, TLS failure, or any other
    /// transport-level problem before a response arrived.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The provider answered 200 but the payload did not match the
    /// expected schema.
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

/// Abstraction over the current-weather source.
///
/// The production implementation talks to OpenWeatherMap; tests
/// substitute deterministic stubs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrentWeatherFetch: Send + Sync {
    /// Fetch current conditions for a free-text city name.
    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, FetchError>;
}
