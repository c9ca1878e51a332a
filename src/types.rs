//! Shared types for the weathergate service.
//!
//! These types form the data model used across all modules: the
//! provider-independent view of an upstream observation, the normalized
//! response schema, and the client-facing failure taxonomy.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Upstream observation
// ---------------------------------------------------------------------------

/// Provider-independent view of a current-weather observation.
///
/// Produced by an upstream client from a successful (HTTP 200) fetch,
/// never partially filled. Temperatures are in the configured units
/// (metric by default), visibility in metres when reported.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub city: String,
    /// ISO 3166 country code, e.g. "AR".
    pub country: String,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Free-text condition description as reported upstream.
    pub description: String,
    /// Atmospheric pressure in hPa.
    pub pressure: u32,
    /// Visibility in metres. Absent for some stations.
    pub visibility: Option<u32>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CurrentConditions {
    /// Helper to build a test observation with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        CurrentConditions {
            city: "Buenos Aires".to_string(),
            country: "AR".to_string(),
            temp: 23.46,
            feels_like: 24.05,
            temp_min: 20.0,
            temp_max: 26.6,
            humidity: 56,
            description: "light rain".to_string(),
            pressure: 1013,
            visibility: Some(10_000),
            latitude: -34.61,
            longitude: -58.38,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized response schema
// ---------------------------------------------------------------------------

/// The service's own simplified weather payload, independent of the
/// upstream provider's field names.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature: Temperature,
    pub humidity: u8,
    pub description: String,
    pub pressure: u32,
    pub visibility: Visibility,
    pub coordinates: Coordinates,
    /// UTC timestamp in ISO-8601 with a trailing `Z`.
    pub timestamp: String,
    /// Fixed attribution label for the upstream provider.
    pub source: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Temperature {
    pub actual: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Visibility in metres, or the literal `"N/A"` sentinel when the
/// provider omits the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Visibility {
    Metres(u32),
    NotAvailable(&'static str),
}

impl From<Option<u32>> for Visibility {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(metres) => Visibility::Metres(metres),
            None => Visibility::NotAvailable("N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Client-facing failure kinds for the lookup pipeline.
///
/// Every failure is converted to a structured JSON body at the handler
/// boundary; none propagate as raw faults to the caller.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Missing required query parameter 'city'")]
    MissingCity,

    #[error("Upstream API key is not configured")]
    Config,

    #[error("City not found: {city}")]
    CityNotFound { city: String },

    #[error("Upstream weather API returned status {status}")]
    Upstream { status: u16 },

    #[error("Upstream weather API timed out")]
    UpstreamTimeout,

    #[error("Could not connect to the upstream weather API")]
    Connectivity,

    #[error("Internal server error")]
    Internal,

    #[error("Route not found")]
    RouteNotFound,
}

impl WeatherError {
    /// HTTP status code this failure maps to.
    pub fn status(&self) -> u16 {
        match self {
            WeatherError::MissingCity => 400,
            WeatherError::Config => 500,
            WeatherError::CityNotFound { .. } => 404,
            WeatherError::Upstream { .. } => 500,
            WeatherError::UpstreamTimeout => 408,
            WeatherError::Connectivity => 503,
            WeatherError::Internal => 500,
            WeatherError::RouteNotFound => 404,
        }
    }

    /// Structured JSON body for this failure.
    ///
    /// Internal detail is never included here; only the upstream status
    /// code and the queried city are intentionally echoed back.
    pub fn body(&self) -> ErrorBody {
        match self {
            WeatherError::MissingCity => ErrorBody {
                error: "Query parameter 'city' is required".to_string(),
                example: Some("/weather?city=Buenos Aires".to_string()),
                ..ErrorBody::default()
            },
            WeatherError::Config => ErrorBody {
                error: "Weather API key is not configured".to_string(),
                message: Some("Set the OPENWEATHER_API_KEY environment variable".to_string()),
                ..ErrorBody::default()
            },
            WeatherError::CityNotFound { city } => ErrorBody {
                error: "City not found".to_string(),
                city: Some(city.clone()),
                message: Some("Check the spelling of the city name".to_string()),
                ..ErrorBody::default()
            },
            WeatherError::Upstream { status } => ErrorBody {
                error: "Failed to fetch weather data".to_string(),
                status_code: Some(*status),
                ..ErrorBody::default()
            },
            WeatherError::UpstreamTimeout => ErrorBody {
                error: "Timed out fetching weather data".to_string(),
                message: Some("Try again in a few moments".to_string()),
                ..ErrorBody::default()
            },
            WeatherError::Connectivity => ErrorBody {
                error: "Connection error".to_string(),
                message: Some("Could not reach the weather service".to_string()),
                ..ErrorBody::default()
            },
            WeatherError::Internal => ErrorBody {
                error: "Internal server error".to_string(),
                message: Some("An unexpected error occurred".to_string()),
                ..ErrorBody::default()
            },
            WeatherError::RouteNotFound => ErrorBody {
                error: "Endpoint not found".to_string(),
                available_endpoints: Some(vec![
                    "/".to_string(),
                    "/weather".to_string(),
                    "/health".to_string(),
                ]),
                ..ErrorBody::default()
            },
        }
    }
}

/// JSON error body. Fields not relevant to a failure kind are omitted
/// from the serialized output entirely, not rendered as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Visibility tests --

    #[test]
    fn test_visibility_from_some() {
        assert_eq!(Visibility::from(Some(10_000)), Visibility::Metres(10_000));
    }

    #[test]
    fn test_visibility_sentinel_when_absent() {
        let v = Visibility::from(None);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!("N/A"));
    }

    #[test]
    fn test_visibility_serializes_as_number() {
        let json = serde_json::to_value(Visibility::Metres(8_500)).unwrap();
        assert_eq!(json, serde_json::json!(8_500));
    }

    // -- WeatherError tests --

    #[test]
    fn test_status_mapping() {
        assert_eq!(WeatherError::MissingCity.status(), 400);
        assert_eq!(WeatherError::Config.status(), 500);
        assert_eq!(
            WeatherError::CityNotFound { city: "x".into() }.status(),
            404
        );
        assert_eq!(WeatherError::Upstream { status: 502 }.status(), 500);
        assert_eq!(WeatherError::UpstreamTimeout.status(), 408);
        assert_eq!(WeatherError::Connectivity.status(), 503);
        assert_eq!(WeatherError::Internal.status(), 500);
        assert_eq!(WeatherError::RouteNotFound.status(), 404);
    }

    #[test]
    fn test_missing_city_body_has_example() {
        let body = WeatherError::MissingCity.body();
        assert!(body.error.contains("city"));
        assert_eq!(body.example.as_deref(), Some("/weather?city=Buenos Aires"));
        assert!(body.city.is_none());
        assert!(body.status_code.is_none());
    }

    #[test]
    fn test_city_not_found_body_echoes_city() {
        let body = WeatherError::CityNotFound {
            city: "Atlantis".into(),
        }
        .body();
        assert_eq!(body.city.as_deref(), Some("Atlantis"));
    }

    #[test]
    fn test_upstream_body_carries_status_code() {
        let body = WeatherError::Upstream { status: 502 }.body();
        assert_eq!(body.status_code, Some(502));
    }

    #[test]
    fn test_route_not_found_lists_endpoints() {
        let body = WeatherError::RouteNotFound.body();
        let endpoints = body.available_endpoints.unwrap();
        assert_eq!(endpoints.len(), 3);
        assert!(endpoints.contains(&"/weather".to_string()));
    }

    #[test]
    fn test_error_body_omits_absent_fields() {
        let json = serde_json::to_string(&WeatherError::UpstreamTimeout.body()).unwrap();
        assert!(json.contains("error"));
        assert!(!json.contains("null"));
        assert!(!json.contains("status_code"));
        assert!(!json.contains("available_endpoints"));
    }

    #[test]
    fn test_error_display() {
        let e = WeatherError::Upstream { status: 502 };
        assert_eq!(
            format!("{e}"),
            "Upstream weather API returned status 502"
        );
    }
}
