//! Weather lookup pipeline.
//!
//! Pure translation from a city query and a fetch outcome to either a
//! normalized report or a client-facing failure. Free of HTTP server
//! types, so the whole contract is exercisable without a listener.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info};

use crate::types::{
    Coordinates, CurrentConditions, Temperature, Visibility, WeatherError, WeatherReport,
};
use crate::upstream::{CurrentWeatherFetch, FetchError};

/// Attribution label included in every successful report.
pub const SOURCE: &str = "OpenWeatherMap";

/// Unit label for metric temperatures.
pub const TEMP_UNIT: &str = "°C";

/// Look up current weather for a city and reshape it into the service's
/// response schema.
///
/// The outcome of the outbound call is matched exhaustively; every
/// failure kind maps to exactly one `WeatherError`. Internal detail
/// (transport errors, payload parse errors) is logged here and never
/// forwarded to the caller.
pub async fn lookup(
    city: &str,
    fetcher: &dyn CurrentWeatherFetch,
    now: DateTime<Utc>,
) -> Result<WeatherReport, WeatherError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::MissingCity);
    }

    let conditions = match fetcher.current_by_city(city).await {
        Ok(conditions) => conditions,
        Err(FetchError::NotFound) => {
            return Err(WeatherError::CityNotFound {
                city: city.to_string(),
            });
        }
        Err(FetchError::Status(status)) => {
            error!(status, "Upstream weather API error");
            return Err(WeatherError::Upstream { status });
        }
        Err(FetchError::Timeout) => return Err(WeatherError::UpstreamTimeout),
        Err(FetchError::Connect(detail)) => {
            error!(detail = %detail, "Connection to upstream failed");
            return Err(WeatherError::Connectivity);
        }
        Err(FetchError::Malformed(detail)) => {
            error!(detail = %detail, "Unexpected upstream payload");
            return Err(WeatherError::Internal);
        }
    };

    info!(city, "Weather lookup succeeded");
    Ok(build_report(conditions, now))
}

/// Reshape upstream conditions into the normalized report.
pub fn build_report(conditions: CurrentConditions, now: DateTime<Utc>) -> WeatherReport {
    WeatherReport {
        city: conditions.city,
        country: conditions.country,
        temperature: Temperature {
            actual: round1(conditions.temp),
            feels_like: round1(conditions.feels_like),
            min: round1(conditions.temp_min),
            max: round1(conditions.temp_max),
            unit: TEMP_UNIT,
        },
        humidity: conditions.humidity,
        description: title_case(&conditions.description),
        pressure: conditions.pressure,
        visibility: Visibility::from(conditions.visibility),
        coordinates: Coordinates {
            latitude: conditions.latitude,
            longitude: conditions.longitude,
        },
        timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        source: SOURCE,
    }
}

/// Round to one decimal place, half away from zero.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Capitalize the first letter of each whitespace-separated word and
/// lowercase the rest: "light rain" → "Light Rain".
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::MockCurrentWeatherFetch;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-06T12:30:45Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    // -- round1 --

    #[test]
    fn test_round1() {
        assert!((round1(23.46) - 23.5).abs() < 1e-9);
        assert!((round1(23.44) - 23.4).abs() < 1e-9);
        assert!((round1(20.0) - 20.0).abs() < 1e-9);
        assert!((round1(-0.06) + 0.1).abs() < 1e-9);
        assert!((round1(-5.56) + 5.6).abs() < 1e-9);
    }

    // -- title_case --

    #[test]
    fn test_title_case_lowercase_input() {
        assert_eq!(title_case("light rain"), "Light Rain");
    }

    #[test]
    fn test_title_case_uppercase_input() {
        assert_eq!(title_case("SCATTERED CLOUDS"), "Scattered Clouds");
    }

    #[test]
    fn test_title_case_single_word() {
        assert_eq!(title_case("mist"), "Mist");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
    }

    // -- build_report --

    #[test]
    fn test_report_rounds_temperatures() {
        let mut conditions = CurrentConditions::sample();
        conditions.temp = 23.456;
        conditions.feels_like = 24.049;
        conditions.temp_min = 19.96;
        conditions.temp_max = 26.64;

        let report = build_report(conditions, fixed_now());
        assert!((report.temperature.actual - 23.5).abs() < 1e-9);
        assert!((report.temperature.feels_like - 24.0).abs() < 1e-9);
        assert!((report.temperature.min - 20.0).abs() < 1e-9);
        assert!((report.temperature.max - 26.6).abs() < 1e-9);
        assert_eq!(report.temperature.unit, "°C");
    }

    #[test]
    fn test_report_timestamp_and_source() {
        let report = build_report(CurrentConditions::sample(), fixed_now());
        assert_eq!(report.timestamp, "2026-08-06T12:30:45Z");
        assert_eq!(report.source, "OpenWeatherMap");
    }

    #[test]
    fn test_report_visibility_sentinel() {
        let mut conditions = CurrentConditions::sample();
        conditions.visibility = None;
        let report = build_report(conditions, fixed_now());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["visibility"], serde_json::json!("N/A"));
    }

    #[test]
    fn test_report_title_cases_description() {
        let report = build_report(CurrentConditions::sample(), fixed_now());
        assert_eq!(report.description, "Light Rain");
    }

    // -- lookup --

    #[tokio::test]
    async fn test_lookup_empty_city_skips_fetch() {
        // No expectation set: any call to the mock would panic.
        let mock = MockCurrentWeatherFetch::new();
        let err = lookup("", &mock, fixed_now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingCity));

        let err = lookup("   ", &mock, fixed_now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingCity));
    }

    #[tokio::test]
    async fn test_lookup_trims_city() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .withf(|city| city == "Paris")
            .returning(|_| Ok(CurrentConditions::sample()));
        let report = lookup("  Paris  ", &mock, fixed_now()).await.unwrap();
        assert_eq!(report.city, "Buenos Aires"); // upstream-reported name wins
    }

    #[tokio::test]
    async fn test_lookup_not_found_echoes_city() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .returning(|_| Err(FetchError::NotFound));
        let err = lookup("Atlantis", &mock, fixed_now()).await.unwrap_err();
        match err {
            WeatherError::CityNotFound { city } => assert_eq!(city, "Atlantis"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_upstream_status() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .returning(|_| Err(FetchError::Status(502)));
        let err = lookup("Paris", &mock, fixed_now()).await.unwrap_err();
        match err {
            WeatherError::Upstream { status } => assert_eq!(status, 502),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .returning(|_| Err(FetchError::Timeout));
        let err = lookup("Paris", &mock, fixed_now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamTimeout));
        assert_eq!(err.status(), 408);
    }

    #[tokio::test]
    async fn test_lookup_connectivity() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .returning(|_| Err(FetchError::Connect("connection refused".to_string())));
        let err = lookup("Paris", &mock, fixed_now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Connectivity));
        assert_eq!(err.status(), 503);
    }

    #[tokio::test]
    async fn test_lookup_malformed_is_internal_and_generic() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .returning(|_| Err(FetchError::Malformed("missing field `main`".to_string())));
        let err = lookup("Paris", &mock, fixed_now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Internal));
        // Parse detail must not leak into the client body.
        let json = serde_json::to_string(&err.body()).unwrap();
        assert!(!json.contains("missing field"));
    }

    #[tokio::test]
    async fn test_lookup_success_builds_report() {
        let mut mock = MockCurrentWeatherFetch::new();
        mock.expect_current_by_city()
            .withf(|city| city == "Buenos Aires")
            .returning(|_| Ok(CurrentConditions::sample()));
        let report = lookup("Buenos Aires", &mock, fixed_now()).await.unwrap();
        assert_eq!(report.city, "Buenos Aires");
        assert_eq!(report.country, "AR");
        assert_eq!(report.humidity, 56);
        assert_eq!(report.pressure, 1013);
    }
}
