//! OpenWeatherMap current-weather integration.
//!
//! API docs: https://openweathermap.org/current
//! Base URL: `https://api.openweathermap.org/data/2.5/weather`
//! Auth: API key as the `appid` query parameter.
//! Units: metric; description language is configurable.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::{CurrentWeatherFetch, FetchError};
use crate::config::UpstreamConfig;
use crate::types::CurrentConditions;

const USER_AGENT: &str = concat!("weathergate/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// API response types (OpenWeatherMap JSON → Rust)
// ---------------------------------------------------------------------------

/// The `/data/2.5/weather` success payload. We only deserialize the
/// fields we need.
#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    sys: OwmSys,
    main: OwmMain,
    weather: Vec<OwmWeather>,
    /// Visibility in metres. Absent for some stations.
    #[serde(default)]
    visibility: Option<u32>,
    coord: OwmCoord,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

impl OwmResponse {
    /// Collapse the wire shape into the provider-independent view.
    ///
    /// The condition list is documented as non-empty on success; an
    /// empty list is treated as a malformed payload.
    fn into_conditions(self) -> Result<CurrentConditions, FetchError> {
        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| FetchError::Malformed("empty weather condition list".to_string()))?;

        Ok(CurrentConditions {
            city: self.name,
            country: self.sys.country,
            temp: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            description,
            pressure: self.main.pressure,
            visibility: self.visibility,
            latitude: self.coord.lat,
            longitude: self.coord.lon,
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OpenWeatherMap client for the current-weather endpoint.
pub struct OpenWeatherMapClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    units: String,
    lang: String,
}

impl OpenWeatherMapClient {
    /// Create a new client. The timeout bounds the whole outbound call;
    /// there are no retries.
    pub fn new(cfg: &UpstreamConfig, api_key: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key,
            units: cfg.units.clone(),
            lang: cfg.lang.clone(),
        })
    }
}

/// Map a reqwest transport error onto the outcome enumeration.
fn classify_transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        // DNS, refused connections, TLS handshakes and any other
        // pre-response failure all land here.
        FetchError::Connect(err.to_string())
    }
}

#[async_trait]
impl CurrentWeatherFetch for OpenWeatherMapClient {
    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.expose_secret().as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(classify_transport)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(classify_transport)?;
        debug!(city, bytes = body.len(), "Upstream response received");

        let parsed: OwmResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        parsed.into_conditions()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
