//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. A
//! missing file yields the built-in defaults so the service can run from
//! environment variables alone. The upstream API key is never stored in
//! the config file; it is referenced by env-var name and resolved at
//! startup via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port the HTTP listener binds to (all interfaces).
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Current-weather endpoint of the provider.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Outbound call timeout in seconds.
    pub timeout_secs: u64,
    /// Measurement units requested from the provider.
    pub units: String,
    /// Language for condition descriptions.
    pub lang: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key_env: "OPENWEATHER_API_KEY".to_string(),
            timeout_secs: 10,
            units: "metric".to_string(),
            lang: "en".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error; defaults apply. The `PORT`
    /// environment variable overrides the configured listen port.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {path}"))?
        } else {
            Self::default()
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        Ok(config)
    }

    /// Resolve the upstream API key from the configured environment
    /// variable. There is no embedded fallback; a missing or empty key
    /// is a startup failure.
    pub fn resolve_api_key(&self) -> Result<SecretString> {
        let key = std::env::var(&self.upstream.api_key_env).with_context(|| {
            format!(
                "Environment variable not set: {}",
                self.upstream.api_key_env
            )
        })?;
        if key.trim().is_empty() {
            anyhow::bail!(
                "Environment variable is empty: {}",
                self.upstream.api_key_env
            );
        }
        Ok(SecretString::new(key))
    }
}
