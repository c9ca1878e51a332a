//! WEATHERGATE — City weather lookup HTTP gateway.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! resolves the upstream API key (fail fast if absent), and serves
//! HTTP until terminated externally.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use weathergate::config::AppConfig;
use weathergate::server;
use weathergate::server::routes::ServiceState;
use weathergate::upstream::openweathermap::OpenWeatherMapClient;

const BANNER: &str = r#"
 __      _____   _ _____ _  _ ___ ___  ___   _ _____ ___
 \ \    / / __| /_\_   _| || | __| _ \/ __| /_\_   _| __|
  \ \/\/ /| _| / _ \| | | __ | _||   / (_ |/ _ \| | | _|
   \_/\_/ |___/_/ \_\_| |_||_|___|_|_\\___/_/ \_\_| |___|

   City weather lookup gateway
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        port = cfg.server.port,
        upstream = %cfg.upstream.base_url,
        timeout_secs = cfg.upstream.timeout_secs,
        "Weathergate starting up"
    );

    // The key must come from the environment. There is no embedded
    // fallback; a missing key stops the process here.
    let api_key = cfg.resolve_api_key()?;

    let client = OpenWeatherMapClient::new(&cfg.upstream, api_key)?;
    let state = Arc::new(ServiceState {
        fetcher: Arc::new(client),
    });

    server::serve(state, cfg.server.port).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("weathergate=info"));

    let json_logging = std::env::var("WEATHERGATE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
