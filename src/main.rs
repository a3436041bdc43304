use std::error::Error;

use api::{AppConfig, core::telemetry};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    // Variables already set in the environment take precedence.
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::DEBUG))
        .with(telemetry::layer())
        .init();

    if let Some(path) = dotenv {
        info!(path = %path.display(), ".env loaded");
    }

    let config = AppConfig::from_env()?;
    api::start(config).await?;

    Ok(())
}
