use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use docuchat::config::Settings;
use docuchat::http::{AppState, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    let state = AppState::from_settings(settings)?;

    server::run(Arc::new(state)).await
}
