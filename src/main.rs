use anyhow::Result;
use candle_core::Device;
use newsgist::bart::BartSummarizer;
use newsgist::nyt::NytClient;
use newsgist::summarizer::Summarizer;
use newsgist::{config, hub, server};
use std::sync::Arc;
use tracing::{info, warn};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    // Validate log level
    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // Initialize tracing with the determined log level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.parse().unwrap()),
        )
        .json()
        .init();

    info!("Starting news summarizer with log level: {}", log_level);

    if config.nyt.api_key.is_empty() {
        warn!("NYT_API_KEY is not set; article searches will fail until it is provided");
    }

    // The prefetch binary runs at image build time, so this normally resolves
    // straight from the local cache.
    let model_config = config.model.clone();
    let assets = tokio::task::spawn_blocking(move || hub::ensure(&model_config)).await??;

    let summarizer = tokio::task::spawn_blocking(move || {
        let engine = BartSummarizer::load(&assets, &Device::Cpu)?;
        Summarizer::new(Box::new(engine))
    })
    .await??;
    info!("Summarization model ready");

    let state = server::AppState {
        articles: Arc::new(NytClient::new(config.nyt.clone())),
        summarizer: summarizer.into_shared(),
    };

    // Start the server
    server::run(&config, state).await?;

    Ok(())
}
