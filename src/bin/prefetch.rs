use anyhow::Result;
use newsgist::{config, hub};
use tracing::info;

/// Downloads the summarization model into the local cache so the serving
/// image never touches the network at startup. Runs during the image build;
/// a failed download fails the build.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .json()
        .init();

    let config = config::load().await?;
    let assets = tokio::task::spawn_blocking(move || hub::ensure(&config.model)).await??;

    info!("config: {}", assets.config.display());
    info!("tokenizer: {}", assets.tokenizer.display());
    info!("weights: {}", assets.weights.display());
    info!("Model cache is ready");

    Ok(())
}
