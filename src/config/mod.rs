mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path)
        .await
        .map_err(|err| Error::config(format!("cannot read {config_path}: {err}")))?;
    let mut config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&config_str)?
    };

    // The API key is a secret; the environment always wins over the file.
    if let Ok(key) = env::var("NYT_API_KEY") {
        config.nyt.api_key = key;
    }

    Ok(config)
}
