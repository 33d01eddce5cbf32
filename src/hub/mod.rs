//! Fetches the summarization model assets from the Hugging Face Hub.
//!
//! Files land in the standard hub cache, so `HF_HOME` (or an explicit
//! `model.cache_dir`) decides where they live. A warm cache makes this a
//! no-op, which is how the container build bakes the model into the image.

use std::path::PathBuf;

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::Result;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Local paths of everything the summarizer needs to start.
#[derive(Debug, Clone)]
pub struct ModelAssets {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Makes sure config, tokenizer and weights exist locally and returns their
/// paths. Failure is fatal for the caller: without the model there is nothing
/// to serve.
pub fn ensure(model: &ModelConfig) -> Result<ModelAssets> {
    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(dir) = &model.cache_dir {
        builder = builder.with_cache_dir(dir.clone());
    }
    let api = builder.build()?;
    let repo = api.repo(Repo::with_revision(
        model.repo_id.clone(),
        RepoType::Model,
        model.revision.clone(),
    ));

    info!("Fetching model assets for {} ({})", model.repo_id, model.revision);
    let config = repo.get(CONFIG_FILE)?;
    debug!("{CONFIG_FILE} resolved to {}", config.display());
    let tokenizer = repo.get(TOKENIZER_FILE)?;
    debug!("{TOKENIZER_FILE} resolved to {}", tokenizer.display());
    let weights = repo.get(WEIGHTS_FILE)?;
    debug!("{WEIGHTS_FILE} resolved to {}", weights.display());

    Ok(ModelAssets {
        config,
        tokenizer,
        weights,
    })
}
