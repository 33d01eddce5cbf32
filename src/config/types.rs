use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub nyt: NytConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Requests running longer than this are terminated with an error
    /// response instead of hanging.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NytConfig {
    #[serde(default = "default_nyt_base_url")]
    pub base_url: String,
    /// Article Search API key. Overridden by the NYT_API_KEY environment
    /// variable; an empty key surfaces as an in-page error on search.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_repo")]
    pub repo_id: String,
    #[serde(default = "default_model_revision")]
    pub revision: String,
    /// Explicit cache directory for model artifacts. When unset, hf-hub's
    /// default cache applies (HF_HOME or ~/.cache/huggingface).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            nyt: NytConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for NytConfig {
    fn default() -> Self {
        Self {
            base_url: default_nyt_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            repo_id: default_model_repo(),
            revision: default_model_revision(),
            cache_dir: None,
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_nyt_base_url() -> String {
    "https://api.nytimes.com/svc/search/v2".to_string()
}

fn default_model_repo() -> String {
    "facebook/bart-large-cnn".to_string()
}

fn default_model_revision() -> String {
    "main".to_string()
}

fn default_log_level() -> String {
    "debug".to_string()
}
