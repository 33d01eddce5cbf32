use newsgist::Result;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::fs;

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 5000
  request_timeout_secs: 30
  logs:
    level: "debug"

nyt:
  base_url: "https://api.nytimes.com/svc/search/v2"
  api_key: "file-key"

model:
  repo_id: "facebook/bart-large-cnn"
  revision: "main"
  cache_dir: "/tmp/hf-test-cache"
"#;

/// Article Search response body wrapping the given docs
pub fn search_body(docs: Vec<Value>) -> Value {
    json!({
        "status": "OK",
        "response": {
            "docs": docs
        }
    })
}

/// One Article Search doc with all three text fields populated
pub fn search_doc(title: &str, url: &str, abstract_text: &str, snippet: &str, lead: &str) -> Value {
    json!({
        "headline": { "main": title },
        "web_url": url,
        "abstract": abstract_text,
        "snippet": snippet,
        "lead_paragraph": lead
    })
}
