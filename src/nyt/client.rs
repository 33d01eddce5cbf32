use super::types::{Article, SearchResponse};
use crate::{Error, Result, config::NytConfig};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<Article>>;
}

pub struct NytClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NytClient {
    pub fn new(config: NytConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }
}

#[async_trait]
impl ArticleSource for NytClient {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<Article>> {
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        debug!("Searching articles for \"{}\" (page {})", query, page);

        let url = format!("{}/articlesearch.json", self.base_url);
        let page_param = page.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("api-key", self.api_key.as_str()),
                ("page", page_param.as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        let response = response.error_for_status()?;

        // Some gateway rejections come back as 200 with a `fault` payload,
        // so inspect the body before decoding the document list.
        let body: serde_json::Value = response.json().await?;
        if let Some(fault) = body.get("fault") {
            let message = fault
                .get("faultstring")
                .and_then(|value| value.as_str())
                .unwrap_or("article search rejected by the API gateway");
            return Err(Error::gateway(message));
        }

        let parsed: SearchResponse = serde_json::from_value(body)?;
        debug!("Article search returned {} documents", parsed.response.docs.len());
        Ok(parsed.response.docs)
    }
}
