use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use newsgist::nyt::{Article, ArticleSource, Headline};
use newsgist::summarizer::{LengthPlan, SharedSummarizer, Summarizer, SummaryEngine};
use newsgist::{Error, Result};

/// Mock article source for testing
pub struct MockArticleSource {
    pub articles: Arc<Mutex<Vec<Article>>>,
    pub error: Arc<Mutex<Option<Error>>>,
    pub searches: Arc<Mutex<Vec<(String, u32)>>>,
    pub delay: Option<Duration>,
}

impl MockArticleSource {
    pub fn new() -> Self {
        Self {
            articles: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            searches: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_articles(self, articles: Vec<Article>) -> Self {
        *self.articles.lock().unwrap() = articles;
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        *self.error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Default for MockArticleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleSource for MockArticleSource {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<Article>> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), page));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error);
        }

        Ok(self.articles.lock().unwrap().clone())
    }
}

/// Scripted summary engine that records every call it receives
pub struct StubEngine {
    pub calls: Arc<Mutex<Vec<(String, LengthPlan)>>>,
    pub response: String,
    pub error: Option<String>,
}

impl StubEngine {
    pub fn new(response: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: response.to_string(),
            error: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: String::new(),
            error: Some(message.to_string()),
        }
    }
}

impl SummaryEngine for StubEngine {
    fn summarize(&self, text: &str, plan: &LengthPlan) -> Result<String> {
        self.calls.lock().unwrap().push((text.to_string(), *plan));

        if let Some(ref message) = self.error {
            return Err(Error::model(message.clone()));
        }

        Ok(self.response.clone())
    }
}

// Helper functions for creating test data

pub fn create_article(title: &str, url: &str, abstract_text: &str) -> Article {
    Article {
        headline: Some(Headline {
            main: Some(title.to_string()),
        }),
        web_url: Some(url.to_string()),
        abstract_text: if abstract_text.is_empty() {
            None
        } else {
            Some(abstract_text.to_string())
        },
        snippet: None,
        lead_paragraph: None,
    }
}

pub fn create_shared_summarizer(engine: StubEngine) -> SharedSummarizer {
    Summarizer::new(Box::new(engine))
        .expect("summarizer should build")
        .into_shared()
}
