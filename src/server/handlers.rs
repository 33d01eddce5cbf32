use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Form;
use tracing::{error, info};

use super::render;
use super::types::{SummarizeForm, SummarizedArticle};
use crate::error::{Error, Result};
use crate::nyt::ArticleSource;
use crate::summarizer::SharedSummarizer;

const NO_CONTENT_MESSAGE: &str = "No content available to summarize.";

#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<dyn ArticleSource>,
    pub summarizer: SharedSummarizer,
}

pub async fn index() -> Html<String> {
    Html(render::index_page(None))
}

pub async fn summarize(
    State(state): State<AppState>,
    Form(form): Form<SummarizeForm>,
) -> std::result::Result<Html<String>, (StatusCode, Html<String>)> {
    let page = form.page.unwrap_or(0);
    info!("Received summarize request for query: {} (page {})", form.query, page);

    let articles = match state.articles.search(&form.query, page).await {
        Ok(articles) => articles,
        Err(e) => {
            // Search failures land back on the index page as a banner.
            error!("Article search failed: {}", e);
            return Ok(Html(render::index_page(Some(&e.to_string()))));
        }
    };

    let mut results = Vec::with_capacity(articles.len());
    for article in articles {
        let content = article.content();
        let summary = if content.is_empty() {
            NO_CONTENT_MESSAGE.to_string()
        } else {
            run_summary(state.summarizer.clone(), content)
                .await
                .map_err(|e| {
                    error!("Summarizer worker failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Html(render::index_page(Some(
                            "The summarizer is unavailable. Please try again later.",
                        ))),
                    )
                })?
        };
        results.push(SummarizedArticle {
            title: article.title().to_string(),
            url: article.url().to_string(),
            summary,
        });
    }

    info!("Summarized {} articles for query: {}", results.len(), form.query);
    Ok(Html(render::results_page(&form.query, &results)))
}

/// Runs one summary on the blocking pool. The single summarizer is shared
/// behind a mutex, so requests queue up for it one at a time.
async fn run_summary(summarizer: SharedSummarizer, content: String) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let summarizer = summarizer
            .lock()
            .map_err(|_| Error::internal("summarizer mutex poisoned"))?;
        Ok(summarizer.summarize(&content))
    })
    .await
    .map_err(|e| Error::internal(format!("summarizer task failed: {e}")))?
}
