use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SummarizeForm {
    pub query: String,
    #[serde(default)]
    pub page: Option<u32>,
}

/// One search hit, summarized and ready to render.
#[derive(Debug, Clone)]
pub struct SummarizedArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
}
