mod client;
mod types;

pub use client::{ArticleSource, NytClient};
pub use types::{Article, Headline, SearchBody, SearchResponse};
