use serde::Deserialize;

/// One document from the Article Search `response.docs` array. Every field
/// can be missing or `null` on the wire; rendering decides the fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub headline: Option<Headline>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub lead_paragraph: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Headline {
    #[serde(default)]
    pub main: Option<String>,
}

impl Article {
    pub fn title(&self) -> &str {
        self.headline
            .as_ref()
            .and_then(|headline| headline.main.as_deref())
            .unwrap_or("No Title")
    }

    pub fn url(&self) -> &str {
        self.web_url.as_deref().unwrap_or("")
    }

    /// Joins abstract, snippet and lead paragraph, skipping empty parts.
    /// An empty result means there is nothing to summarize.
    pub fn content(&self) -> String {
        [
            self.abstract_text.as_deref(),
            self.snippet.as_deref(),
            self.lead_paragraph.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub docs: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(abstract_text: &str, snippet: &str, lead: &str) -> Article {
        Article {
            headline: Some(Headline {
                main: Some("Title".to_string()),
            }),
            web_url: Some("https://example.com/a".to_string()),
            abstract_text: Some(abstract_text.to_string()),
            snippet: Some(snippet.to_string()),
            lead_paragraph: Some(lead.to_string()),
        }
    }

    #[test]
    fn content_joins_non_empty_parts() {
        let doc = article("An abstract.", "A snippet.", "A lead paragraph.");
        assert_eq!(doc.content(), "An abstract. A snippet. A lead paragraph.");
    }

    #[test]
    fn content_skips_empty_parts() {
        let doc = article("An abstract.", "", "A lead paragraph.");
        assert_eq!(doc.content(), "An abstract. A lead paragraph.");
    }

    #[test]
    fn content_is_empty_when_all_parts_missing() {
        let doc = Article::default();
        assert_eq!(doc.content(), "");
    }

    #[test]
    fn title_falls_back_when_headline_missing() {
        let doc = Article::default();
        assert_eq!(doc.title(), "No Title");
    }

    #[test]
    fn docs_with_missing_fields_deserialize() {
        let json = r#"{
            "response": {
                "docs": [
                    {"headline": {"main": "Hello"}, "web_url": "https://example.com"},
                    {}
                ]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response.docs.len(), 2);
        assert_eq!(parsed.response.docs[0].title(), "Hello");
        assert_eq!(parsed.response.docs[0].url(), "https://example.com");
        assert_eq!(parsed.response.docs[1].title(), "No Title");
    }

    #[test]
    fn null_fields_degrade_like_missing_ones() {
        let json = r#"{
            "response": {
                "docs": [
                    {"headline": null, "web_url": null, "abstract": null},
                    {"headline": {"main": null}, "web_url": "https://example.com/b"}
                ]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response.docs[0].title(), "No Title");
        assert_eq!(parsed.response.docs[0].url(), "");
        assert_eq!(parsed.response.docs[0].content(), "");
        assert_eq!(parsed.response.docs[1].title(), "No Title");
        assert_eq!(parsed.response.docs[1].url(), "https://example.com/b");
    }
}
