//! Server-rendered HTML for the search and results pages.
//!
//! Two small pages do not justify a template engine; everything user-supplied
//! goes through [`escape_html`] before it is spliced in.

use super::types::SummarizedArticle;

const PAGE_STYLE: &str = "\
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }\n\
form { display: flex; gap: 0.5rem; margin-bottom: 1.5rem; }\n\
input[type=text] { flex: 1; padding: 0.4rem; }\n\
input[type=number] { width: 5rem; padding: 0.4rem; }\n\
.error { color: #b00020; }\n\
article { margin-bottom: 1.5rem; }";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>{PAGE_STYLE}</style>\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n"
    )
}

fn search_form() -> String {
    "<form method=\"post\" action=\"/summarize\">\n\
     <input type=\"text\" name=\"query\" placeholder=\"Search NYT articles\" required>\n\
     <input type=\"number\" name=\"page\" min=\"0\" value=\"0\">\n\
     <button type=\"submit\">Summarize</button>\n\
     </form>\n"
        .to_string()
}

pub fn index_page(error: Option<&str>) -> String {
    let mut body = String::from("<h1>News Summarizer</h1>\n");
    body.push_str(&search_form());
    if let Some(message) = error {
        body.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(message)
        ));
    }
    page("News Summarizer", &body)
}

pub fn results_page(query: &str, articles: &[SummarizedArticle]) -> String {
    let mut body = format!(
        "<h1>Summaries for &quot;{}&quot;</h1>\n",
        escape_html(query)
    );
    if articles.is_empty() {
        body.push_str("<p>No articles found.</p>\n");
    }
    for article in articles {
        body.push_str(&format!(
            "<article>\n\
             <h2><a href=\"{url}\">{title}</a></h2>\n\
             <p>{summary}</p>\n\
             </article>\n",
            url = escape_html(&article.url),
            title = escape_html(&article.title),
            summary = escape_html(&article.summary),
        ));
    }
    body.push_str("<p><a href=\"/\">New search</a></p>\n");
    page("Summaries", &body)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
