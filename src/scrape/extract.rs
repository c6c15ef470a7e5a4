//! Paragraph text extraction from HTML.

use scraper::{Html, Selector};

/// Body used when a page has no paragraph text.
pub const NO_CONTENT_SENTINEL: &str = "No <p> content found.";

/// Extract the text of every `<p>` element, space-joined.
///
/// Whitespace inside a paragraph collapses to single spaces and empty
/// paragraphs are dropped. Returns an empty string when nothing is found.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&selector)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the body text, substituting the sentinel when empty.
pub fn extract_article_body(html: &str) -> String {
    let text = extract_paragraph_text(html);
    if text.is_empty() {
        NO_CONTENT_SENTINEL.to_string()
    } else {
        text
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
