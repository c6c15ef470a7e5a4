//! Web search for educational content.
//!
//! A [`SearchProvider`] returns raw result items; the [`Researcher`] validates
//! every item into a [`SearchResult`]. One malformed item rejects the whole
//! batch.

mod tavily;

pub use tavily::TavilyClient;

use crate::config::SearchSettings;
use crate::error::{GleanerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use url::Url;

/// A validated search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSearchResult")]
pub struct SearchResult {
    /// Title of the page.
    pub title: String,
    /// Absolute http(s) URL of the page.
    pub url: Url,
    /// Snippet returned by the provider.
    pub content: String,
    /// Provider relevance score.
    pub score: Option<f64>,
    /// Raw page text, when the provider includes it.
    pub raw_content: Option<String>,
}

/// Unvalidated shape of a provider result item.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub raw_content: Option<String>,
}

impl TryFrom<RawSearchResult> for SearchResult {
    type Error = GleanerError;

    fn try_from(raw: RawSearchResult) -> Result<Self> {
        Ok(Self {
            url: validate_url(&raw.url)?,
            title: raw.title,
            content: raw.content,
            score: raw.score,
            raw_content: raw.raw_content,
        })
    }
}

impl SearchResult {
    /// Build a result, validating the URL.
    pub fn new(title: impl Into<String>, url: &str, content: impl Into<String>) -> Result<Self> {
        Self::try_from(RawSearchResult {
            title: title.into(),
            url: url.to_string(),
            content: content.into(),
            score: None,
            raw_content: None,
        })
    }

    /// Validate one raw provider item.
    pub fn validate(item: Value) -> Result<Self> {
        let raw: RawSearchResult = serde_json::from_value(item)
            .map_err(|e| GleanerError::Validation(format!("malformed search result: {}", e)))?;
        Self::try_from(raw)
    }
}

/// Parse an absolute http(s) URL with a host.
pub fn validate_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())
        .map_err(|e| GleanerError::Validation(format!("invalid URL '{}': {}", input, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GleanerError::Validation(format!(
            "URL '{}' must use http or https",
            input
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(GleanerError::Validation(format!("URL '{}' has no host", input)));
    }

    Ok(url)
}

/// A web search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a query and return the raw result items.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Value>>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Runs searches and validates what comes back.
pub struct Researcher {
    provider: Arc<dyn SearchProvider>,
}

impl Researcher {
    /// Create a researcher over any provider.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Build the configured provider, resolving the API key now.
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        match settings.provider.to_lowercase().as_str() {
            "tavily" => {
                let api_key = settings.resolve_api_key()?;
                let client = TavilyClient::new(api_key, settings)?;
                Ok(Self::new(Arc::new(client)))
            }
            other => Err(GleanerError::Config(format!(
                "Unknown search provider: {}",
                other
            ))),
        }
    }

    /// Search and validate. Any invalid item fails the call.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let items = self.provider.search(query, max_results).await?;
        debug!("Provider returned {} items", items.len());

        let mut results = items
            .into_iter()
            .map(SearchResult::validate)
            .collect::<Result<Vec<_>>>()?;
        results.truncate(max_results as usize);

        info!("Search for '{}' returned {} results", query, results.len());
        Ok(results)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Provider that replays a fixed response.
    pub(crate) struct StaticProvider(pub Vec<Value>);

    #[async_trait]
    impl SearchProvider for StaticProvider {
        async fn search(&self, _query: &str, _max_results: u32) -> Result<Vec<Value>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn item(title: &str, url: &str) -> Value {
        json!({ "title": title, "url": url, "content": "snippet", "score": 0.9 })
    }

    #[tokio::test]
    async fn test_fewer_results_than_requested() {
        let researcher = Researcher::new(Arc::new(StaticProvider(vec![
            item("Algebra basics", "https://example.com/algebra"),
            item("Linear equations", "https://example.org/linear"),
        ])));

        let results = researcher.search("intro to algebra", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Algebra basics");
        assert_eq!(results[1].url.as_str(), "https://example.org/linear");
        assert_eq!(results[0].score, Some(0.9));
    }

    #[tokio::test]
    async fn test_one_malformed_item_fails_batch() {
        let researcher = Researcher::new(Arc::new(StaticProvider(vec![
            item("Good", "https://example.com/good"),
            item("Bad", "not a url"),
        ])));

        let err = researcher.search("algebra", 5).await.unwrap_err();
        assert!(matches!(err, GleanerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_field_fails_batch() {
        let researcher = Researcher::new(Arc::new(StaticProvider(vec![json!({
            "title": "No content field",
            "url": "https://example.com/x"
        })])));

        assert!(researcher.search("algebra", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_requested_returns_empty() {
        let researcher = Researcher::new(Arc::new(StaticProvider(vec![item(
            "Ignored",
            "https://example.com/",
        )])));
        assert!(researcher.search("algebra", 0).await.unwrap().is_empty());
    }

    #[test]
    fn test_validate_url_rules() {
        assert!(validate_url("https://khanacademy.org/math").is_ok());
        assert!(validate_url("/relative/path").is_err());
        assert!(validate_url("ftp://example.com/file").is_err());
        assert!(validate_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: std::result::Result<SearchResult, _> =
            serde_json::from_value(item("Ok", "https://example.com/a"));
        assert!(ok.is_ok());

        let bad: std::result::Result<SearchResult, _> =
            serde_json::from_value(item("Bad", "example.com/a"));
        assert!(bad.is_err());
    }

    #[test]
    fn test_serializes_url_as_text() {
        let result = SearchResult::new("T", "https://example.com/a", "c").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["url"], "https://example.com/a");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let settings = SearchSettings {
            provider: "bing".to_string(),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Researcher::from_settings(&settings),
            Err(GleanerError::Config(_))
        ));
    }
}
