//! Page fetching and article structuring.
//!
//! Pages are fetched one at a time. A page that fails to load is logged and
//! skipped; it never aborts the batch.

mod extract;

pub use extract::{extract_article_body, extract_paragraph_text, NO_CONTENT_SENTINEL};

use crate::config::ScrapeSettings;
use crate::error::{GleanerError, Result};
use crate::persist::Record;
use crate::research::SearchResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Text scraped from one search result's page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedArticle {
    pub url: Url,
    pub title: String,
    pub scraped_text: String,
}

impl ScrapedArticle {
    /// Flatten into a persistable record with the URL as plain text.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("url".to_string(), Value::String(self.url.to_string()));
        record.insert("title".to_string(), Value::String(self.title.clone()));
        record.insert(
            "scraped_text".to_string(),
            Value::String(self.scraped_text.clone()),
        );
        record
    }
}

/// Fetches pages and extracts their paragraph text.
pub struct Scraper {
    http: reqwest::Client,
}

impl Scraper {
    /// Create a scraper with the configured User-Agent and timeout.
    pub fn new(settings: &ScrapeSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { http })
    }

    /// Scrape every result. `None` when the input is empty or nothing succeeded.
    #[instrument(skip_all, fields(count = results.len()))]
    pub async fn scrape(&self, results: &[SearchResult]) -> Option<Vec<ScrapedArticle>> {
        if results.is_empty() {
            info!("No search results provided to scrape");
            return None;
        }

        let mut articles = Vec::with_capacity(results.len());
        for result in results {
            match self.scrape_one(result).await {
                Ok(article) => articles.push(article),
                Err(e) => warn!("Could not scrape {}: {}", result.url, e),
            }
        }

        if articles.is_empty() {
            warn!("Scraping finished, but no data was extracted");
            return None;
        }

        info!("Scraped {} of {} pages", articles.len(), results.len());
        Some(articles)
    }

    /// Fetch and structure a single page.
    pub async fn scrape_one(&self, result: &SearchResult) -> Result<ScrapedArticle> {
        debug!("Scraping {}", result.url);

        let response = self.http.get(result.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GleanerError::Scrape {
                url: result.url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let html = response.text().await?;

        Ok(ScrapedArticle {
            url: result.url.clone(),
            title: result.title.clone(),
            scraped_text: extract_article_body(&html),
        })
    }
}
