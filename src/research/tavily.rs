//! Tavily search API client.

use super::SearchProvider;
use crate::config::SearchSettings;
use crate::error::{GleanerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Client for the Tavily `/search` endpoint.
pub struct TavilyClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    search_depth: String,
}

impl TavilyClient {
    /// Create a client for the configured endpoint.
    ///
    /// Fails when `base_url` is not a valid URL.
    pub fn new(api_key: String, settings: &SearchSettings) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}/search",
            settings.base_url.trim_end_matches('/')
        ))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            search_depth: settings.search_depth.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Value>> {
        let request = TavilySearchRequest {
            query,
            search_depth: &self.search_depth,
            max_results,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GleanerError::SearchProvider(format!(
                "Tavily returned {}: {}",
                status, body
            )));
        }

        let body: TavilySearchResponse = response.json().await?;
        debug!("Tavily returned {} results", body.results.len());
        Ok(body.results)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
