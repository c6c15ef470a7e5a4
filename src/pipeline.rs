//! End-to-end harvesting.
//!
//! Runs search, scrape and persist in sequence for a single query.

use crate::config::Settings;
use crate::error::Result;
use crate::persist::{persist_as, Destination, PersistOutcome, Record, SaveFormat};
use crate::research::Researcher;
use crate::scrape::Scraper;
use serde::Serialize;
use tracing::{info, instrument};

/// What one harvest run did.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub query: String,
    /// Validated search results.
    pub found: usize,
    /// Pages scraped successfully.
    pub scraped: usize,
    pub outcome: PersistOutcome,
}

/// Search, scrape and persist.
pub struct Pipeline {
    settings: Settings,
    researcher: Researcher,
    scraper: Scraper,
}

impl Pipeline {
    /// Build the pipeline from settings, resolving the search credential.
    pub fn new(settings: Settings) -> Result<Self> {
        let researcher = Researcher::from_settings(&settings.search)?;
        let scraper = Scraper::new(&settings.scrape)?;
        Ok(Self::with_components(settings, researcher, scraper))
    }

    /// Build the pipeline from existing components.
    pub fn with_components(settings: Settings, researcher: Researcher, scraper: Scraper) -> Self {
        Self {
            settings,
            researcher,
            scraper,
        }
    }

    /// Run one query through to storage.
    ///
    /// Search failures are errors. An empty search or an all-failed scrape
    /// is reported as a skipped outcome.
    #[instrument(skip(self))]
    pub async fn harvest(
        &self,
        query: &str,
        max_results: u32,
        filename: &str,
        format: SaveFormat,
    ) -> Result<HarvestReport> {
        let results = self.researcher.search(query, max_results).await?;
        info!("Found {} results", results.len());

        let articles = if results.is_empty() {
            None
        } else {
            self.scraper.scrape(&results).await
        };

        let records: Vec<Record> = articles
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|a| a.to_record())
            .collect();

        let destination = Destination::new(
            self.settings.output_path(filename),
            self.settings.db_path(),
            self.settings.storage.table_name.clone(),
        );
        let outcome = persist_as(&records, format, &destination);

        Ok(HarvestReport {
            query: query.to_string(),
            found: results.len(),
            scraped: records.len(),
            outcome,
        })
    }
}
