//! Harvest command implementation.

use super::save::report;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::persist::SaveFormat;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Search, scrape and save one query.
pub async fn run_harvest(
    query: &str,
    max_results: Option<u32>,
    filename: &str,
    format: Option<&str>,
    settings: Settings,
) -> Result<()> {
    preflight::check(Operation::Search, &settings)?;
    let format: SaveFormat = format
        .unwrap_or(settings.storage.default_format.as_str())
        .parse()?;
    let max_results = max_results.unwrap_or(settings.search.max_results);
    let pipeline = Pipeline::new(settings)?;

    let spinner = Output::spinner(&format!("Harvesting '{}'...", query));
    let report_result = pipeline.harvest(query, max_results, filename, format).await;
    spinner.finish_and_clear();

    let harvest = report_result?;
    Output::info(&format!(
        "Found {} results, scraped {} pages",
        harvest.found, harvest.scraped
    ));
    report(&harvest.outcome)
}
