//! Scrape command implementation.

use super::read_json;
use crate::cli::Output;
use crate::config::Settings;
use crate::persist::Record;
use crate::research::SearchResult;
use crate::scrape::Scraper;
use anyhow::Result;
use std::path::PathBuf;

/// Scrape the pages of search results read from `input`.
pub async fn run_scrape(input: &str, output: Option<PathBuf>, settings: Settings) -> Result<()> {
    let results: Vec<SearchResult> = read_json(input)?;
    let scraper = Scraper::new(&settings.scrape)?;

    let spinner = Output::spinner(&format!("Scraping {} pages...", results.len()));
    let articles = scraper.scrape(&results).await;
    spinner.finish_and_clear();

    let Some(articles) = articles else {
        Output::warning("Scraping finished, but no data was extracted.");
        return Ok(());
    };

    let records: Vec<Record> = articles.iter().map(|a| a.to_record()).collect();
    let json = serde_json::to_string_pretty(&records)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            Output::success(&format!(
                "Scraped {} of {} pages into {}",
                records.len(),
                results.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }

    Ok(())
}
