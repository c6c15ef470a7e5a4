//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::research::Researcher;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    max_results: Option<u32>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    preflight::check(Operation::Search, &settings)?;
    let researcher = Researcher::from_settings(&settings.search)?;
    let max_results = max_results.unwrap_or(settings.search.max_results);

    let spinner = Output::spinner("Searching...");
    let results = researcher.search(query, max_results).await;
    spinner.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        Output::warning("No results found matching your query.");
        return Ok(());
    }

    Output::success(&format!("Found {} results", results.len()));
    for result in &results {
        Output::search_result(&result.title, result.url.as_str(), result.score, &result.content);
    }

    Ok(())
}
