//! Find command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::persist::cell_text;
use crate::retrieve::find;
use anyhow::Result;

/// Look up saved articles by keyword.
pub fn run_find(
    query: &str,
    db: Option<&str>,
    table: Option<&str>,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(db) = db {
        settings.storage.db_path = db.to_string();
    }
    let db_path = settings.db_path();
    let table = table.unwrap_or(settings.storage.table_name.as_str());

    // JSON output mirrors the tool result, where a missing database is `null`.
    if !json {
        preflight::check(Operation::Find, &settings)?;
    }

    let rows = find(query, &db_path, table);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let Some(rows) = rows else {
        Output::warning("No saved articles match your query.");
        return Ok(());
    };

    Output::success(&format!("Found {} articles", rows.len()));
    for row in &rows {
        let field = |name: &str| row.get(name).map(cell_text).unwrap_or_default();
        Output::article(&field("title"), &field("url"), &field("scraped_text"));
    }

    Ok(())
}
