//! Keyword retrieval over persisted articles.

use crate::error::{GleanerError, Result};
use crate::persist::sqlite::{from_sql_value, quote_ident};
use crate::persist::Record;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Find rows whose title or scraped text contains `query`.
///
/// Returns `None` when the database is missing, nothing matches, or the
/// lookup fails. A missing database file is never created.
#[instrument(skip(db_path), fields(db = %db_path.display()))]
pub fn find(query: &str, db_path: &Path, table_name: &str) -> Option<Vec<Record>> {
    if !db_path.exists() {
        warn!("Database not found at {}", db_path.display());
        return None;
    }

    match search_table(query, db_path, table_name) {
        Ok(rows) if rows.is_empty() => {
            info!("No matches for '{}'", query);
            None
        }
        Ok(rows) => {
            info!("Found {} matching rows", rows.len());
            Some(rows)
        }
        Err(e) => {
            warn!("Database search failed: {}", e);
            None
        }
    }
}

/// Run the match query against an existing database.
///
/// Matching is a substring `LIKE` on `title` or `scraped_text`, so it is
/// case-insensitive for ASCII only.
pub fn search_table(query: &str, db_path: &Path, table_name: &str) -> Result<Vec<Record>> {
    if !db_path.exists() {
        return Err(GleanerError::InvalidInput(format!(
            "Database {} does not exist",
            db_path.display()
        )));
    }

    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let sql = format!(
        "SELECT * FROM {} WHERE title LIKE ?1 OR scraped_text LIKE ?1",
        quote_ident(table_name)
    );
    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let pattern = format!("%{}%", query);
    let rows = stmt.query_map(params![pattern], |row| {
        let mut record = Record::new();
        for (index, name) in columns.iter().enumerate() {
            let value: SqlValue = row.get(index)?;
            record.insert(name.clone(), from_sql_value(value));
        }
        Ok(record)
    })?;

    let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("Query returned {} rows", records.len());
    Ok(records)
}
