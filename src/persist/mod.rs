//! Persistence of structured records.
//!
//! Records are coerced into a [`RecordSet`] and handed to exactly one writer,
//! chosen by [`SaveFormat`]. Every write fully replaces the destination.
//! Each call reports a [`PersistOutcome`]; deciding whether a failure is fatal
//! is left to the caller.

mod document;
mod spreadsheet;
pub(crate) mod sqlite;
mod tabular;

pub use document::to_latin1;
pub use spreadsheet::MAX_CELL_CHARS;

use crate::error::{GleanerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info, instrument, warn};

/// A flat, ordered mapping from field name to scalar value.
pub type Record = serde_json::Map<String, Value>;

/// Column holding URLs; always stored as plain text.
pub const URL_COLUMN: &str = "url";

/// Records coerced into a uniform table.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Build a table from records.
    ///
    /// Columns are the union of all keys in first-seen order; missing cells
    /// are null. A `url` value that is not already text is converted to text.
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| {
                        let value = record.get(column).cloned().unwrap_or(Value::Null);
                        if column == URL_COLUMN {
                            coerce_url(value)
                        } else {
                            value
                        }
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `row` in the named column, if the column exists.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Cell text of `row` in the named column; empty when absent.
    pub fn text(&self, row: usize, column: &str) -> String {
        self.get(row, column).map(cell_text).unwrap_or_default()
    }
}

fn coerce_url(value: Value) -> Value {
    match value {
        Value::Null | Value::String(_) => value,
        other => Value::String(cell_text(&other)),
    }
}

/// Render a cell as text: null is empty, strings are verbatim.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Delimited table, `<filename>.csv`.
    Csv,
    /// Spreadsheet workbook, `<filename>.xlsx`.
    Excel,
    /// Paginated document, `<filename>.pdf`.
    Pdf,
    /// SQLite table.
    Sqlite,
}

/// Writes a record set to a destination and describes where it went.
pub type WriterFn = fn(&RecordSet, &Destination) -> Result<String>;

impl SaveFormat {
    /// The writer for this format.
    pub fn writer(self) -> WriterFn {
        match self {
            SaveFormat::Csv => tabular::write_csv,
            SaveFormat::Excel => spreadsheet::write_xlsx,
            SaveFormat::Pdf => document::write_pdf,
            SaveFormat::Sqlite => sqlite::write_table,
        }
    }

    /// File extension, for file-backed formats.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            SaveFormat::Csv => Some("csv"),
            SaveFormat::Excel => Some("xlsx"),
            SaveFormat::Pdf => Some("pdf"),
            SaveFormat::Sqlite => None,
        }
    }
}

impl FromStr for SaveFormat {
    type Err = GleanerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "tabular" => Ok(SaveFormat::Csv),
            "excel" | "xlsx" | "spreadsheet" => Ok(SaveFormat::Excel),
            "pdf" | "document" => Ok(SaveFormat::Pdf),
            "sqlite" | "db" | "database" | "relational" => Ok(SaveFormat::Sqlite),
            _ => Err(GleanerError::InvalidInput(format!(
                "Unsupported save format '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveFormat::Csv => write!(f, "csv"),
            SaveFormat::Excel => write!(f, "excel"),
            SaveFormat::Pdf => write!(f, "pdf"),
            SaveFormat::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Where a write lands.
#[derive(Debug, Clone)]
pub struct Destination {
    /// File path without extension, for file formats.
    pub file_stem: PathBuf,
    /// Database file, for the sqlite format.
    pub db_path: PathBuf,
    /// Table name, for the sqlite format.
    pub table_name: String,
}

impl Destination {
    pub fn new(
        file_stem: impl Into<PathBuf>,
        db_path: impl Into<PathBuf>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            file_stem: file_stem.into(),
            db_path: db_path.into(),
            table_name: table_name.into(),
        }
    }

    /// The output file for a file-backed format.
    pub fn file_for(&self, format: SaveFormat) -> Result<PathBuf> {
        format
            .extension()
            .map(|ext| self.file_path(ext))
            .ok_or_else(|| {
                GleanerError::InvalidInput(format!("{} is not written to a file", format))
            })
    }

    /// `<file_stem>.<ext>`, appending rather than replacing any dot suffix.
    pub fn file_path(&self, extension: &str) -> PathBuf {
        let mut name = self.file_stem.as_os_str().to_owned();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Result of one persist call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    /// Every row was written.
    Saved {
        format: SaveFormat,
        destination: String,
        rows: usize,
    },
    /// Nothing was attempted (empty input or unsupported format).
    Skipped { reason: String },
    /// The writer failed; the destination may be missing or stale.
    Failed { format: SaveFormat, reason: String },
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved { .. })
    }

    /// Human-readable summary.
    pub fn message(&self) -> String {
        match self {
            PersistOutcome::Saved {
                destination, rows, ..
            } => format!("Saved {} rows to {}", rows, destination),
            PersistOutcome::Skipped { reason } => reason.clone(),
            PersistOutcome::Failed { format, reason } => {
                format!("Saving as {} failed: {}", format, reason)
            }
        }
    }
}

/// Persist records, parsing the format tag at the boundary.
///
/// Empty input and unknown tags are skipped without touching the filesystem.
pub fn persist(records: &[Record], format: &str, destination: &Destination) -> PersistOutcome {
    if records.is_empty() {
        info!("Data is empty. Nothing to save.");
        return PersistOutcome::Skipped {
            reason: "Data is empty. Nothing to save.".to_string(),
        };
    }

    match format.parse::<SaveFormat>() {
        Ok(format) => persist_as(records, format, destination),
        Err(e) => {
            warn!("{}", e);
            PersistOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    }
}

/// Persist records in an already-parsed format.
#[instrument(skip(records, destination), fields(rows = records.len()))]
pub fn persist_as(
    records: &[Record],
    format: SaveFormat,
    destination: &Destination,
) -> PersistOutcome {
    if records.is_empty() {
        info!("Data is empty. Nothing to save.");
        return PersistOutcome::Skipped {
            reason: "Data is empty. Nothing to save.".to_string(),
        };
    }

    let set = RecordSet::from_records(records);
    let write = format.writer();

    match write(&set, destination) {
        Ok(location) => {
            info!("Data successfully saved to {}", location);
            PersistOutcome::Saved {
                format,
                destination: location,
                rows: set.len(),
            }
        }
        Err(e) => {
            error!("An error occurred while saving as {}: {}", format, e);
            PersistOutcome::Failed {
                format,
                reason: e.to_string(),
            }
        }
    }
}
