//! Error types for Gleaner.

use thiserror::Error;

/// Library-level error type for Gleaner operations.
#[derive(Error, Debug)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Search provider error: {0}")]
    SearchProvider(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Scrape failed for {url}: {reason}")]
    Scrape { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tool error: {0}")]
    Tool(String),
}

/// Result type alias for Gleaner operations.
pub type Result<T> = std::result::Result<T, GleanerError>;
