//! Gleaner - Educational Content Harvester
//!
//! Tools for finding, scraping and keeping educational material from the web.
//!
//! # Overview
//!
//! Gleaner allows you to:
//! - Search the web for educational content (Tavily)
//! - Scrape the paragraph text of every result page
//! - Save articles as CSV, Excel, PDF or an SQLite table
//! - Find saved articles again by keyword
//!
//! The same operations are offered to AI agents as tools, over MCP or HTTP.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `research` - Web search and result validation
//! - `scrape` - Page fetching and text extraction
//! - `persist` - CSV, XLSX, PDF and SQLite writers
//! - `retrieve` - Keyword lookup over saved tables
//! - `pipeline` - Search, scrape and persist in one run
//! - `tools` - Tool definitions and dispatch for agents
//! - `mcp` - MCP server over stdio
//!
//! # Example
//!
//! ```rust,no_run
//! use gleaner::config::Settings;
//! use gleaner::persist::SaveFormat;
//! use gleaner::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!
//!     let report = pipeline
//!         .harvest("introduction to algebra", 5, "algebra", SaveFormat::Sqlite)
//!         .await?;
//!     println!("{}", report.outcome.message());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod persist;
pub mod pipeline;
pub mod research;
pub mod retrieve;
pub mod scrape;
pub mod tools;

pub use error::{GleanerError, Result};
