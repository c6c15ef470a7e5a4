//! CLI module for Gleaner.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gleaner - Educational Content Harvester
///
/// Searches the web for educational material, scrapes the pages and keeps the
/// text as CSV, Excel, PDF or a searchable SQLite table.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GLEANER_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Gleaner and write a default configuration
    Init,

    /// Check credentials, directories and the database
    Doctor,

    /// Search the web for educational content
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        max_results: Option<u32>,

        /// Print results as JSON (input for `gleaner scrape`)
        #[arg(long)]
        json: bool,
    },

    /// Scrape the pages of saved search results
    Scrape {
        /// Search results JSON file ('-' for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Write scraped articles to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save records from a JSON file
    Save {
        /// JSON array of records ('-' for stdin)
        #[arg(short, long)]
        input: String,

        /// Output filename without extension
        #[arg(short, long)]
        filename: String,

        /// Save format (csv, excel, pdf, sqlite)
        #[arg(long)]
        format: Option<String>,

        /// SQLite database path (sqlite format)
        #[arg(long)]
        db: Option<String>,

        /// Table name (sqlite format)
        #[arg(long)]
        table: Option<String>,
    },

    /// Search, scrape and save in one step
    Harvest {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        max_results: Option<u32>,

        /// Output filename without extension
        #[arg(short, long)]
        filename: String,

        /// Save format (csv, excel, pdf, sqlite)
        #[arg(long)]
        format: Option<String>,
    },

    /// Find saved articles by keyword
    Find {
        /// Keyword or phrase
        query: String,

        /// SQLite database path
        #[arg(long)]
        db: Option<String>,

        /// Table name
        #[arg(long)]
        table: Option<String>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tool definitions offered to agents
    Tools,

    /// Start MCP server for AI assistant integration
    Mcp,

    /// Start HTTP API server exposing the tools
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_harvest() {
        let cli = Cli::try_parse_from([
            "gleaner", "-vv", "harvest", "photosynthesis", "-n", "3", "--filename", "plants",
            "--format", "pdf",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Harvest {
                query,
                max_results,
                filename,
                format,
            } => {
                assert_eq!(query, "photosynthesis");
                assert_eq!(max_results, Some(3));
                assert_eq!(filename, "plants");
                assert_eq!(format.as_deref(), Some("pdf"));
            }
            other => panic!("Expected Harvest, got {:?}", other),
        }
    }

    #[test]
    fn test_scrape_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["gleaner", "scrape"]).unwrap();
        match cli.command {
            Commands::Scrape { input, output } => {
                assert_eq!(input, "-");
                assert!(output.is_none());
            }
            other => panic!("Expected Scrape, got {:?}", other),
        }
    }

    #[test]
    fn test_save_requires_filename() {
        assert!(Cli::try_parse_from(["gleaner", "save", "--input", "data.json"]).is_err());
    }
}
