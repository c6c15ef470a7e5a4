//! CLI command implementations.

mod config;
mod doctor;
mod find;
mod harvest;
mod init;
mod mcp;
mod save;
mod scrape;
mod search;
mod serve;
mod tools;

pub use config::run_config;
pub use doctor::run_doctor;
pub use find::run_find;
pub use harvest::run_harvest;
pub use init::run_init;
pub use mcp::run_mcp;
pub use save::run_save;
pub use scrape::run_scrape;
pub use search::run_search;
pub use serve::run_serve;
pub use tools::run_tools;

use anyhow::{Context, Result};
use std::io::Read;

/// Read a JSON document from a file, or stdin when `input` is `-`.
fn read_json<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
    let text = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };

    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", input))
}
