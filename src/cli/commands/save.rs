//! Save command implementation.

use super::read_json;
use crate::cli::Output;
use crate::config::Settings;
use crate::persist::{persist, Destination, PersistOutcome, Record};
use anyhow::{bail, Result};

/// Persist records read from `input`.
pub fn run_save(
    input: &str,
    filename: &str,
    format: Option<&str>,
    db: Option<&str>,
    table: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let records: Vec<Record> = read_json(input)?;
    let format = format.unwrap_or(settings.storage.default_format.as_str());

    let destination = Destination::new(
        settings.output_path(filename),
        db.map(Settings::expand_path)
            .unwrap_or_else(|| settings.db_path()),
        table.unwrap_or(settings.storage.table_name.as_str()),
    );

    report(&persist(&records, format, &destination))
}

/// Print a persist outcome; failures become errors.
pub(super) fn report(outcome: &PersistOutcome) -> Result<()> {
    match outcome {
        PersistOutcome::Saved { .. } => Output::success(&outcome.message()),
        PersistOutcome::Skipped { .. } => Output::warning(&outcome.message()),
        PersistOutcome::Failed { .. } => {
            Output::error(&outcome.message());
            bail!("{}", outcome.message());
        }
    }
    Ok(())
}
