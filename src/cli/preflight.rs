//! Pre-flight checks before network or database work.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{GleanerError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Web search requires the provider credential.
    Search,
    /// Keyword lookup requires an existing database.
    Find,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Search => {
            settings.search.resolve_api_key()?;
        }
        Operation::Find => {
            check_database(&settings.db_path())?;
        }
    }
    Ok(())
}

/// Check that a database file exists.
pub fn check_database(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(GleanerError::Config(format!(
            "No database at {}. Save data with --format sqlite first.",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_requires_credential() {
        let mut settings = Settings::default();
        settings.search.api_key_env = "GLEANER_TEST_UNSET_PREFLIGHT_KEY".to_string();
        assert!(matches!(
            check(Operation::Search, &settings),
            Err(GleanerError::MissingCredential(_))
        ));

        settings.search.api_key = Some("tvly-test".to_string());
        assert!(check(Operation::Search, &settings).is_ok());
    }

    #[test]
    fn test_find_requires_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.db_path = dir.path().join("missing.db").display().to_string();
        assert!(check(Operation::Find, &settings).is_err());

        std::fs::write(dir.path().join("missing.db"), b"").unwrap();
        assert!(check(Operation::Find, &settings).is_ok());
    }
}
