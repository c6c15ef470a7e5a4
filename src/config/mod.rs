//! Configuration module for Gleaner.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, ScrapeSettings, SearchSettings, Settings, StorageSettings};
