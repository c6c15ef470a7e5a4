//! Doctor command - verify credentials and configuration.

use crate::cli::preflight::check_database;
use crate::cli::Output;
use crate::config::Settings;
use crate::persist::SaveFormat;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks against `config_path`, or the default location.
pub fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("Gleaner Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Search").bold());
    let key_check = check_api_key(settings);
    key_check.print();
    checks.push(key_check);

    println!();

    println!("{}", style("Storage").bold());
    let storage_checks = vec![
        check_directory("Data directory", &settings.data_dir()),
        check_directory(
            "Output directory",
            &Settings::expand_path(&settings.storage.output_dir),
        ),
        check_db(settings),
        check_default_format(settings),
    ];
    for check in &storage_checks {
        check.print();
    }
    checks.extend(storage_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::default_config_path);
    let config_check = check_config_file(&config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Gleaner.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Gleaner is ready to use.");
    }

    Ok(())
}

fn check_api_key(settings: &Settings) -> CheckResult {
    let name = settings.search.api_key_env.as_str();
    match settings.search.resolve_api_key() {
        Ok(key) => CheckResult::ok(name, &format!("configured ({})", mask(&key))),
        Err(_) => CheckResult::error(
            name,
            "not set",
            &format!("Set with: export {}='tvly-...'", name),
        ),
    }
}

/// Keep only the ends of a secret.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_directory(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        CheckResult::ok(name, &path.display().to_string())
    } else {
        CheckResult::warning(
            name,
            &format!("{} (will be created)", path.display()),
            "Directory will be created on first use",
        )
    }
}

fn check_db(settings: &Settings) -> CheckResult {
    let db_path = settings.db_path();
    match check_database(&db_path) {
        Ok(()) => {
            let size = std::fs::metadata(&db_path)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "unknown size".to_string());
            CheckResult::ok("Database", &format!("{} ({})", db_path.display(), size))
        }
        Err(_) => CheckResult::warning(
            "Database",
            &format!("{} (not created yet)", db_path.display()),
            "Database will be created on the first sqlite save",
        ),
    }
}

fn check_default_format(settings: &Settings) -> CheckResult {
    let tag = settings.storage.default_format.as_str();
    match tag.parse::<SaveFormat>() {
        Ok(format) => CheckResult::ok("Default format", &format.to_string()),
        Err(_) => CheckResult::error(
            "Default format",
            &format!("'{}' is not supported", tag),
            "Use one of: csv, excel, pdf, sqlite",
        ),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: gleaner init (or gleaner config edit)",
        )
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
