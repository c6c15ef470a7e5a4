//! Gleaner CLI entry point.

use anyhow::Result;
use clap::Parser;
use gleaner::cli::{commands, Cli, Commands};
use gleaner::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Logs go to stderr; stdout carries command output and MCP traffic.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("gleaner={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config_path.as_deref())?;
        }

        Commands::Search {
            query,
            max_results,
            json,
        } => {
            commands::run_search(query, *max_results, *json, settings).await?;
        }

        Commands::Scrape { input, output } => {
            commands::run_scrape(input, output.clone(), settings).await?;
        }

        Commands::Save {
            input,
            filename,
            format,
            db,
            table,
        } => {
            commands::run_save(
                input,
                filename,
                format.as_deref(),
                db.as_deref(),
                table.as_deref(),
                settings,
            )?;
        }

        Commands::Harvest {
            query,
            max_results,
            filename,
            format,
        } => {
            commands::run_harvest(query, *max_results, filename, format.as_deref(), settings)
                .await?;
        }

        Commands::Find {
            query,
            db,
            table,
            json,
        } => {
            commands::run_find(query, db.as_deref(), table.as_deref(), *json, settings)?;
        }

        Commands::Tools => {
            commands::run_tools()?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
