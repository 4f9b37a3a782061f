//! Lunaris command-line entry point
//!
//! Exports team records to CSV and drives the notification store. Logs go to
//! stderr so CSV on stdout stays clean.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lunaris_app::adapters::SqliteStore;
use lunaris_app::{AppState, AppStateBuilder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database_path = Some(database);
    }

    match cli.command {
        Commands::Export(args) => {
            let state = build_state(&config).await?;
            commands::run_export(&state, &args)
        }
        Commands::Notify(command) => {
            let state = build_state(&config).await?;
            commands::run_notify(&state, command).await
        }
    }
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db_path = config.database_path()?;
    tracing::debug!("Notification store: {}", db_path.display());

    let store = SqliteStore::new(&db_path)
        .await
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let state = AppStateBuilder::new()
        .notification_repository(Arc::new(store))
        .notification_settings(config.notifications.clone())
        .export_settings(config.export.clone())
        .build()?;
    Ok(state)
}
