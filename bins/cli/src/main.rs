//! Blobvault command-line client.
//!
//! Loads configuration, wires every configured storage backend and runs a
//! single command against the storage facade.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blobvault_core::storage::{BlobStorage, StorageSelector};
use blobvault_shared::{AppConfig, AppError, LoggingConfig};

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let selector = StorageSelector::from_settings(&config.storage).map_err(AppError::from)?;
    info!(providers = ?selector.providers(), "Storage configured");
    let storage = BlobStorage::new(Arc::new(selector));

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, &storage, &config.storage, &mut stdout).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("error[{}]: {err}", err.error_code());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout carries only command output.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let json = logging.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let plain = (!logging.json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}
