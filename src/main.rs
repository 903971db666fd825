//! `gerrit-sync` command-line entrypoint.
//!
//! Loads configuration, optionally overlays the wiki-hosted configuration,
//! and then either migrates the database (`--migrate-db`) or performs one sync
//! run.

use std::io::{self, Write};
use std::process::ExitCode;

use gerrit_sync::{SyncConfig, SyncError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SyncError> {
    let mut config = load_config()?;
    cli::overlay::apply(&mut config).await?;

    if config.migrate_db {
        return cli::migrations::run(&config);
    }

    cli::sync::run(&config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`SyncError::Config`] when ortho-config fails to parse arguments
/// or load configuration files.
fn load_config() -> Result<SyncConfig, SyncError> {
    SyncConfig::load().map_err(|error| {
        SyncError::Config(gerrit_sync::config::ConfigError::Load {
            message: error.to_string(),
        })
    })
}

/// Installs the `tracing` subscriber; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
