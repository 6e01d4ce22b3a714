//! Rolekeeper command line runtime.

#![forbid(unsafe_code)]

mod cli_config;
mod command;
mod runtime;

use std::sync::Arc;

use clap::Parser;
use rolekeeper_core::AppError;
use rolekeeper_infrastructure::InMemoryDirectoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli_config::CliConfig;
use crate::command::Cli;
use crate::runtime::CliRuntime;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    let directory = Arc::new(InMemoryDirectoryStore::load(&config.directory_path).await?);

    info!(
        directory_path = %config.directory_path.display(),
        command_prefix = %config.command_prefix,
        call_timeout = ?config.call_timeout,
        "rolekeeper-cli started"
    );

    let report = CliRuntime::new(config, directory).run(cli.command).await?;
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|error| AppError::Internal(format!("failed to render report: {error}")))?;
    println!("{rendered}");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
