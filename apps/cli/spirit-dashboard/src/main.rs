use spirit_dashboard::cli::Cli;
use spirit_dashboard::commands;
use spirit_dashboard::context::AppContext;
use spirit_dashboard::error::DashboardError;
use spirit_dashboard::logger::initialize as LoggerInitialize;
use spirit_dashboard::{APP_DIR_NAME, LOG_DIR_NAME};

use spirit_client::config::default_config_dir;
use spirit_client::{DashboardConfig, FileTokenStore};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{}", serde_json::to_string_pretty(&e).unwrap_or_else(|_| e.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, DashboardError> {
    let log_dir = log_dir()?;
    create_dir_all(&log_dir).map_err(|e| DashboardError::Dashboard {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir, cli.verbose)?;
    info!("Log directory: {}", log_dir.display());

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => default_config_dir()?,
    };
    let config = DashboardConfig::load_layered(&config_dir)?;
    let token_store = Arc::new(FileTokenStore::in_data_dir()?);

    let ctx = AppContext::new(config, token_store)?;
    let output = commands::run(cli.command, &ctx).await?;

    Ok(serde_json::to_string_pretty(&output)?)
}

#[track_caller]
fn log_dir() -> Result<PathBuf, DashboardError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(LOG_DIR_NAME))
        .ok_or_else(|| DashboardError::Dashboard {
            message: String::from("Failed to get log directory"),
            location: ErrorLocation::from(Location::caller()),
        })
}
