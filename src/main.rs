//! psx2-store - Entry Point
//!
//! Operator CLI over per-game settings, imported patch documents, cover art
//! and onboarding readiness.

use log::{error, info};
use std::io;
use std::process::ExitCode;

use psx2_store::commands::{AppContext, CommandResult, handle_command, parse_invocation};
use psx2_store::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_invocation(&args);

    let config = match &invocation.config_path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Primary root: {}", config.primary_root);

    let ctx = match AppContext::from_config(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to open preferences: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout();
    match handle_command(&ctx, invocation.command, &mut stdout).await {
        CommandResult::Success => ExitCode::SUCCESS,
        CommandResult::Failed => ExitCode::FAILURE,
    }
}
