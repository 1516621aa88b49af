// Usage Export - Shared Plan Usage Report Downloader
// Copyright (c) 2025 Usage Export Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use usage_export::cli::{exit_code_for, Cli, Commands, EXIT_CONFIG_ERROR, EXIT_FAILURE};
use usage_export::config::{load_config, UsageExportConfig};
use usage_export::domain::Result;
use usage_export::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Configuration is loaded once; failures are reported by the command
    let loaded = load_config(cli.config.as_deref());

    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let guard = match init_logging(log_level, &logging_config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Usage Export - Shared Plan Usage Report Downloader"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli, &loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: &Result<UsageExportConfig>) -> anyhow::Result<i32> {
    match (&cli.command, loaded) {
        (Commands::ValidateConfig(args), _) => args.execute(cli.config.as_deref(), loaded).await,
        (Commands::Export(args), Ok(config)) => args.execute(config).await,
        (Commands::ListOrgs(args), Ok(config)) => args.execute(config).await,
        (_, Err(e)) => {
            usage_export::log_error_with_context!(e, "Failed to load configuration");
            eprintln!("Configuration error: {e}");
            Ok(exit_code_for(e))
        }
    }
}
