//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the usage export using clap.

pub mod commands;

use crate::domain::UsageExportError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for any fatal error other than configuration
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for configuration errors
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Map a failed run to its process exit code
pub fn exit_code_for(error: &UsageExportError) -> i32 {
    if error.is_configuration() {
        EXIT_CONFIG_ERROR
    } else {
        EXIT_FAILURE
    }
}

/// Usage Export - shared plan usage report downloader
#[derive(Parser, Debug)]
#[command(name = "usage-export")]
#[command(version, about, long_about = None)]
#[command(author = "Usage Export Contributors")]
pub struct Cli {
    /// Path to an optional TOML settings file
    #[arg(short, long, env = "USAGE_EXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "USAGE_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a usage export job, wait for it and download the reports
    Export(commands::export::ExportArgs),

    /// List the organizations on the shared plan
    ListOrgs(commands::list_orgs::ListOrgsArgs),

    /// Validate configuration without contacting the API
    ValidateConfig(commands::validate::ValidateArgs),
}
