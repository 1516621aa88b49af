//! Validate config command implementation
//!
//! This module implements the `validate-config` command. It never contacts
//! the API; the token is reported only as present.

use crate::cli::{exit_code_for, EXIT_SUCCESS};
use crate::config::UsageExportConfig;
use crate::core::export::BackoffPolicy;
use crate::domain::Result;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `loaded` is the outcome of loading configuration at startup.
    pub async fn execute(
        &self,
        settings_path: Option<&Path>,
        loaded: &Result<UsageExportConfig>,
    ) -> anyhow::Result<i32> {
        match settings_path {
            Some(path) => {
                tracing::info!(config_path = %path.display(), "Validating configuration");
                println!("🔍 Validating configuration (settings file: {})", path.display());
            }
            None => {
                tracing::info!("Validating configuration from environment");
                println!("🔍 Validating configuration from environment");
            }
        }
        println!();

        let config = match loaded {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(exit_code_for(e));
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print!("{}", render_summary(config));
        Ok(EXIT_SUCCESS)
    }
}

/// Human-readable configuration summary with the token redacted
fn render_summary(config: &UsageExportConfig) -> String {
    let policy = BackoffPolicy::from_config(&config.poll);
    let mut lines = vec![
        "Configuration Summary:".to_string(),
        "  API Token: set (redacted)".to_string(),
        format!("  Primary Organization: {}", config.primary_org_id),
        format!("  Start: {}", config.time_range.start_wire()),
        format!("  End: {}", config.time_range.end_wire()),
        format!("  API Base URL: {}", config.api.base_url),
        format!(
            "  HTTP Timeouts: {}s request, {}s connect",
            config.api.timeout_seconds, config.api.connect_timeout_seconds
        ),
        format!(
            "  Polling: {} attempts, {}s initial delay, +{}s per attempt, {}s max delay",
            config.poll.max_attempts,
            config.poll.initial_delay_secs,
            config.poll.delay_increment_secs,
            config.poll.max_delay_secs
        ),
        format!(
            "  Worst-Case Wait: {}s",
            policy.worst_case_wait().as_secs()
        ),
        format!("  Report Directory: {}", config.output.report_dir.display()),
        format!("  Filename Prefix: {}", config.output.filename_prefix),
    ];
    if config.logging.local_enabled {
        lines.push(format!(
            "  File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    } else {
        lines.push("  File Logging: disabled".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
