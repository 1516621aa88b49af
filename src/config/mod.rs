//! Configuration management for the usage exporter.
//!
//! # Overview
//!
//! Configuration is resolved once at startup into an immutable
//! [`UsageExportConfig`] that is passed by reference into every component.
//! Nothing below `main` reads the environment directly.
//!
//! Required environment variables:
//!
//! ```bash
//! export CIRCLE_TOKEN="..."
//! export PRIMARY_ORG_ID="c0ffee00-1234-4bad-97dc-d78268e01398"
//! export START_DATE="2024-11-01T00:00:00Z"
//! export END_DATE="2024-11-30T23:59:59Z"
//! ```
//!
//! A `.env` file in the working directory is honoured as well.
//!
//! # Optional settings file
//!
//! ```toml
//! [api]
//! base_url = "https://circleci.com"
//! timeout_seconds = 60
//!
//! [poll]
//! initial_delay_secs = 30
//! delay_increment_secs = 30
//! max_delay_secs = 300
//! max_attempts = 30
//!
//! [output]
//! report_dir = "${REPORTS_ROOT}/usage_reports"
//! filename_prefix = "all_orgs"
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! ```
//!
//! Any of these can be overridden with `USAGE_EXPORT_*` variables, e.g.
//! `USAGE_EXPORT_REPORT_DIR` or `USAGE_EXPORT_POLL_MAX_ATTEMPTS`.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_with};
pub use schema::{
    ApiConfig, LoggingConfig, OutputConfig, PollConfig, Settings, UsageExportConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
