//! Configuration schema types
//!
//! [`Settings`] holds the non-secret tunables that may come from an optional
//! TOML file. [`UsageExportConfig`] is the complete, validated configuration
//! assembled once at startup and passed by reference to every component.

use crate::config::SecretString;
use crate::domain::{OrganizationId, TimeRange};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hard ceiling on the delay between two status checks
pub const MAX_POLL_DELAY_SECS: u64 = 300;

/// Hard ceiling on the number of status checks for one job
pub const MAX_POLL_ATTEMPTS: u32 = 30;

/// Complete configuration for one export run
#[derive(Debug, Clone)]
pub struct UsageExportConfig {
    /// API token sent with every authenticated request
    pub token: SecretString,

    /// Organization that owns the shared plan
    pub primary_org_id: OrganizationId,

    /// Reporting window
    pub time_range: TimeRange,

    /// Remote API settings
    pub api: ApiConfig,

    /// Status polling settings
    pub poll: PollConfig,

    /// Report output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl UsageExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        if self.token.expose_secret().is_empty() {
            return Err("API token cannot be empty".to_string());
        }
        self.api.validate()?;
        self.poll.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Settings that may be supplied through a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the usage API host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds for API calls, independent of the poll backoff
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Timeout in seconds for one artifact download, body included
    #[serde(default = "default_download_timeout_seconds")]
    pub download_timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }
        if self.connect_timeout_seconds == 0 {
            return Err("api.connect_timeout_seconds must be greater than 0".to_string());
        }
        if self.download_timeout_seconds == 0 {
            return Err("api.download_timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            download_timeout_seconds: default_download_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

/// Status polling settings
///
/// The delay before re-polling grows linearly from `initial_delay_secs` by
/// `delay_increment_secs` per attempt and is capped at `max_delay_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    #[serde(default = "default_delay_increment_secs")]
    pub delay_increment_secs: u64,

    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,

    /// Total number of status checks before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("poll.max_attempts must be at least 1".to_string());
        }
        if self.max_attempts > MAX_POLL_ATTEMPTS {
            return Err(format!(
                "poll.max_attempts cannot exceed {MAX_POLL_ATTEMPTS}"
            ));
        }
        if self.initial_delay_secs == 0 {
            return Err("poll.initial_delay_secs must be greater than 0".to_string());
        }
        if self.max_delay_secs > MAX_POLL_DELAY_SECS {
            return Err(format!(
                "poll.max_delay_secs cannot exceed {MAX_POLL_DELAY_SECS} seconds"
            ));
        }
        if self.initial_delay_secs > self.max_delay_secs {
            return Err("poll.initial_delay_secs cannot exceed poll.max_delay_secs".to_string());
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            delay_increment_secs: default_delay_increment_secs(),
            max_delay_secs: default_max_delay_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the compressed and decompressed reports
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Leading part of every report file name
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.report_dir.as_os_str().is_empty() {
            return Err("output.report_dir cannot be empty".to_string());
        }
        if self.filename_prefix.is_empty() {
            return Err("output.filename_prefix cannot be empty".to_string());
        }
        if self
            .filename_prefix
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(format!(
                "output.filename_prefix '{}' contains path separators or control characters",
                self.filename_prefix
            ));
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !matches!(self.local_rotation.as_str(), "daily" | "hourly" | "never") {
            return Err(format!(
                "logging.local_rotation must be one of: daily, hourly, never (got '{}')",
                self.local_rotation
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path is required when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_base_url() -> String {
    "https://circleci.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_download_timeout_seconds() -> u64 {
    1800
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_initial_delay_secs() -> u64 {
    30
}

fn default_delay_increment_secs() -> u64 {
    30
}

fn default_max_delay_secs() -> u64 {
    MAX_POLL_DELAY_SECS
}

fn default_max_attempts() -> u32 {
    MAX_POLL_ATTEMPTS
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("usage_reports")
}

fn default_filename_prefix() -> String {
    "all_orgs".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
