//! Configuration loader
//!
//! Required values (token, primary organization, time range) come from the
//! environment. Non-secret tunables come from an optional TOML settings file,
//! which may in turn be overridden by `USAGE_EXPORT_*` variables.
//!
//! Loading takes a variable lookup function so the whole pipeline can be
//! exercised in tests without touching the process environment.

use super::schema::{Settings, UsageExportConfig};
use super::secret::secret_string;
use crate::domain::errors::UsageExportError;
use crate::domain::result::Result;
use crate::domain::{OrganizationId, TimeRange};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// API token
pub const TOKEN_VAR: &str = "CIRCLE_TOKEN";

/// Organization owning the shared plan
pub const PRIMARY_ORG_VAR: &str = "PRIMARY_ORG_ID";

/// Start of the reporting window (`YYYY-MM-DDThh:mm:ssZ`)
pub const START_DATE_VAR: &str = "START_DATE";

/// End of the reporting window (`YYYY-MM-DDThh:mm:ssZ`)
pub const END_DATE_VAR: &str = "END_DATE";

/// Loads configuration from the process environment
///
/// # Arguments
///
/// * `settings_path` - Optional TOML file with non-secret settings
///
/// # Errors
///
/// Returns [`UsageExportError::Configuration`] if:
/// - a required variable is missing or empty
/// - a timestamp is malformed or the range is empty or inverted
/// - the settings file cannot be read or parsed
/// - an override or setting fails validation
///
/// # Examples
///
/// ```no_run
/// use usage_export::config::load_config;
///
/// let config = load_config(None).expect("Failed to load config");
/// println!("Reporting on {}", config.time_range);
/// ```
pub fn load_config(settings_path: Option<&Path>) -> Result<UsageExportConfig> {
    load_config_with(settings_path, |name| std::env::var(name).ok())
}

/// Loads configuration using `lookup` to resolve variables
pub fn load_config_with<F>(settings_path: Option<&Path>, lookup: F) -> Result<UsageExportConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = match settings_path {
        Some(path) => load_settings(path, &lookup)?,
        None => Settings::default(),
    };

    apply_env_overrides(&mut settings, &lookup)?;

    let token = required(&lookup, TOKEN_VAR)?;
    let primary_org_id = OrganizationId::new(required(&lookup, PRIMARY_ORG_VAR)?)
        .map_err(UsageExportError::Configuration)?;
    let start = required(&lookup, START_DATE_VAR)?;
    let end = required(&lookup, END_DATE_VAR)?;
    let time_range = TimeRange::parse(&start, &end)?;

    let config = UsageExportConfig {
        token: secret_string(token),
        primary_org_id,
        time_range,
        api: settings.api,
        poll: settings.poll,
        output: settings.output,
        logging: settings.logging,
    };

    config.validate().map_err(|e| {
        UsageExportError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Reads a settings file, substituting `${VAR}` placeholders first
fn load_settings<F>(path: &Path, lookup: &F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        return Err(UsageExportError::Configuration(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        UsageExportError::Configuration(format!(
            "Failed to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents, lookup)?;

    toml::from_str(&contents).map_err(|e| {
        UsageExportError::Configuration(format!(
            "Failed to parse settings file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Substitutes `${VAR_NAME}` placeholders, skipping comment lines
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars<F>(input: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| UsageExportError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match lookup(var_name) {
                Some(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(UsageExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `USAGE_EXPORT_*` overrides on top of file settings
fn apply_env_overrides<F>(settings: &mut Settings, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    // API overrides
    if let Some(val) = lookup("USAGE_EXPORT_BASE_URL") {
        settings.api.base_url = val.trim_end_matches('/').to_string();
    }
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_HTTP_TIMEOUT_SECONDS")? {
        settings.api.timeout_seconds = val;
    }
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_CONNECT_TIMEOUT_SECONDS")? {
        settings.api.connect_timeout_seconds = val;
    }
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_DOWNLOAD_TIMEOUT_SECONDS")? {
        settings.api.download_timeout_seconds = val;
    }

    // Poll overrides
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_POLL_INITIAL_DELAY_SECS")? {
        settings.poll.initial_delay_secs = val;
    }
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_POLL_DELAY_INCREMENT_SECS")? {
        settings.poll.delay_increment_secs = val;
    }
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_POLL_MAX_DELAY_SECS")? {
        settings.poll.max_delay_secs = val;
    }
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_POLL_MAX_ATTEMPTS")? {
        settings.poll.max_attempts = val;
    }

    // Output overrides
    if let Some(val) = lookup("USAGE_EXPORT_REPORT_DIR") {
        settings.output.report_dir = PathBuf::from(val);
    }
    if let Some(val) = lookup("USAGE_EXPORT_FILENAME_PREFIX") {
        settings.output.filename_prefix = val;
    }

    // Logging overrides
    if let Some(val) = parsed(lookup, "USAGE_EXPORT_LOG_LOCAL_ENABLED")? {
        settings.logging.local_enabled = val;
    }
    if let Some(val) = lookup("USAGE_EXPORT_LOG_LOCAL_PATH") {
        settings.logging.local_path = val;
    }

    Ok(())
}

/// Reads a required variable, rejecting missing and blank values
fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(UsageExportError::Configuration(format!(
            "{name} is not set. Please set {name} in your environment or .env file"
        ))),
    }
}

/// Reads and parses an optional variable
fn parsed<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|e| {
            UsageExportError::Configuration(format!("{name} has invalid value '{raw}': {e}"))
        }),
        None => Ok(None),
    }
}
