//! Integration tests for configuration loading and validation
//!
//! Variables are resolved through an injected lookup, so these tests never
//! touch the process environment and can run in parallel.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use usage_export::config::{load_config_with, UsageExportConfig};
use usage_export::core::export::BackoffPolicy;
use usage_export::domain::Result;

fn required_vars() -> HashMap<String, String> {
    HashMap::from([
        ("CIRCLE_TOKEN".to_string(), "token-from-env".to_string()),
        ("PRIMARY_ORG_ID".to_string(), "org-primary".to_string()),
        ("START_DATE".to_string(), "2024-11-01T00:00:00Z".to_string()),
        ("END_DATE".to_string(), "2024-11-30T23:59:59Z".to_string()),
    ])
}

fn settings_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load(vars: &HashMap<String, String>, file: Option<&NamedTempFile>) -> Result<UsageExportConfig> {
    load_config_with(file.map(|f| f.path()), |name: &str| vars.get(name).cloned())
}

#[test]
fn test_load_complete_settings_file() {
    let file = settings_file(
        r#"
[api]
base_url = "https://circleci.example.com"
timeout_seconds = 20
connect_timeout_seconds = 5
download_timeout_seconds = 3600

[poll]
initial_delay_secs = 15
delay_increment_secs = 15
max_delay_secs = 240
max_attempts = 20

[output]
report_dir = "${EXPORT_ROOT}/usage"
filename_prefix = "shared_plan"

[logging]
local_enabled = true
local_path = "${EXPORT_ROOT}/logs"
local_rotation = "hourly"
"#,
    );
    let mut vars = required_vars();
    vars.insert("EXPORT_ROOT".to_string(), "/srv/export".to_string());

    let config = load(&vars, Some(&file)).unwrap();

    assert_eq!(config.api.base_url, "https://circleci.example.com");
    assert_eq!(config.api.timeout_seconds, 20);
    assert_eq!(config.api.connect_timeout_seconds, 5);
    assert_eq!(config.api.download_timeout_seconds, 3600);
    assert_eq!(config.poll.initial_delay_secs, 15);
    assert_eq!(config.poll.max_attempts, 20);
    assert_eq!(
        config.output.report_dir,
        PathBuf::from("/srv/export/usage")
    );
    assert_eq!(config.output.filename_prefix, "shared_plan");
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/srv/export/logs");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_defaults_without_settings_file() {
    let config = load(&required_vars(), None).unwrap();

    assert_eq!(config.api.base_url, "https://circleci.com");
    assert_eq!(config.api.timeout_seconds, 60);
    assert_eq!(config.api.download_timeout_seconds, 1800);
    assert_eq!(config.output.report_dir, PathBuf::from("usage_reports"));
    assert_eq!(config.output.filename_prefix, "all_orgs");
    assert!(!config.logging.local_enabled);

    let policy = BackoffPolicy::from_config(&config.poll);
    assert_eq!(policy.max_attempts, 30);
    assert_eq!(policy.max_delay.as_secs(), 300);
}

#[test]
fn test_environment_overrides_settings_file() {
    let file = settings_file(
        r#"
[poll]
max_attempts = 20

[output]
report_dir = "from-file"
"#,
    );
    let mut vars = required_vars();
    vars.insert("USAGE_EXPORT_POLL_MAX_ATTEMPTS".to_string(), "3".to_string());
    vars.insert("USAGE_EXPORT_REPORT_DIR".to_string(), "from-env".to_string());

    let config = load(&vars, Some(&file)).unwrap();

    assert_eq!(config.poll.max_attempts, 3);
    assert_eq!(config.output.report_dir, PathBuf::from("from-env"));
}

#[test]
fn test_missing_substitution_variable() {
    let file = settings_file("[output]\nreport_dir = \"${NOT_DEFINED_ANYWHERE}\"\n");

    let err = load(&required_vars(), Some(&file)).unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("NOT_DEFINED_ANYWHERE"));
}

#[test]
fn test_invalid_toml() {
    let file = settings_file("[poll\nmax_attempts = ");

    let err = load(&required_vars(), Some(&file)).unwrap_err();

    assert!(err.is_configuration());
}

#[test]
fn test_poll_ceiling_above_five_minutes_is_rejected() {
    let file = settings_file("[poll]\nmax_delay_secs = 600\n");

    let err = load(&required_vars(), Some(&file)).unwrap_err();

    assert!(err.is_configuration());
}

#[test]
fn test_attempt_budget_above_thirty_is_rejected() {
    let mut vars = required_vars();
    vars.insert(
        "USAGE_EXPORT_POLL_MAX_ATTEMPTS".to_string(),
        "1000".to_string(),
    );

    let err = load(&vars, None).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("poll.max_attempts"));

    let file = settings_file("[poll]\nmax_attempts = 31\n");
    assert!(load(&required_vars(), Some(&file)).unwrap_err().is_configuration());
}

#[test]
fn test_worst_case_sleep_within_budget() {
    let mut vars = required_vars();
    vars.insert("USAGE_EXPORT_POLL_MAX_ATTEMPTS".to_string(), "30".to_string());
    vars.insert("USAGE_EXPORT_POLL_INITIAL_DELAY_SECS".to_string(), "300".to_string());

    let config = load(&vars, None).unwrap();
    let policy = BackoffPolicy::from_config(&config.poll);

    assert!(policy.worst_case_wait().as_secs() <= 30 * 300);
}

#[test]
fn test_download_timeout_override() {
    let mut vars = required_vars();
    vars.insert(
        "USAGE_EXPORT_DOWNLOAD_TIMEOUT_SECONDS".to_string(),
        "7200".to_string(),
    );

    let config = load(&vars, None).unwrap();
    assert_eq!(config.api.download_timeout_seconds, 7200);

    vars.insert(
        "USAGE_EXPORT_DOWNLOAD_TIMEOUT_SECONDS".to_string(),
        "0".to_string(),
    );
    assert!(load(&vars, None).unwrap_err().is_configuration());
}

#[test]
fn test_unsupported_base_url_scheme_is_rejected() {
    let mut vars = required_vars();
    vars.insert(
        "USAGE_EXPORT_BASE_URL".to_string(),
        "ftp://circleci.com".to_string(),
    );

    let err = load(&vars, None).unwrap_err();

    assert!(err.is_configuration());
}

#[test]
fn test_token_is_redacted_in_debug_output() {
    let config = load(&required_vars(), None).unwrap();

    let debug = format!("{config:?}");

    assert!(!debug.contains("token-from-env"));
}
