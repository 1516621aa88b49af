//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output on stderr
//! - Configurable log levels (`RUST_LOG` wins over `--log-level`)
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use usage_export::logging::init_logging;
//! use usage_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one status check
///
/// # Example
///
/// ```no_run
/// use usage_export::log_poll_attempt;
/// use usage_export::domain::{JobId, JobState};
///
/// let job_id = JobId::new("abc").unwrap();
/// log_poll_attempt!(&job_id, 1, 30, JobState::Processing);
/// ```
#[macro_export]
macro_rules! log_poll_attempt {
    ($job_id:expr, $attempt:expr, $max_attempts:expr, $state:expr) => {
        tracing::info!(
            job_id = %$job_id,
            attempt = $attempt,
            max_attempts = $max_attempts,
            state = %$state,
            "Checked export job status"
        );
    };
}

/// Log a transient failure that consumes an attempt
///
/// # Example
///
/// ```no_run
/// use usage_export::log_retry_attempt;
///
/// log_retry_attempt!(2, 30, "connection reset");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Transient error while checking job status, will retry"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use usage_export::log_error_with_context;
/// use usage_export::domain::UsageExportError;
///
/// let error = UsageExportError::Configuration("START_DATE is not set".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
