//! Domain error types
//!
//! This module defines the error hierarchy for the usage exporter.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Maximum number of characters of a response body kept in error messages
pub const BODY_EXCERPT_LIMIT: usize = 512;

const REQUEST_TIMEOUT: u16 = 408;
const TOO_MANY_REQUESTS: u16 = 429;

/// Main error type
///
/// Every fatal condition of an export run maps to exactly one variant.
/// All of them propagate to the top level and terminate the run.
#[derive(Debug, Error)]
pub enum UsageExportError {
    /// Bad or missing configuration values (raised before any network call)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Organization discovery failed or returned nothing usable
    #[error("Organization discovery failed: {0}")]
    Discovery(String),

    /// The export job could not be created
    #[error("Export job submission failed: {source}")]
    Submission {
        #[source]
        source: ApiError,
    },

    /// The attempt budget ran out before the job reached a terminal state
    #[error(
        "Export job {job_id} did not finish after {attempts} status checks (last state: {last_state})"
    )]
    PollTimeout {
        job_id: String,
        attempts: u32,
        last_state: String,
    },

    /// A status query failed with a non-transient error
    #[error("Status check {attempt} for export job {job_id} failed: {source}")]
    PollFailed {
        job_id: String,
        attempt: u32,
        #[source]
        source: ApiError,
    },

    /// The remote side reported the job as failed
    #[error("Export job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    /// The backend violated the protocol contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Download or decompression of a report artifact failed
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Raw API failure outside of a submission or poll context
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UsageExportError {
    /// Whether the failure is worth retrying at a higher level.
    ///
    /// Only API failures caused by the server, the network or rate limiting
    /// qualify. Configuration errors, other 4xx responses, failed jobs and an
    /// exhausted budget are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            UsageExportError::Submission { source } | UsageExportError::Api(source) => {
                source.is_transient()
            }
            _ => false,
        }
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, UsageExportError::Configuration(_))
    }
}

/// Errors returned by the remote usage API
///
/// HTTP status classes are kept apart so callers can tell a caller/config
/// fault (4xx) from a backend or network fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Client error (4xx)
    #[error("Client error: {status} - {body}")]
    ClientError { status: u16, body: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {body}")]
    ServerError { status: u16, body: String },

    /// Failed to connect or the connection dropped
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The per-call timeout elapsed
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl ApiError {
    /// Builds an error from a non-success HTTP status and its body
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = excerpt(body);
        if (400..500).contains(&status) {
            ApiError::ClientError { status, body }
        } else {
            ApiError::ServerError { status, body }
        }
    }

    /// True for 5xx, 408, 429, connection and timeout failures
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::ClientError { status, .. } => {
                matches!(*status, REQUEST_TIMEOUT | TOO_MANY_REQUESTS)
            }
            _ => true,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ClientError { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Truncates a response body to [`BODY_EXCERPT_LIMIT`] characters
pub fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= BODY_EXCERPT_LIMIT {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(BODY_EXCERPT_LIMIT).collect();
    truncated.push_str("...");
    truncated
}

impl From<std::io::Error> for UsageExportError {
    fn from(err: std::io::Error) -> Self {
        UsageExportError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for UsageExportError {
    fn from(err: serde_json::Error) -> Self {
        UsageExportError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for UsageExportError {
    fn from(err: toml::de::Error) -> Self {
        UsageExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
