//! Usage export job model

use super::errors::UsageExportError;
use super::ids::JobId;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote state of an export job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    /// `completed` and `failed` admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobState {
    type Err = UsageExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(JobState::Pending),
            "processing" => Ok(JobState::Processing),
            "completed" => Ok(JobState::Completed),
            "failed" => Ok(JobState::Failed),
            other => Err(UsageExportError::MalformedResponse(format!(
                "unknown export job state '{other}'"
            ))),
        }
    }
}

/// One status snapshot returned by a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub state: JobState,

    /// Signed artifact URLs; empty until the job completes
    pub download_urls: Vec<String>,

    /// Server-provided failure reason, if any
    pub error_message: Option<String>,
}

impl JobStatus {
    /// Snapshot with no URLs and no error
    pub fn new(state: JobState) -> Self {
        Self {
            state,
            download_urls: Vec::new(),
            error_message: None,
        }
    }

    /// Attach download URLs
    pub fn with_download_urls(mut self, urls: Vec<String>) -> Self {
        self.download_urls = urls;
        self
    }

    /// Attach a failure reason
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// An export job as last seen by this process
///
/// The record is replaced wholesale on every poll; nothing mutates it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub job_id: JobId,
    pub state: JobState,
    pub download_urls: Vec<String>,
}

impl ExportJob {
    /// A freshly submitted job
    pub fn submitted(job_id: JobId) -> Self {
        Self {
            job_id,
            state: JobState::Pending,
            download_urls: Vec::new(),
        }
    }

    /// The job as described by a status snapshot
    pub fn observed(job_id: JobId, status: &JobStatus) -> Self {
        Self {
            job_id,
            state: status.state,
            download_urls: status.download_urls.clone(),
        }
    }
}
