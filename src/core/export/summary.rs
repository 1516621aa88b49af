//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{JobId, ReportArtifact, TimeRange};
use std::time::Duration;

/// Summary of a completed export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Job that produced the reports
    pub job_id: JobId,

    /// Reporting window requested
    pub time_range: TimeRange,

    /// Number of organizations included in the job
    pub organization_count: usize,

    /// Status checks made before the job completed
    pub poll_attempts: u32,

    /// Time spent sleeping between status checks
    pub total_wait: Duration,

    /// Files written, in download order
    pub artifacts: Vec<ReportArtifact>,

    /// Wall-clock duration of the whole run
    pub duration: Duration,
}

impl ExportSummary {
    /// Compressed bytes downloaded across all artifacts
    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.byte_size).sum()
    }

    /// Decompressed bytes written across all artifacts
    pub fn total_decompressed_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.decompressed_size).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            time_range = %self.time_range,
            organizations = self.organization_count,
            poll_attempts = self.poll_attempts,
            wait_secs = self.total_wait.as_secs(),
            artifacts = self.artifacts.len(),
            bytes = self.total_bytes(),
            decompressed_bytes = self.total_decompressed_bytes(),
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        for artifact in &self.artifacts {
            tracing::debug!(
                path = %artifact.decompressed_path.display(),
                sha256 = %artifact.sha256,
                "Report written"
            );
        }
    }
}
