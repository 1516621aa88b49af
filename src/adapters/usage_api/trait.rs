//! Usage API capability trait
//!
//! The four remote operations the export workflow needs, behind one seam.
//! Production wires this to HTTP; tests substitute a scripted fake.

use crate::domain::{JobId, JobStatus, Organization, OrganizationSet, Result, TimeRange};
use async_trait::async_trait;

/// Everything the backend needs to create one usage export job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Organizations whose usage is included
    pub organizations: OrganizationSet,

    /// Reporting window
    pub time_range: TimeRange,
}

impl ExportRequest {
    /// Create a new export request
    pub fn new(organizations: OrganizationSet, time_range: TimeRange) -> Self {
        Self {
            organizations,
            time_range,
        }
    }
}

/// Remote usage export API
///
/// HTTP-level failures are reported as [`crate::domain::UsageExportError::Api`]
/// so callers can classify them; bodies that cannot be decoded are reported as
/// [`crate::domain::UsageExportError::MalformedResponse`].
#[async_trait]
pub trait UsageApi: Send + Sync {
    /// List the organizations on the primary organization's shared plan
    async fn discover_organizations(&self) -> Result<Vec<Organization>>;

    /// Create a usage export job and return its identifier
    ///
    /// Every successful call creates exactly one remote job. Callers must not
    /// resubmit after an ambiguous failure.
    async fn create_export_job(&self, request: &ExportRequest) -> Result<JobId>;

    /// Fetch the current status of a job
    async fn get_job_status(&self, job_id: &JobId) -> Result<JobStatus>;

    /// Download one artifact by its signed URL
    async fn download_artifact(&self, url: &str) -> Result<Vec<u8>>;

    /// Base URL of the backend, for log context
    fn base_url(&self) -> &str;
}
