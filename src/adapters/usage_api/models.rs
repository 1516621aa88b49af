//! Usage API wire models
//!
//! Request and response bodies as the backend spells them. They are kept
//! apart from the domain types and converted at the adapter boundary.

use crate::domain::{JobState, JobStatus, Organization, OrganizationId, Result, UsageExportError};
use serde::{Deserialize, Serialize};

/// Response of the shared-plan listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SharedOrgsResponse {
    pub orgs: Vec<SharedOrg>,
}

/// One organization on the shared plan
#[derive(Debug, Clone, Deserialize)]
pub struct SharedOrg {
    pub id: Option<String>,
    pub name: Option<String>,
    pub vcs_type: Option<String>,
}

impl SharedOrg {
    /// Convert to a domain organization; entries without an id yield `None`
    pub fn into_domain(self) -> Option<Organization> {
        let id = OrganizationId::new(self.id?).ok()?;
        let mut org = Organization::new(id);
        org.name = self.name;
        org.vcs_type = self.vcs_type;
        Some(org)
    }
}

/// Body of the job creation request
#[derive(Debug, Clone, Serialize)]
pub struct CreateUsageExportJobRequest {
    pub start: String,
    pub end: String,
    pub shared_org_ids: Vec<String>,
}

/// Response of the job creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUsageExportJobResponse {
    pub usage_export_job_id: Option<String>,
}

/// Response of the job status request
#[derive(Debug, Clone, Deserialize)]
pub struct UsageExportJobResponse {
    pub state: Option<String>,

    #[serde(default)]
    pub download_urls: Option<Vec<String>>,

    #[serde(default)]
    pub error_reason: Option<String>,
}

impl UsageExportJobResponse {
    /// Convert to a domain status snapshot
    ///
    /// # Errors
    ///
    /// Returns [`UsageExportError::MalformedResponse`] if the state is missing
    /// or not one of the four known states.
    pub fn into_domain(self) -> Result<JobStatus> {
        let state: JobState = self
            .state
            .as_deref()
            .ok_or_else(|| {
                UsageExportError::MalformedResponse(
                    "job status response has no 'state' field".to_string(),
                )
            })?
            .parse()?;

        let mut status = JobStatus::new(state)
            .with_download_urls(self.download_urls.unwrap_or_default());
        if let Some(reason) = self.error_reason.filter(|r| !r.trim().is_empty()) {
            status = status.with_error_message(reason);
        }
        Ok(status)
    }
}
