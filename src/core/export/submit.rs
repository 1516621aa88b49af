//! Export job submission

use crate::adapters::usage_api::{ExportRequest, UsageApi};
use crate::domain::{ExportJob, OrganizationSet, Result, TimeRange, UsageExportError};
use std::sync::Arc;

/// Creates usage export jobs
///
/// Submission is never retried here: every successful call creates one
/// billable remote job, and an ambiguous failure may already have created one.
pub struct JobSubmitter {
    api: Arc<dyn UsageApi>,
}

impl JobSubmitter {
    /// Create a submitter
    pub fn new(api: Arc<dyn UsageApi>) -> Self {
        Self { api }
    }

    /// Submit one export job for `organizations` over `time_range`
    ///
    /// # Errors
    ///
    /// Returns [`UsageExportError::Submission`] for HTTP and network failures;
    /// use [`UsageExportError::is_transient`] to tell a 4xx (caller or
    /// configuration fault) from a 5xx or network fault. Malformed responses
    /// propagate unchanged.
    pub async fn submit(
        &self,
        organizations: &OrganizationSet,
        time_range: &TimeRange,
    ) -> Result<ExportJob> {
        tracing::info!(
            time_range = %time_range,
            organization_count = organizations.len(),
            "Creating usage export job"
        );

        let request = ExportRequest::new(organizations.clone(), *time_range);
        let job_id = self
            .api
            .create_export_job(&request)
            .await
            .map_err(|e| match e {
                UsageExportError::Api(source) => {
                    tracing::error!(
                        status = ?source.status(),
                        transient = source.is_transient(),
                        error = %source,
                        "Usage export job creation failed"
                    );
                    UsageExportError::Submission { source }
                }
                other => other,
            })?;

        tracing::info!(job_id = %job_id, "Usage export job created");
        Ok(ExportJob::submitted(job_id))
    }
}
