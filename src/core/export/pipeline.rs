//! Export pipeline - main orchestrator for the export process
//!
//! Runs discover → submit → poll → retrieve in order. Each step either hands
//! its product to the next or fails the whole run; nothing is retried across
//! steps.

use crate::adapters::usage_api::{ExportRequest, UsageApi};
use crate::config::UsageExportConfig;
use crate::core::export::discovery::discover_organization_set;
use crate::core::export::poll::{BackoffPolicy, PollLoop, Sleeper, TokioSleeper};
use crate::core::export::retrieve::ArtifactRetriever;
use crate::core::export::submit::JobSubmitter;
use crate::core::export::summary::ExportSummary;
use crate::domain::{OrganizationSet, Result, TimeRange};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

/// What an export would request, resolved without creating a job
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub organizations: OrganizationSet,
    pub time_range: TimeRange,
}

impl ExportPlan {
    /// The request body this plan would submit
    pub fn request(&self) -> ExportRequest {
        ExportRequest::new(self.organizations.clone(), self.time_range)
    }
}

/// Export pipeline
pub struct ExportPipeline {
    config: UsageExportConfig,
    api: Arc<dyn UsageApi>,
    sleeper: Arc<dyn Sleeper>,
}

impl ExportPipeline {
    /// Create a pipeline that sleeps on the tokio timer
    pub fn new(config: UsageExportConfig, api: Arc<dyn UsageApi>) -> Self {
        Self {
            config,
            api,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper used between status checks
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Resolve organizations and the reporting window without submitting
    pub async fn plan(&self) -> Result<ExportPlan> {
        let organizations = discover_organization_set(self.api.as_ref()).await?;
        Ok(ExportPlan {
            organizations,
            time_range: self.config.time_range,
        })
    }

    /// Execute the export
    ///
    /// `run_started` stamps the report file names, so every artifact of one
    /// run shares a timestamp.
    ///
    /// # Errors
    ///
    /// Returns the error of the first step that fails; see
    /// [`JobSubmitter::submit`], [`PollLoop::run`] and
    /// [`ArtifactRetriever::retrieve`].
    pub async fn execute(&self, run_started: DateTime<Utc>) -> Result<ExportSummary> {
        let start_time = Instant::now();

        tracing::info!(
            base_url = %self.api.base_url(),
            primary_org_id = %self.config.primary_org_id,
            time_range = %self.config.time_range,
            "Starting usage export"
        );

        let plan = self.plan().await?;

        let submitter = JobSubmitter::new(self.api.clone());
        let job = submitter
            .submit(&plan.organizations, &plan.time_range)
            .await?;

        let poll_loop = PollLoop::new(
            self.api.clone(),
            self.sleeper.clone(),
            BackoffPolicy::from_config(&self.config.poll),
        );
        let outcome = poll_loop.run(&job.job_id).await?;

        let retriever = ArtifactRetriever::new(self.api.clone(), self.config.output.clone());
        let artifacts = retriever
            .retrieve(&outcome.job.download_urls, &plan.time_range, run_started)
            .await?;

        let summary = ExportSummary {
            job_id: outcome.job.job_id,
            time_range: plan.time_range,
            organization_count: plan.organizations.len(),
            poll_attempts: outcome.attempts,
            total_wait: outcome.total_wait,
            artifacts,
            duration: start_time.elapsed(),
        };
        summary.log_summary();

        Ok(summary)
    }
}
