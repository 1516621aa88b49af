//! Export job poll loop
//!
//! Repeatedly queries a job's status until it reaches a terminal state or the
//! attempt budget runs out. Non-terminal states and transient API failures
//! share one attempt counter and one backoff schedule, so total wall-clock time
//! is bounded no matter how the backend misbehaves.

use crate::adapters::usage_api::UsageApi;
use crate::config::PollConfig;
use crate::domain::{ExportJob, JobId, JobState, JobStatus, Result, UsageExportError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Progressive backoff schedule for status checks
///
/// The delay after attempt `n` (1-based) is
/// `min(initial_delay + (n - 1) * increment, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub increment: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl BackoffPolicy {
    /// Build a policy from poll settings
    pub fn from_config(config: &PollConfig) -> Self {
        Self {
            initial_delay: Duration::from_secs(config.initial_delay_secs),
            increment: Duration::from_secs(config.delay_increment_secs),
            max_delay: Duration::from_secs(config.max_delay_secs),
            max_attempts: config.max_attempts,
        }
    }

    /// Delay slept after the given 1-based attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let steps = attempt.saturating_sub(1);
        self.initial_delay
            .saturating_add(self.increment.saturating_mul(steps))
            .min(self.max_delay)
    }

    /// Upper bound on time spent sleeping across a whole poll run
    ///
    /// No sleep follows the final attempt.
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&PollConfig::default())
    }
}

/// Attempt counter and current delay, threaded through the loop by value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// 1-based number of the status check about to be (or just) made
    pub attempt: u32,

    /// Delay to sleep if this attempt does not end the loop
    pub delay: Duration,
}

impl RetryState {
    /// State at the start of a poll run
    pub fn start(policy: &BackoffPolicy) -> Self {
        Self {
            attempt: 1,
            delay: policy.initial_delay.min(policy.max_delay),
        }
    }

    /// State for the next attempt; the delay never decreases and never
    /// exceeds the ceiling
    pub fn next(self, policy: &BackoffPolicy) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
            delay: self
                .delay
                .saturating_add(policy.increment)
                .min(policy.max_delay),
        }
    }

    /// Whether the budget is spent once this attempt is made
    pub fn is_last(&self, policy: &BackoffPolicy) -> bool {
        self.attempt >= policy.max_attempts
    }
}

/// Suspension point between status checks
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of a successful poll run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// The job as last observed (state `completed`, non-empty URLs)
    pub job: ExportJob,

    /// Number of status checks made
    pub attempts: u32,

    /// Total time slept between checks
    pub total_wait: Duration,
}

/// What a single status check means for the loop
enum Step {
    Completed(JobStatus),
    Continue(String),
}

/// Drives a job to a terminal state
pub struct PollLoop {
    api: Arc<dyn UsageApi>,
    sleeper: Arc<dyn Sleeper>,
    policy: BackoffPolicy,
}

impl PollLoop {
    /// Create a poll loop
    pub fn new(api: Arc<dyn UsageApi>, sleeper: Arc<dyn Sleeper>, policy: BackoffPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    /// The backoff policy in use
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Poll `job_id` until completion
    ///
    /// # Errors
    ///
    /// - [`UsageExportError::JobFailed`] when the backend reports failure
    /// - [`UsageExportError::MalformedResponse`] for a `completed` job without
    ///   download URLs, or an undecodable status
    /// - [`UsageExportError::PollFailed`] for a non-transient API error
    /// - [`UsageExportError::PollTimeout`] once `max_attempts` checks have been
    ///   made without reaching a terminal state
    pub async fn run(&self, job_id: &JobId) -> Result<PollOutcome> {
        let mut retry = RetryState::start(&self.policy);
        let mut total_wait = Duration::ZERO;

        loop {
            let last_state = match self.check(job_id, retry.attempt).await? {
                Step::Completed(status) => {
                    tracing::info!(
                        job_id = %job_id,
                        attempts = retry.attempt,
                        artifacts = status.download_urls.len(),
                        "Export job completed"
                    );
                    return Ok(PollOutcome {
                        job: ExportJob::observed(job_id.clone(), &status),
                        attempts: retry.attempt,
                        total_wait,
                    });
                }
                Step::Continue(state) => state,
            };

            if retry.is_last(&self.policy) {
                tracing::error!(
                    job_id = %job_id,
                    attempts = retry.attempt,
                    last_state = %last_state,
                    "Status check budget exhausted"
                );
                return Err(UsageExportError::PollTimeout {
                    job_id: job_id.to_string(),
                    attempts: retry.attempt,
                    last_state,
                });
            }

            tracing::info!(
                job_id = %job_id,
                state = %last_state,
                wait_secs = retry.delay.as_secs(),
                "Job still running, waiting before checking again"
            );
            self.sleeper.sleep(retry.delay).await;
            total_wait = total_wait.saturating_add(retry.delay);
            retry = retry.next(&self.policy);
        }
    }

    /// Make one status check and classify the answer
    async fn check(&self, job_id: &JobId, attempt: u32) -> Result<Step> {
        let status = match self.api.get_job_status(job_id).await {
            Ok(status) => status,
            Err(UsageExportError::Api(source)) if source.is_transient() => {
                crate::log_retry_attempt!(attempt, self.policy.max_attempts, &source);
                return Ok(Step::Continue(format!("unknown ({source})")));
            }
            Err(UsageExportError::Api(source)) => {
                return Err(UsageExportError::PollFailed {
                    job_id: job_id.to_string(),
                    attempt,
                    source,
                });
            }
            Err(e) => return Err(e),
        };

        crate::log_poll_attempt!(job_id, attempt, self.policy.max_attempts, status.state);

        match status.state {
            JobState::Completed if status.download_urls.is_empty() => {
                Err(UsageExportError::MalformedResponse(format!(
                    "export job {job_id} reported completed without any download URLs"
                )))
            }
            JobState::Completed => Ok(Step::Completed(status)),
            JobState::Failed => Err(UsageExportError::JobFailed {
                job_id: job_id.to_string(),
                message: status
                    .error_message
                    .unwrap_or_else(|| "no failure reason provided".to_string()),
            }),
            JobState::Pending | JobState::Processing => Ok(Step::Continue(status.state.to_string())),
        }
    }
}
