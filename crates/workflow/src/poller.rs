//! Wait-for-completion polling for remote workflow jobs.
//!
//! [`JobPoller::wait_for_completion`] checks the job status on a fixed
//! interval and races that loop against an overall deadline. Whichever side
//! finishes first decides the outcome; the other future is dropped, so a job
//! resolves exactly once and no status check is issued afterwards.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fixmyroad_core::job::JobStatus;
use serde_json::Value;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::WorkflowApiError;
use crate::payload::JobStatusResponse;

/// Anything that can report the status of a remote job.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, WorkflowApiError>;

    /// Results payload of a completed job, used when the status payload
    /// carries no `outputs`.
    async fn job_results(&self, job_id: &str) -> Result<Value, WorkflowApiError>;
}

/// Tunable polling parameters.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between status checks; the first check happens one interval in.
    pub interval: Duration,
    /// Overall budget before the job is declared timed out.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            timeout: Duration::from_millis(60_000),
        }
    }
}

/// Terminal failures of a polled job.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The service reported the job as failed.
    #[error("Job {job_id} processing failed")]
    JobFailed { job_id: String },

    /// No terminal status arrived within the timeout.
    #[error("Job {job_id} timed out after {}s", .after.as_secs())]
    TimedOut { job_id: String, after: Duration },

    /// A status check could not be completed.
    #[error("Failed to check job status: {0}")]
    Transport(#[from] WorkflowApiError),
}

pub struct JobPoller {
    source: Arc<dyn JobStatusSource>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(source: Arc<dyn JobStatusSource>, config: PollConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Poll `job_id` until it completes, fails, errors, or times out.
    ///
    /// Returns the job's `outputs` payload on success.
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<Value, PollError> {
        tokio::select! {
            biased;
            outcome = self.poll_loop(job_id) => outcome,
            () = tokio::time::sleep(self.config.timeout) => {
                tracing::warn!(
                    job_id,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "Workflow job timed out",
                );
                Err(PollError::TimedOut {
                    job_id: job_id.to_string(),
                    after: self.config.timeout,
                })
            }
        }
    }

    async fn poll_loop(&self, job_id: &str) -> Result<Value, PollError> {
        let mut ticker = interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempt = 0u32;

        loop {
            ticker.tick().await;
            attempt += 1;

            let response = self.source.job_status(job_id).await.map_err(|e| {
                tracing::error!(job_id, attempt, error = %e, "Job status check failed");
                PollError::Transport(e)
            })?;

            match JobStatus::parse(&response.status) {
                JobStatus::Completed => {
                    tracing::info!(job_id, attempt, "Workflow job completed");
                    return self.completed_outputs(job_id, response.outputs).await;
                }
                JobStatus::Failed => {
                    tracing::warn!(job_id, attempt, "Workflow job failed");
                    return Err(PollError::JobFailed {
                        job_id: job_id.to_string(),
                    });
                }
                _ => {
                    tracing::debug!(job_id, attempt, status = %response.status, "Job still running");
                }
            }
        }
    }

    async fn completed_outputs(
        &self,
        job_id: &str,
        outputs: Option<Value>,
    ) -> Result<Value, PollError> {
        if let Some(outputs) = outputs {
            return Ok(outputs);
        }
        tracing::debug!(job_id, "Status carried no outputs, fetching results");
        let results = self.source.job_results(job_id).await?;
        Ok(results.get("outputs").cloned().unwrap_or(results))
    }
}
