//! REST client for the FixMyRoad backend proxy.
//!
//! The proxy holds the service credential; this client only talks to the
//! proxy's `/trigger`, `/status/{id}`, and `/results/{id}` routes.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{parse_response, WorkflowApiError};
use crate::payload::{JobHandle, JobStatusResponse, ReportPayload};
use crate::poller::JobStatusSource;

/// HTTP client for the backend proxy.
#[derive(Clone)]
pub struct ProxyApi {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyApi {
    /// * `base_url` - Proxy mount point, e.g. `http://localhost:3000/api/workflow`.
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Start a classification job. Returns the job execution id.
    pub async fn trigger(&self, payload: &ReportPayload) -> Result<String, WorkflowApiError> {
        let response = self
            .client
            .post(format!("{}/trigger", self.base_url))
            .json(payload)
            .send()
            .await?;

        let handle: JobHandle = parse_response(response).await?;
        Ok(handle.job_execution_id)
    }

    /// Current status of a job.
    pub async fn status(&self, job_id: &str) -> Result<JobStatusResponse, WorkflowApiError> {
        let response = self
            .client
            .get(format!("{}/status/{job_id}", self.base_url))
            .send()
            .await?;

        parse_response(response).await
    }

    /// Final results payload of a job.
    pub async fn results(&self, job_id: &str) -> Result<Value, WorkflowApiError> {
        let response = self
            .client
            .get(format!("{}/results/{job_id}", self.base_url))
            .send()
            .await?;

        parse_response(response).await
    }
}

#[async_trait]
impl JobStatusSource for ProxyApi {
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, WorkflowApiError> {
        self.status(job_id).await
    }

    async fn job_results(&self, job_id: &str) -> Result<Value, WorkflowApiError> {
        self.results(job_id).await
    }
}
