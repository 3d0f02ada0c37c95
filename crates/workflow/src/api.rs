//! REST API client for the third-party workflow service.
//!
//! Wraps the service's job endpoints (initiate, execute, status, results)
//! using [`reqwest`]. Every request carries the service key header, so
//! this client must only ever run server-side.

use serde_json::{json, Value};

use crate::error::{parse_response, WorkflowApiError};
use crate::payload::{JobHandle, ReportPayload};

/// Header carrying the service credential on every upstream request.
pub const SERVICE_KEY_HEADER: &str = "x-service-key";

/// HTTP client for the upstream workflow service.
#[derive(Clone)]
pub struct WorkflowApi {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    workflow_id: String,
}

impl WorkflowApi {
    /// Create a new API client.
    ///
    /// * `base_url`    - Service base URL, without a trailing slash.
    /// * `service_key` - Secret sent in the `x-service-key` header.
    /// * `workflow_id` - Pre-configured workflow definition to execute.
    pub fn new(base_url: String, service_key: String, workflow_id: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, service_key, workflow_id)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: String,
        service_key: String,
        workflow_id: String,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            workflow_id,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a new job for the configured workflow.
    ///
    /// Sends `POST /job/initiate` and returns the job execution id.
    pub async fn initiate(&self) -> Result<String, WorkflowApiError> {
        let response = self
            .client
            .post(format!("{}/job/initiate", self.base_url))
            .header(SERVICE_KEY_HEADER, &self.service_key)
            .json(&json!({ "workflowId": self.workflow_id }))
            .send()
            .await?;

        let handle: JobHandle = parse_response(response).await?;
        Ok(handle.job_execution_id)
    }

    /// Attach the report inputs to an initiated job and start it.
    ///
    /// Sends `POST /job/execute`. The response body is not interpreted.
    pub async fn execute(
        &self,
        job_execution_id: &str,
        payload: &ReportPayload,
    ) -> Result<(), WorkflowApiError> {
        let body = json!({
            "jobExecutionId": job_execution_id,
            "jobPayloadSchemaInstance": payload.schema_instance(),
        });

        let response = self
            .client
            .post(format!("{}/job/execute", self.base_url))
            .header(SERVICE_KEY_HEADER, &self.service_key)
            .json(&body)
            .send()
            .await?;

        crate::error::ensure_success(response).await?;
        Ok(())
    }

    /// Fetch the raw status payload of a job (`GET /job/{id}/status`).
    pub async fn status(&self, job_execution_id: &str) -> Result<Value, WorkflowApiError> {
        self.get_json(&format!("{}/job/{job_execution_id}/status", self.base_url))
            .await
    }

    /// Fetch the raw results payload of a job (`GET /job/{id}/results`).
    pub async fn results(&self, job_execution_id: &str) -> Result<Value, WorkflowApiError> {
        self.get_json(&format!("{}/job/{job_execution_id}/results", self.base_url))
            .await
    }

    async fn get_json(&self, url: &str) -> Result<Value, WorkflowApiError> {
        let response = self
            .client
            .get(url)
            .header(SERVICE_KEY_HEADER, &self.service_key)
            .send()
            .await?;

        parse_response(response).await
    }
}
