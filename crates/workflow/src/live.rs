//! Live submission through the backend proxy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkflowApiError;
use crate::payload::ReportPayload;
use crate::proxy::ProxyApi;
use crate::submitter::{Submission, WorkflowSubmitter};

/// Starts a remote classification job and returns its id for polling.
pub struct LiveWorkflow {
    proxy: Arc<ProxyApi>,
}

impl LiveWorkflow {
    pub fn new(proxy: Arc<ProxyApi>) -> Self {
        Self { proxy }
    }
}

#[async_trait]
impl WorkflowSubmitter for LiveWorkflow {
    fn mode(&self) -> &'static str {
        "live"
    }

    async fn submit(&self, payload: &ReportPayload) -> Result<Submission, WorkflowApiError> {
        tracing::info!(location = %payload.location, "Triggering workflow job via backend proxy");

        let job_id = self.proxy.trigger(payload).await.map_err(|e| {
            tracing::error!(error = %e, "Workflow trigger failed");
            e
        })?;

        tracing::info!(job_id = %job_id, "Workflow job started");
        Ok(Submission::Queued(job_id))
    }
}
