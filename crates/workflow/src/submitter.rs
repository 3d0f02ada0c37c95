//! Submission strategy seam.
//!
//! The submission pipeline holds an `Arc<dyn WorkflowSubmitter>` chosen at
//! construction: [`DemoWorkflow`](crate::demo::DemoWorkflow) answers
//! locally after a fixed delay, [`LiveWorkflow`](crate::live::LiveWorkflow)
//! queues a remote job that must then be polled.

use async_trait::async_trait;
use fixmyroad_core::classification::Classification;
use fixmyroad_core::types::JobId;

use crate::error::WorkflowApiError;
use crate::payload::ReportPayload;

/// Result of handing a report to the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The classification is already available.
    Completed(Classification),
    /// A remote job was started; poll it for the classification.
    Queued(JobId),
}

#[async_trait]
pub trait WorkflowSubmitter: Send + Sync {
    /// Short name for logs (`"demo"`, `"live"`).
    fn mode(&self) -> &'static str;

    /// Hand a report to the workflow.
    async fn submit(&self, payload: &ReportPayload) -> Result<Submission, WorkflowApiError>;
}
