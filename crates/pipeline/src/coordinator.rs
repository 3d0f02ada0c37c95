//! End-to-end report submission.
//!
//! Stages, each gated on the previous one:
//!
//! 1. validate required fields
//! 2. encode the attached photo
//! 3. hand the report to the workflow (and poll if it was queued)
//! 4. save the classified report
//!
//! A report is only persisted after classification succeeded.

use std::path::PathBuf;
use std::sync::Arc;

use fixmyroad_core::classification::Classification;
use fixmyroad_core::error::CoreError;
use fixmyroad_core::report::{validate_required_fields, NewReport, Report};
use fixmyroad_store::ReportStore;
use fixmyroad_workflow::demo::DemoWorkflow;
use fixmyroad_workflow::live::LiveWorkflow;
use fixmyroad_workflow::poller::{JobPoller, JobStatusSource};
use fixmyroad_workflow::proxy::ProxyApi;
use fixmyroad_workflow::{ReportPayload, Submission, WorkflowSubmitter};

use crate::config::ClientConfig;
use crate::error::SubmissionError;
use crate::photo::encode_photo;

/// What the citizen filled in.
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
    pub category: Option<String>,
    pub location: String,
    pub description: String,
    /// Path of an attached photo, if any.
    pub photo: Option<PathBuf>,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub classification: Classification,
    pub report: Report,
    /// Remote job id when the workflow ran asynchronously.
    pub job_id: Option<String>,
}

pub struct SubmissionCoordinator {
    store: Arc<ReportStore>,
    submitter: Arc<dyn WorkflowSubmitter>,
    poller: JobPoller,
}

impl SubmissionCoordinator {
    pub fn new(
        store: Arc<ReportStore>,
        submitter: Arc<dyn WorkflowSubmitter>,
        poller: JobPoller,
    ) -> Self {
        Self {
            store,
            submitter,
            poller,
        }
    }

    /// Wire the demo or live strategy according to `config`.
    pub fn from_config(config: &ClientConfig, store: Arc<ReportStore>) -> Self {
        let proxy = Arc::new(ProxyApi::new(config.backend_url.clone()));

        let submitter: Arc<dyn WorkflowSubmitter> = if config.demo_mode {
            Arc::new(DemoWorkflow::new(config.demo_delay))
        } else {
            Arc::new(LiveWorkflow::new(Arc::clone(&proxy)))
        };
        let source: Arc<dyn JobStatusSource> = proxy;

        Self::new(store, submitter, JobPoller::new(source, config.poll))
    }

    pub fn mode(&self) -> &'static str {
        self.submitter.mode()
    }

    /// Run one submission through every stage.
    pub async fn submit(&self, form: ReportForm) -> Result<SubmissionReceipt, SubmissionError> {
        let result = self.run(form).await;
        if let Err(e) = &result {
            tracing::warn!(stage = e.stage(), error = %e, "Submission failed");
        }
        result
    }

    async fn run(&self, form: ReportForm) -> Result<SubmissionReceipt, SubmissionError> {
        // 1. Required fields.
        validate_required_fields(&form.location, &form.description).map_err(|e| match e {
            CoreError::Validation(msg) => SubmissionError::Validation(msg),
            other => SubmissionError::Validation(other.to_string()),
        })?;

        // 2. Photo.
        let photo = match &form.photo {
            Some(path) => Some(encode_photo(path).await?),
            None => None,
        };

        // 3. Classification.
        let payload = ReportPayload {
            location: form.location.clone(),
            description: form.description.clone(),
            photo,
        };

        tracing::info!(mode = self.submitter.mode(), location = %payload.location, "Submitting report");
        let submission = self
            .submitter
            .submit(&payload)
            .await
            .map_err(SubmissionError::RemoteInvocation)?;

        let (classification, job_id) = match submission {
            Submission::Completed(classification) => (classification, None),
            Submission::Queued(job_id) => {
                let outputs = self.poller.wait_for_completion(&job_id).await?;
                let classification = Classification::from_outputs(&outputs)
                    .map_err(|e| SubmissionError::InvalidOutputs(e.to_string()))?;
                (classification, Some(job_id))
            }
        };

        // 4. Persist.
        let report = self.store.save(NewReport {
            category: form.category,
            location: form.location,
            description: form.description,
            photo: payload.photo,
            ticket_id: Some(classification.ticket_id.clone()),
            severity: Some(classification.severity_score.clone()),
            severity_level: Some(classification.severity_level.clone()),
            department: Some(classification.assigned_department.clone()),
        })?;

        tracing::info!(
            report_id = %report.id,
            ticket_id = %classification.ticket_id,
            job_id = job_id.as_deref().unwrap_or("-"),
            "Submission complete",
        );

        Ok(SubmissionReceipt {
            classification,
            report,
            job_id,
        })
    }
}
