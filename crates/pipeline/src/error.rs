use std::time::Duration;

use fixmyroad_store::StoreError;
use fixmyroad_workflow::poller::PollError;
use fixmyroad_workflow::WorkflowApiError;

use crate::photo::PhotoError;

/// Failure of one submission, tagged by the pipeline stage that failed.
///
/// Nothing is persisted for any of these; the citizen can resubmit.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// A required form field is missing. No remote call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The attached photo could not be read or encoded.
    #[error(transparent)]
    Encoding(#[from] PhotoError),

    /// The workflow rejected the submission (initiate or execute step).
    #[error("Workflow invocation failed: {0}")]
    RemoteInvocation(#[source] WorkflowApiError),

    /// A status check for the queued job could not be completed.
    #[error("Job status check failed: {0}")]
    Poll(#[source] WorkflowApiError),

    /// The workflow reported the job as failed.
    #[error("Job {job_id} failed")]
    JobFailed { job_id: String },

    /// The job did not finish within the polling window.
    #[error("Job {job_id} timed out after {}s", .after.as_secs())]
    JobTimedOut { job_id: String, after: Duration },

    /// The job finished but its outputs lack required fields.
    #[error("Workflow returned unusable outputs: {0}")]
    InvalidOutputs(String),

    /// The classified report could not be saved.
    #[error("Failed to save report: {0}")]
    Store(#[from] StoreError),
}

impl From<PollError> for SubmissionError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::JobFailed { job_id } => SubmissionError::JobFailed { job_id },
            PollError::TimedOut { job_id, after } => SubmissionError::JobTimedOut { job_id, after },
            PollError::Transport(e) => SubmissionError::Poll(e),
        }
    }
}

impl SubmissionError {
    /// Short name of the failing stage, for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            SubmissionError::Validation(_) => "validation",
            SubmissionError::Encoding(_) => "encoding",
            SubmissionError::RemoteInvocation(_) => "invocation",
            SubmissionError::Poll(_) | SubmissionError::JobFailed { .. } => "processing",
            SubmissionError::JobTimedOut { .. } => "timeout",
            SubmissionError::InvalidOutputs(_) => "outputs",
            SubmissionError::Store(_) => "persistence",
        }
    }

    /// Message shown to the citizen. Each stage gets its own wording.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Validation(msg) => format!("Please complete the form: {msg}."),
            SubmissionError::Encoding(e) => format!("We couldn't attach your photo. {e}."),
            SubmissionError::RemoteInvocation(e) => {
                format!("We couldn't start the AI analysis. {}", remote_detail(e))
            }
            SubmissionError::Poll(e) => {
                format!("We lost track of the AI analysis. {}", remote_detail(e))
            }
            SubmissionError::JobFailed { .. } => {
                "The AI analysis failed to process your report. Please try again.".into()
            }
            SubmissionError::JobTimedOut { .. } => {
                "The AI analysis took too long. Please try again in a moment.".into()
            }
            SubmissionError::InvalidOutputs(_) => {
                "The AI analysis returned an incomplete result. Please try again.".into()
            }
            SubmissionError::Store(_) => {
                "Your report was analyzed but could not be saved. Please try again.".into()
            }
        }
    }
}

fn remote_detail(err: &WorkflowApiError) -> String {
    match err {
        WorkflowApiError::ApiError { status, body } => format!("Server said ({status}): {body}"),
        WorkflowApiError::Request(e) => format!("Is the backend reachable? ({e})"),
    }
}
