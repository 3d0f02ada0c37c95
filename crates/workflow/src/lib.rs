//! Client side of the AI classification workflow.
//!
//! - [`api`] -- REST client for the third-party workflow service (used by
//!   the backend proxy, carries the service key).
//! - [`proxy`] -- REST client for the backend proxy (used by citizens'
//!   clients, never sees the service key).
//! - [`submitter`] -- the submission strategy seam, with [`demo`] and
//!   [`live`] implementations.
//! - [`poller`] -- waits for a queued job to reach a terminal state.

pub mod api;
pub mod demo;
pub mod error;
pub mod live;
pub mod payload;
pub mod poller;
pub mod proxy;
pub mod submitter;

pub use error::WorkflowApiError;
pub use payload::ReportPayload;
pub use submitter::{Submission, WorkflowSubmitter};
