//! Citizen-side report submission and the admin dashboard view.
//!
//! [`coordinator::SubmissionCoordinator`] runs one submission end to end:
//! validate, encode the photo, classify through the workflow, wait for a
//! queued job, and save the classified report. [`dashboard`] turns the
//! store into the admin overview.

pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod error;
pub mod photo;
pub mod render;

pub use config::ClientConfig;
pub use coordinator::{ReportForm, SubmissionCoordinator, SubmissionReceipt};
pub use error::SubmissionError;
