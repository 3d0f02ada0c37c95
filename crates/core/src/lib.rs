//! FixMyRoad domain types.
//!
//! Shared by the local report store, the workflow client, the submission
//! pipeline, and the backend API.

pub mod classification;
pub mod error;
pub mod job;
pub mod report;
pub mod types;
