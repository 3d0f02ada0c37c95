//! Offline stand-in for the classification workflow.
//!
//! [`DemoWorkflow`] never touches the network. After a fixed delay it
//! returns a synthesized classification with a fresh ticket id, a random
//! severity level, and a random department.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use fixmyroad_core::classification::{Classification, SeverityLevel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::WorkflowApiError;
use crate::payload::ReportPayload;
use crate::submitter::{Submission, WorkflowSubmitter};

/// Simulated processing time.
pub const DEFAULT_DEMO_DELAY: Duration = Duration::from_millis(3000);

/// Departments a demo report can be routed to.
pub const DEPARTMENTS: [&str; 3] = ["Roads & Infrastructure", "Public Works", "Emergency Services"];

pub struct DemoWorkflow {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl DemoWorkflow {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Build a classification for `payload` without waiting.
    pub fn classify(&self, payload: &ReportPayload) -> Classification {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let ticket: u32 = rng.random_range(1000..=9999);
        let level = SeverityLevel::ALL[rng.random_range(0..SeverityLevel::ALL.len())];
        let department = DEPARTMENTS[rng.random_range(0..DEPARTMENTS.len())];

        let photo_line = if payload.photo.is_some() {
            "Photo analyzed"
        } else {
            "No photo provided"
        };

        Classification {
            ticket_id: format!("FMR-{ticket}"),
            severity_score: level.representative_score().to_string(),
            severity_level: level.as_str().to_string(),
            assigned_department: department.to_string(),
            ai_message: Some(format!(
                "AI Analysis Complete!\n\nLocation: {}\n{photo_line}\n\nYour report has been \
                 analyzed and classified as {} priority. Our team will address this issue \
                 shortly.",
                payload.location,
                level.as_str(),
            )),
        }
    }
}

#[async_trait]
impl WorkflowSubmitter for DemoWorkflow {
    fn mode(&self) -> &'static str {
        "demo"
    }

    async fn submit(&self, payload: &ReportPayload) -> Result<Submission, WorkflowApiError> {
        tracing::info!(delay_ms = self.delay.as_millis() as u64, "Simulating workflow run");
        tokio::time::sleep(self.delay).await;

        let classification = self.classify(payload);
        tracing::info!(
            ticket_id = %classification.ticket_id,
            severity = %classification.severity_level,
            department = %classification.assigned_department,
            "Simulated classification ready",
        );
        Ok(Submission::Completed(classification))
    }
}
