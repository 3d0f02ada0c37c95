//! AI classification outcome attached to a report.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Severity bucket assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    High,
    Medium,
    Low,
}

impl SeverityLevel {
    /// All levels, highest first.
    pub const ALL: [SeverityLevel; 3] = [SeverityLevel::High, SeverityLevel::Medium, SeverityLevel::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::High => "high",
            SeverityLevel::Medium => "medium",
            SeverityLevel::Low => "low",
        }
    }

    /// Representative score string for the level, as shown to citizens.
    pub fn representative_score(self) -> &'static str {
        match self {
            SeverityLevel::High => "8.5/10",
            SeverityLevel::Medium => "5.2/10",
            SeverityLevel::Low => "2.8/10",
        }
    }
}

/// Outputs of a completed classification job.
///
/// Field names follow the workflow's output schema. Extra output fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub ticket_id: String,
    pub severity_score: String,
    pub severity_level: String,
    pub assigned_department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<String>,
}

impl Classification {
    /// Parse the `outputs` payload of a completed job.
    pub fn from_outputs(outputs: &serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(outputs.clone()).map_err(|e| {
            CoreError::Validation(format!("Workflow outputs are incomplete: {e}"))
        })
    }
}
