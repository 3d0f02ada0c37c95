//! Report records, status rules, and the derived statistics aggregate.
//!
//! A [`Report`] is created by the local store from a [`NewReport`] and is
//! only ever mutated through status updates. [`Statistics`] is always
//! derived from the full report list.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ReportId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// First stage label of every newly saved report.
pub const STAGE_SUBMITTED: &str = "Submitted";
/// Stage label appended once an operator has looked at the report.
pub const STAGE_REVIEWED: &str = "Reviewed";
/// Stage label appended when work starts.
pub const STAGE_IN_PROGRESS: &str = "In Progress";
/// Stage label appended when the issue is fixed.
pub const STAGE_RESOLVED: &str = "Resolved";

/// Category used when the citizen did not pick one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Largest accepted photo before encoding (10 MiB).
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Largest report body carrying a photo as a base64 data URL, with room
/// for the text fields.
pub const MAX_REPORT_BODY_BYTES: usize = MAX_PHOTO_BYTES.div_ceil(3) * 4 + 256 * 1024;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a report.
///
/// Transitions only move forward: `pending -> in_progress -> resolved`.
/// Older records spelled `in_progress` as `progress`; both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    #[serde(alias = "progress")]
    InProgress,
    Resolved,
}

impl ReportStatus {
    fn rank(self) -> u8 {
        match self {
            ReportStatus::Pending => 0,
            ReportStatus::InProgress => 1,
            ReportStatus::Resolved => 2,
        }
    }

    /// Whether `next` is the same status or the one directly after `self`.
    ///
    /// Staying on the same status is allowed so that new progress stages
    /// can be appended without a status change.
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        next.rank() == self.rank() || next.rank() == self.rank() + 1
    }

    /// Human-readable label for tables and badges.
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "in_progress" | "progress" => Ok(ReportStatus::InProgress),
            "resolved" => Ok(ReportStatus::Resolved),
            other => Err(CoreError::Validation(format!(
                "Invalid report status '{other}'. Must be one of: pending, in_progress, resolved"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A persisted citizen report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub category: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub status: ReportStatus,
    pub progress: Vec<String>,
    pub submitted_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Caller-supplied fields for a report about to be saved.
///
/// The store fills in `id`, `status`, `progress`, and `submitted_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub category: Option<String>,
    pub location: String,
    pub description: String,
    pub photo: Option<String>,
    pub ticket_id: Option<String>,
    pub severity: Option<String>,
    pub severity_level: Option<String>,
    pub department: Option<String>,
}

impl NewReport {
    /// Build a new report from the two required fields.
    pub fn new(location: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate counts over the whole report collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl Statistics {
    /// Count reports per status.
    pub fn from_reports(reports: &[Report]) -> Self {
        reports.iter().fold(
            Statistics {
                total: reports.len(),
                ..Default::default()
            },
            |mut stats, report| {
                match report.status {
                    ReportStatus::Pending => stats.pending += 1,
                    ReportStatus::InProgress => stats.in_progress += 1,
                    ReportStatus::Resolved => stats.resolved += 1,
                }
                stats
            },
        )
    }

    /// `total` equals the sum of the per-status counts.
    pub fn is_consistent(&self) -> bool {
        self.total == self.pending + self.in_progress + self.resolved
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject a submission whose location or description is blank.
pub fn validate_required_fields(location: &str, description: &str) -> Result<(), CoreError> {
    if location.trim().is_empty() {
        return Err(CoreError::Validation("Location is required".into()));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation("Description is required".into()));
    }
    Ok(())
}

/// Validate that a status change neither moves backwards nor skips a stage.
pub fn validate_transition(current: ReportStatus, next: ReportStatus) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition report from '{current}' to '{next}'"
        )))
    }
}

/// Validate that `next` keeps every stage of `current`, in order, as a prefix.
pub fn validate_progress(current: &[String], next: &[String]) -> Result<(), CoreError> {
    if next.len() >= current.len() && next.starts_with(current) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Progress is append-only: {next:?} does not extend {current:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn report(id: &str, status: ReportStatus) -> Report {
        Report {
            id: id.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            location: "MG Road".to_string(),
            description: "Pothole".to_string(),
            photo: None,
            status,
            progress: vec![STAGE_SUBMITTED.to_string()],
            submitted_at: Utc::now(),
            ticket_id: None,
            severity: None,
            severity_level: None,
            department: None,
        }
    }

    #[test]
    fn status_moves_forward_only() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::InProgress));
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Resolved));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::Resolved.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::InProgress.can_transition_to(ReportStatus::Pending));
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Resolved));
    }

    #[test]
    fn legacy_progress_spelling_is_accepted() {
        let status: ReportStatus = serde_json::from_str("\"progress\"").unwrap();
        assert_eq!(status, ReportStatus::InProgress);
        assert_eq!("progress".parse::<ReportStatus>().unwrap(), ReportStatus::InProgress);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"in_progress\"");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!("closed".parse::<ReportStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn report_serializes_camel_case_and_omits_absent_fields() {
        let json = serde_json::to_value(report("#2402", ReportStatus::Pending)).unwrap();
        assert!(json.get("submittedAt").is_some());
        assert!(json.get("ticketId").is_none());
        assert!(json.get("photo").is_none());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn statistics_count_each_status() {
        let reports = vec![
            report("#1", ReportStatus::Pending),
            report("#2", ReportStatus::Pending),
            report("#3", ReportStatus::InProgress),
            report("#4", ReportStatus::Resolved),
        ];
        let stats = Statistics::from_reports(&reports);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.resolved, 1);
        assert!(stats.is_consistent());

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["inProgress"], 1);
    }

    #[test]
    fn empty_statistics_are_zero() {
        assert_eq!(Statistics::from_reports(&[]), Statistics::default());
    }

    #[test]
    fn blank_required_fields_fail() {
        assert!(validate_required_fields("MG Road", "Pothole").is_ok());
        assert_matches!(
            validate_required_fields("  ", "Pothole"),
            Err(CoreError::Validation(msg)) if msg.contains("Location")
        );
        assert_matches!(
            validate_required_fields("MG Road", ""),
            Err(CoreError::Validation(msg)) if msg.contains("Description")
        );
    }

    #[test]
    fn progress_must_extend_existing_stages() {
        let current = vec![STAGE_SUBMITTED.to_string()];
        let extended = vec![STAGE_SUBMITTED.to_string(), STAGE_REVIEWED.to_string()];
        assert!(validate_progress(&current, &extended).is_ok());
        assert!(validate_progress(&current, &current).is_ok());
        assert!(validate_progress(&extended, &current).is_err());
        assert!(validate_progress(&current, &[STAGE_REVIEWED.to_string()]).is_err());
    }

    #[test]
    fn regression_and_skips_are_rejected() {
        assert!(validate_transition(ReportStatus::Pending, ReportStatus::InProgress).is_ok());
        assert!(validate_transition(ReportStatus::Pending, ReportStatus::Resolved).is_err());
        assert!(validate_transition(ReportStatus::Resolved, ReportStatus::InProgress).is_err());
    }
}
