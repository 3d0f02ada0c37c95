//! Example reports shown before the profile's store has ever been written.

use chrono::Duration;
use fixmyroad_core::report::{
    Report, ReportStatus, STAGE_IN_PROGRESS, STAGE_RESOLVED, STAGE_REVIEWED, STAGE_SUBMITTED,
};
use fixmyroad_core::types::Timestamp;

fn stages(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

/// The fixed seed set, newest first, with timestamps relative to `now`.
pub fn seed_reports(now: Timestamp) -> Vec<Report> {
    vec![
        Report {
            id: "#2401".into(),
            category: "Pothole".into(),
            location: "MG Road, near Central Square".into(),
            description: "Deep pothole (approx. 2ft diameter) causing traffic congestion and \
                          vehicle damage"
                .into(),
            photo: None,
            status: ReportStatus::Pending,
            progress: stages(&[STAGE_SUBMITTED, STAGE_REVIEWED]),
            submitted_at: now - Duration::days(2),
            ticket_id: Some("FMR-2401".into()),
            severity: Some("7.5/10".into()),
            severity_level: None,
            department: Some("Roads & Infrastructure".into()),
        },
        Report {
            id: "#2398".into(),
            category: "Road Cracks".into(),
            location: "Station Road, near Railway Crossing".into(),
            description: "Multiple longitudinal cracks across 50m stretch, causing water \
                          accumulation during monsoon"
                .into(),
            photo: None,
            status: ReportStatus::InProgress,
            progress: stages(&[STAGE_SUBMITTED, STAGE_REVIEWED, STAGE_IN_PROGRESS]),
            submitted_at: now - Duration::days(5),
            ticket_id: Some("FMR-2398".into()),
            severity: Some("6.2/10".into()),
            severity_level: None,
            department: Some("Public Works".into()),
        },
        Report {
            id: "#2395".into(),
            category: "Road Resurfacing".into(),
            location: "Civil Lines, near District Hospital".into(),
            description: "Damaged road section (30m) has been completely resurfaced with new \
                          asphalt. Excellent work!"
                .into(),
            photo: None,
            status: ReportStatus::Resolved,
            progress: stages(&[
                STAGE_SUBMITTED,
                STAGE_REVIEWED,
                STAGE_IN_PROGRESS,
                STAGE_RESOLVED,
            ]),
            submitted_at: now - Duration::days(7),
            ticket_id: Some("FMR-2395".into()),
            severity: Some("8.1/10".into()),
            severity_level: None,
            department: Some("Roads & Infrastructure".into()),
        },
    ]
}
