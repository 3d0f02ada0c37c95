//! Admin dashboard view over the local report store.
//!
//! The dashboard is read-only: it takes a [`DashboardSnapshot`] of the
//! statistics and the most recent reports, and [`watch`] re-takes it on a
//! fixed interval. There is no push channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fixmyroad_core::report::{Report, Statistics};
use fixmyroad_core::types::Timestamp;
use fixmyroad_store::{ReportStore, StoreError};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Number of rows in the recent-reports table.
pub const RECENT_LIMIT: usize = 10;

/// One row of the recent-reports table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub category: String,
    pub location: String,
    pub status: &'static str,
    pub severity: String,
    pub age: String,
}

impl ReportRow {
    pub fn from_report(report: &Report, now: Timestamp) -> Self {
        Self {
            id: report.id.clone(),
            category: report.category.clone(),
            location: report.location.clone(),
            status: report.status.label(),
            severity: report.severity.clone().unwrap_or_else(|| "N/A".into()),
            age: time_ago(report.submitted_at, now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: Statistics,
    pub recent: Vec<ReportRow>,
}

/// Read statistics and the newest reports from the store.
pub fn snapshot(store: &ReportStore, now: Timestamp) -> Result<DashboardSnapshot, StoreError> {
    let stats = store.stats()?;
    let recent = store
        .list_at(now)?
        .iter()
        .take(RECENT_LIMIT)
        .map(|r| ReportRow::from_report(r, now))
        .collect();
    Ok(DashboardSnapshot { stats, recent })
}

/// Coarse relative age: `Today`, `Yesterday`, `N days ago`, `N weeks ago`.
pub fn time_ago(then: Timestamp, now: Timestamp) -> String {
    let days = (now - then).num_days().max(0);
    match days {
        0 => "Today".into(),
        1 => "Yesterday".into(),
        2..=6 => format!("{days} days ago"),
        _ => match days / 7 {
            1 => "1 week ago".into(),
            weeks => format!("{weeks} weeks ago"),
        },
    }
}

/// Re-read the dashboard every `refresh` until `cancel` fires.
///
/// The first snapshot is taken immediately. Store errors are logged and the
/// loop keeps going.
pub async fn watch<F>(
    store: Arc<ReportStore>,
    refresh: Duration,
    cancel: CancellationToken,
    mut on_snapshot: F,
) where
    F: FnMut(&DashboardSnapshot),
{
    let mut ticker = tokio::time::interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Dashboard watch stopped");
                return;
            }
            _ = ticker.tick() => {
                match snapshot(&store, Utc::now()) {
                    Ok(snap) => on_snapshot(&snap),
                    Err(e) => tracing::error!(error = %e, "Failed to refresh dashboard"),
                }
            }
        }
    }
}

/// Render a snapshot as a plain-text stats block plus table.
pub fn render(snapshot: &DashboardSnapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = format!(
        "Total: {}  Pending: {}  In Progress: {}  Resolved: {}\n\n",
        stats.total, stats.pending, stats.in_progress, stats.resolved
    );
    out.push_str(&format!(
        "{:<8} {:<18} {:<40} {:<12} {:<8} {}\n",
        "ID", "Category", "Location", "Status", "Severity", "Submitted"
    ));
    for row in &snapshot.recent {
        out.push_str(&format!(
            "{:<8} {:<18} {:<40} {:<12} {:<8} {}\n",
            row.id,
            truncate(&row.category, 18),
            truncate(&row.location, 40),
            row.status,
            row.severity,
            row.age
        ));
    }
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
