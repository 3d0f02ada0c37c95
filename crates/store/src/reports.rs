//! CRUD over the persisted report collection and its statistics cache.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use fixmyroad_core::types::Timestamp;
use fixmyroad_core::report::{
    validate_progress, validate_required_fields, validate_transition, NewReport, Report,
    ReportStatus, Statistics, DEFAULT_CATEGORY, STAGE_SUBMITTED,
};

use crate::backend::KeyValueBackend;
use crate::error::StoreError;
use crate::seed::seed_reports;

/// Key holding the JSON array of reports, newest first.
pub const REPORTS_KEY: &str = "fixmyroad_reports";
/// Key holding the JSON statistics snapshot.
pub const STATS_KEY: &str = "fixmyroad_stats";

/// Numeric floor for generated report ids; the seed ids sit just above it.
const ID_FLOOR: u64 = 2400;

/// Report store bound to one profile's backend.
///
/// Every write replaces the whole collection and recomputes the statistics
/// snapshot. Read-modify-write sections are serialized within one store
/// instance; separate processes sharing a profile still race (last write
/// wins).
pub struct ReportStore {
    backend: Arc<dyn KeyValueBackend>,
    write_lock: Mutex<()>,
}

impl ReportStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// All reports, newest first.
    ///
    /// Returns the seed set when the collection has never been written.
    pub fn list(&self) -> Result<Vec<Report>, StoreError> {
        self.list_at(Utc::now())
    }

    /// Like [`list`](Self::list), with seed timestamps relative to `now`.
    pub fn list_at(&self, now: Timestamp) -> Result<Vec<Report>, StoreError> {
        match self.backend.load(REPORTS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(seed_reports(now)),
        }
    }

    /// Look up a single report by id.
    pub fn get(&self, id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Create a report from caller-supplied fields and persist it.
    ///
    /// The new record gets a fresh id, `pending` status, `["Submitted"]`
    /// progress, and the current time. Returns the stored record.
    pub fn save(&self, input: NewReport) -> Result<Report, StoreError> {
        validate_required_fields(&input.location, &input.description)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut reports = self.list()?;

        let report = Report {
            id: next_id(&reports),
            category: input
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            location: input.location,
            description: input.description,
            photo: input.photo,
            status: ReportStatus::Pending,
            progress: vec![STAGE_SUBMITTED.to_string()],
            submitted_at: Utc::now(),
            ticket_id: input.ticket_id,
            severity: input.severity,
            severity_level: input.severity_level,
            department: input.department,
        };

        reports.insert(0, report.clone());
        self.persist(&reports)?;

        tracing::info!(
            report_id = %report.id,
            ticket_id = report.ticket_id.as_deref().unwrap_or("-"),
            total = reports.len(),
            "Report saved",
        );
        Ok(report)
    }

    /// Overwrite the status and progress of an existing report.
    ///
    /// Returns `Ok(None)` and leaves the store untouched when `id` is
    /// unknown. The status may not regress or skip a stage, and `progress`
    /// must extend the existing stages.
    pub fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
        progress: Vec<String>,
    ) -> Result<Option<Report>, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut reports = self.list()?;

        let Some(report) = reports.iter_mut().find(|r| r.id == id) else {
            tracing::warn!(report_id = id, "Status update for unknown report ignored");
            return Ok(None);
        };

        validate_transition(report.status, status)?;
        validate_progress(&report.progress, &progress)?;

        report.status = status;
        report.progress = progress;
        let updated = report.clone();

        self.persist(&reports)?;

        tracing::info!(report_id = id, status = %status, "Report status updated");
        Ok(Some(updated))
    }

    /// Cached statistics, recomputed when the snapshot is missing or unreadable.
    pub fn stats(&self) -> Result<Statistics, StoreError> {
        if let Some(raw) = self.backend.load(STATS_KEY)? {
            match serde_json::from_str(&raw) {
                Ok(stats) => return Ok(stats),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable statistics snapshot");
                }
            }
        }
        self.refresh_stats()
    }

    /// Recompute statistics from the full collection and write the snapshot.
    pub fn refresh_stats(&self) -> Result<Statistics, StoreError> {
        let stats = Statistics::from_reports(&self.list()?);
        self.backend.save(STATS_KEY, &serde_json::to_string(&stats)?)?;
        Ok(stats)
    }

    /// Write the collection, then its statistics.
    ///
    /// The snapshot is dropped before the collection is written. If the new
    /// snapshot cannot be written afterwards the write still succeeds and the
    /// next [`stats`](Self::stats) call recomputes it.
    fn persist(&self, reports: &[Report]) -> Result<(), StoreError> {
        self.backend.remove(STATS_KEY)?;
        self.backend.save(REPORTS_KEY, &serde_json::to_string(reports)?)?;

        let stats = Statistics::from_reports(reports);
        if let Err(e) = self.backend.save(STATS_KEY, &serde_json::to_string(&stats)?) {
            tracing::warn!(error = %e, "Statistics snapshot not written; will recompute on read");
        }
        Ok(())
    }
}

/// Next `#<n>` id: one above the largest numeric id in the collection.
///
/// Past `u64::MAX` the search wraps back to the floor and takes the first
/// free id.
fn next_id(reports: &[Report]) -> String {
    let wrap = |n: u64| n.checked_add(1).unwrap_or(ID_FLOOR + 1);
    let mut n = wrap(
        reports
            .iter()
            .filter_map(|r| r.id.strip_prefix('#')?.parse::<u64>().ok())
            .max()
            .unwrap_or(ID_FLOOR)
            .max(ID_FLOOR),
    );

    loop {
        let candidate = format!("#{n}");
        if !reports.iter().any(|r| r.id == candidate) {
            return candidate;
        }
        n = wrap(n);
    }
}
