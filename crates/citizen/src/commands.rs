//! Subcommand implementations.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use fixmyroad_core::error::CoreError;
use fixmyroad_core::report::{
    ReportStatus, STAGE_IN_PROGRESS, STAGE_RESOLVED, STAGE_REVIEWED,
};
use fixmyroad_pipeline::dashboard::{self, DashboardSnapshot};
use fixmyroad_pipeline::render::{render_error, render_receipt, render_report};
use fixmyroad_pipeline::{ClientConfig, ReportForm, SubmissionCoordinator};
use fixmyroad_store::ReportStore;
use tokio_util::sync::CancellationToken;

pub async fn submit(
    config: &ClientConfig,
    store: Arc<ReportStore>,
    form: ReportForm,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let coordinator = SubmissionCoordinator::from_config(config, store);
    if !json {
        println!("Analyzing your report ({} mode)...", coordinator.mode());
    }

    match coordinator.submit(form).await {
        Ok(receipt) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "report": receipt.report,
                        "classification": receipt.classification,
                        "jobId": receipt.job_id,
                    }))?
                );
            } else {
                print!("{}", render_receipt(&receipt));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprint!("{}", render_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

pub fn reports(store: &ReportStore, id: Option<String>, json: bool) -> anyhow::Result<ExitCode> {
    match id {
        Some(id) => {
            let Some(report) = store.get(&id)? else {
                eprintln!("{}", unknown_report(&id));
                return Ok(ExitCode::FAILURE);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        None => {
            let reports = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", render_report(report));
                }
                println!("{} report(s)", reports.len());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn stats(store: &ReportStore, refresh: bool, json: bool) -> anyhow::Result<ExitCode> {
    let stats = if refresh {
        store.refresh_stats()?
    } else {
        store.stats()?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "Total: {}\nPending: {}\nIn Progress: {}\nResolved: {}",
            stats.total, stats.pending, stats.in_progress, stats.resolved
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn dashboard(
    config: &ClientConfig,
    store: Arc<ReportStore>,
    watch: bool,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let show = move |snapshot: &DashboardSnapshot| {
        if json {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!(error = %e, "Failed to serialize dashboard"),
            }
        } else {
            if watch {
                // Clear screen and home the cursor between refreshes.
                print!("\x1b[2J\x1b[H");
            }
            print!("{}", dashboard::render(snapshot));
        }
    };

    if !watch {
        let snapshot = dashboard::snapshot(&store, Utc::now())?;
        show(&snapshot);
        return Ok(ExitCode::SUCCESS);
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    dashboard::watch(store, config.dashboard_refresh, cancel, show).await;
    Ok(ExitCode::SUCCESS)
}

pub fn update_status(
    store: &ReportStore,
    id: &str,
    status: ReportStatus,
    stages: Vec<String>,
) -> anyhow::Result<ExitCode> {
    let Some(current) = store.get(id)? else {
        eprintln!("{}", unknown_report(id));
        return Ok(ExitCode::FAILURE);
    };

    let progress = next_progress(&current.progress, status, stages);
    let updated = store
        .update_status(id, status, progress)
        .with_context(|| format!("Could not update report {id}"))?;

    match updated {
        Some(report) => {
            print!("{}", render_report(&report));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}", unknown_report(id));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn unknown_report(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Report",
        id: id.to_string(),
    }
}

/// Existing stages, then any stages implied by `status`, then `extra`.
///
/// Implied stages are only added once.
pub fn next_progress(current: &[String], status: ReportStatus, extra: Vec<String>) -> Vec<String> {
    let implied: &[&str] = match status {
        ReportStatus::Pending => &[],
        ReportStatus::InProgress => &[STAGE_REVIEWED, STAGE_IN_PROGRESS],
        ReportStatus::Resolved => &[STAGE_REVIEWED, STAGE_IN_PROGRESS, STAGE_RESOLVED],
    };

    let mut progress = current.to_vec();
    for stage in implied {
        if !progress.iter().any(|s| s == stage) {
            progress.push(stage.to_string());
        }
    }
    progress.extend(extra);
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn moving_to_in_progress_fills_missing_stages() {
        let next = next_progress(&labels(&["Submitted"]), ReportStatus::InProgress, vec![]);
        assert_eq!(next, labels(&["Submitted", "Reviewed", "In Progress"]));
    }

    #[test]
    fn stages_already_present_are_not_repeated() {
        let current = labels(&["Submitted", "Reviewed", "In Progress"]);
        let next = next_progress(&current, ReportStatus::Resolved, labels(&["Inspected"]));
        assert_eq!(
            next,
            labels(&["Submitted", "Reviewed", "In Progress", "Resolved", "Inspected"])
        );
    }

    #[test]
    fn unknown_report_names_the_id() {
        assert_eq!(
            unknown_report("#9999").to_string(),
            "Entity not found: Report with id #9999"
        );
    }

    #[test]
    fn pending_only_appends_extra_stages() {
        let next = next_progress(&labels(&["Submitted"]), ReportStatus::Pending, labels(&["Reviewed"]));
        assert_eq!(next, labels(&["Submitted", "Reviewed"]));
    }
}
