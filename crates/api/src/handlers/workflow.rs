//! Handlers for the `/workflow` proxy resource.
//!
//! Each call is forwarded to the upstream workflow service with the service
//! key attached server-side. Upstream bodies are passed through as-is.

use axum::extract::{Path, State};
use axum::Json;
use fixmyroad_core::report::validate_required_fields;
use fixmyroad_workflow::payload::JobHandle;
use fixmyroad_workflow::ReportPayload;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/workflow/trigger
///
/// Initiate a job for the configured workflow, then execute it with the
/// report inputs. Returns the job execution id.
pub async fn trigger(
    State(state): State<AppState>,
    Json(input): Json<ReportPayload>,
) -> AppResult<Json<JobHandle>> {
    validate_required_fields(&input.location, &input.description)?;

    let job_execution_id = state
        .workflow
        .initiate()
        .await
        .map_err(|e| AppError::upstream("Failed to initiate workflow job", e))?;
    tracing::info!(job_execution_id = %job_execution_id, "Workflow job initiated");

    state
        .workflow
        .execute(&job_execution_id, &input)
        .await
        .map_err(|e| AppError::upstream("Failed to execute workflow job", e))?;
    tracing::info!(
        job_execution_id = %job_execution_id,
        has_photo = input.photo.is_some(),
        "Workflow job executing",
    );

    Ok(Json(JobHandle { job_execution_id }))
}

/// GET /api/workflow/status/{job_execution_id}
pub async fn status(
    State(state): State<AppState>,
    Path(job_execution_id): Path<String>,
) -> AppResult<Json<Value>> {
    let data = state
        .workflow
        .status(&job_execution_id)
        .await
        .map_err(|e| AppError::upstream("Failed to check job status", e))?;

    let status = data.get("status").and_then(|s| s.as_str()).unwrap_or("?");
    tracing::debug!(
        job_execution_id = %job_execution_id,
        status,
        "Job status checked",
    );
    Ok(Json(data))
}

/// GET /api/workflow/results/{job_execution_id}
pub async fn results(
    State(state): State<AppState>,
    Path(job_execution_id): Path<String>,
) -> AppResult<Json<Value>> {
    let data = state
        .workflow
        .results(&job_execution_id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch job results", e))?;

    tracing::info!(job_execution_id = %job_execution_id, "Job results retrieved");
    Ok(Json(data))
}
