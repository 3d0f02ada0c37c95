use axum::{routing::get, Json, Router};
use chrono::Utc;
use fixmyroad_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: Timestamp,
}

/// GET /health -- liveness only; the database is not consulted.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running",
        timestamp: Utc::now(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
