use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use fixmyroad_core::report::MAX_REPORT_BODY_BYTES;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/api/workflow`.
///
/// ```text
/// POST   /trigger                    initiate + execute a classification job
/// GET    /status/{job_execution_id}  upstream job status, passed through
/// GET    /results/{job_execution_id} upstream job results, passed through
/// ```
///
/// `/trigger` accepts bodies up to [`MAX_REPORT_BODY_BYTES`] so an encoded
/// photo at the client's size cap fits.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/trigger",
            post(workflow::trigger).layer(DefaultBodyLimit::max(MAX_REPORT_BODY_BYTES)),
        )
        .route("/status/{job_execution_id}", get(workflow::status))
        .route("/results/{job_execution_id}", get(workflow::results))
}
