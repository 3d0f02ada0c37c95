pub mod auth;
pub mod health;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /health                     liveness
/// /auth/signup, /auth/login   account auth
/// /workflow/...               upstream workflow proxy
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/workflow", workflow::router())
}
