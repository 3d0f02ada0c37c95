#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use fixmyroad_api::auth::jwt::JwtConfig;
use fixmyroad_api::config::{ServerConfig, WorkflowConfig};
use fixmyroad_api::router::build_app_router;
use fixmyroad_api::state::AppState;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const TEST_SERVICE_KEY: &str = "sk-test-do-not-leak";
pub const TEST_WORKFLOW_ID: &str = "wf-road-triage";

/// Test `ServerConfig` pointing the workflow client at `workflow_base_url`.
pub fn test_config(workflow_base_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 60,
        },
        workflow: WorkflowConfig {
            base_url: workflow_base_url.to_string(),
            api_key: TEST_SERVICE_KEY.to_string(),
            workflow_id: TEST_WORKFLOW_ID.to_string(),
        },
    }
}

/// Full application router over `pool`, with the same middleware as
/// production.
pub fn build_test_app(pool: PgPool, workflow_base_url: &str) -> Router {
    build_app_router(AppState::new(pool, test_config(workflow_base_url)))
}

/// Router for tests that never touch the database. The pool is lazy and
/// never connects.
pub fn build_app_without_db(workflow_base_url: &str) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://fixmyroad@localhost/unused")
        .expect("lazy pool");
    build_test_app(pool, workflow_base_url)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    use tower::ServiceExt;

    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    use tower::ServiceExt;

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
