//! Integration tests for the `/api/workflow` proxy against an in-process
//! fake of the upstream workflow service.

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{body_json, build_app_without_db, get as get_req, post_json, TEST_SERVICE_KEY};
use fixmyroad_core::report::{MAX_PHOTO_BYTES, MAX_REPORT_BODY_BYTES};
use fixmyroad_workflow::api::SERVICE_KEY_HEADER;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Fake upstream
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Upstream {
    service_keys: Arc<Mutex<Vec<String>>>,
    initiate_bodies: Arc<Mutex<Vec<Value>>>,
    execute_bodies: Arc<Mutex<Vec<Value>>>,
    /// When set, `/job/execute` answers 422 with this body.
    reject_execute: Option<&'static str>,
}

impl Upstream {
    fn record_key(&self, headers: &HeaderMap) {
        let key = headers
            .get(SERVICE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.service_keys.lock().unwrap().push(key);
    }
}

async fn initiate(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    up.record_key(&headers);
    up.initiate_bodies.lock().unwrap().push(body);
    Json(json!({ "jobExecutionId": "job-2401" }))
}

async fn execute(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    up.record_key(&headers);
    up.execute_bodies.lock().unwrap().push(body);
    match up.reject_execute {
        Some(reason) => (StatusCode::UNPROCESSABLE_ENTITY, reason.to_string()),
        None => (StatusCode::OK, "{}".to_string()),
    }
}

async fn status(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    up.record_key(&headers);
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "no such job" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "status": "running", "jobExecutionId": id, "progress": 40 })),
    )
}

async fn results(State(up): State<Upstream>, headers: HeaderMap, Path(id): Path<String>) -> Json<Value> {
    up.record_key(&headers);
    Json(json!({
        "jobExecutionId": id,
        "outputs": {
            "ticket_id": "FMR-7731",
            "severity_score": "8.5/10",
            "severity_level": "high",
            "assigned_department": "Emergency Services"
        }
    }))
}

async fn spawn_upstream(up: Upstream) -> String {
    let app = Router::new()
        .route("/job/initiate", post(initiate))
        .route("/job/execute", post(execute))
        .route("/job/{id}/status", get(status))
        .route("/job/{id}/results", get(results))
        .layer(DefaultBodyLimit::disable())
        .with_state(up);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn report() -> Value {
    json!({
        "location": "MG Road, near Central Square",
        "description": "Deep pothole",
        "photo": "data:image/png;base64,iVBORw0KGgo="
    })
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trigger_initiates_then_executes_with_service_key() {
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;

    let response = post_json(build_app_without_db(&base), "/api/workflow/trigger", report()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SERVICE_KEY_HEADER).is_none());

    let json = body_json(response).await;
    assert_eq!(json, json!({ "jobExecutionId": "job-2401" }));

    assert_eq!(
        up.service_keys.lock().unwrap().as_slice(),
        [TEST_SERVICE_KEY, TEST_SERVICE_KEY]
    );
    assert_eq!(
        up.initiate_bodies.lock().unwrap()[0],
        json!({ "workflowId": common::TEST_WORKFLOW_ID })
    );

    let execute = &up.execute_bodies.lock().unwrap()[0];
    assert_eq!(execute["jobExecutionId"], "job-2401");
    let inputs = &execute["jobPayloadSchemaInstance"];
    assert_eq!(inputs["description"], json!({ "value": "Deep pothole", "type": "text" }));
    assert_eq!(inputs["photo"]["type"], "text");
}

/// Data URL the client would send for a photo of `raw_bytes` bytes.
fn photo_data_url(raw_bytes: usize) -> String {
    format!("data:image/png;base64,{}", "A".repeat(raw_bytes.div_ceil(3) * 4))
}

#[tokio::test]
async fn trigger_accepts_multi_megabyte_photo() {
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;

    let photo = photo_data_url(3 * 1024 * 1024);
    let response = post_json(
        build_app_without_db(&base),
        "/api/workflow/trigger",
        json!({ "location": "MG Road", "description": "Pothole", "photo": photo }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let execute = &up.execute_bodies.lock().unwrap()[0];
    assert_eq!(execute["jobPayloadSchemaInstance"]["photo"]["value"], photo.as_str());
}

#[tokio::test]
async fn trigger_accepts_photo_at_client_size_cap() {
    let base = spawn_upstream(Upstream::default()).await;

    let response = post_json(
        build_app_without_db(&base),
        "/api/workflow/trigger",
        json!({
            "location": "MG Road",
            "description": "Pothole",
            "photo": photo_data_url(MAX_PHOTO_BYTES),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trigger_rejects_body_over_limit() {
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;

    let response = post_json(
        build_app_without_db(&base),
        "/api/workflow/trigger",
        json!({
            "location": "MG Road",
            "description": "Pothole",
            "photo": "A".repeat(MAX_REPORT_BODY_BYTES + 1),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(up.service_keys.lock().unwrap().is_empty());
}

#[tokio::test]
async fn trigger_rejects_blank_location_without_calling_upstream() {
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;

    let response = post_json(
        build_app_without_db(&base),
        "/api/workflow/trigger",
        json!({ "location": " ", "description": "Pothole" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(up.service_keys.lock().unwrap().is_empty());
}

#[tokio::test]
async fn trigger_relays_upstream_rejection() {
    let up = Upstream {
        reject_execute: Some("photo input too large"),
        ..Upstream::default()
    };
    let base = spawn_upstream(up).await;

    let response = post_json(build_app_without_db(&base), "/api/workflow/trigger", report()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to execute workflow job");
    assert_eq!(json["details"], "photo input too large");
    assert!(!json.to_string().contains(TEST_SERVICE_KEY));
}

#[tokio::test]
async fn unreachable_upstream_is_a_500_with_details() {
    // Nothing listens on the discard port.
    let response = post_json(
        build_app_without_db("http://127.0.0.1:9"),
        "/api/workflow/trigger",
        report(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Internal server error");
    assert!(json["details"].is_string());
}

// ---------------------------------------------------------------------------
// Status / results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_passes_upstream_payload_through() {
    let up = Upstream::default();
    let base = spawn_upstream(up.clone()).await;

    let response = get_req(build_app_without_db(&base), "/api/workflow/status/job-2401").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "running");
    assert_eq!(json["progress"], 40);
    assert_eq!(up.service_keys.lock().unwrap().as_slice(), [TEST_SERVICE_KEY]);
}

#[tokio::test]
async fn status_of_unknown_job_relays_404() {
    let base = spawn_upstream(Upstream::default()).await;

    let response = get_req(build_app_without_db(&base), "/api/workflow/status/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to check job status");
    assert_eq!(json["details"], r#"{"message":"no such job"}"#);
}

#[tokio::test]
async fn results_pass_outputs_through() {
    let base = spawn_upstream(Upstream::default()).await;

    let response = get_req(build_app_without_db(&base), "/api/workflow/results/job-2401").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["outputs"]["ticket_id"], "FMR-7731");
    assert_eq!(json["outputs"]["assigned_department"], "Emergency Services");
}
