//! HTTP-level tests for the upstream and proxy clients against an
//! in-process fake server.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use fixmyroad_workflow::api::{WorkflowApi, SERVICE_KEY_HEADER};
use fixmyroad_workflow::live::LiveWorkflow;
use fixmyroad_workflow::poller::{JobPoller, PollConfig};
use fixmyroad_workflow::proxy::ProxyApi;
use fixmyroad_workflow::{ReportPayload, Submission, WorkflowApiError, WorkflowSubmitter};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Fake server
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Recorded {
    service_keys: Arc<Mutex<Vec<String>>>,
    execute_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn initiate(State(rec): State<Recorded>, headers: HeaderMap) -> Json<Value> {
    let key = headers
        .get(SERVICE_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    rec.service_keys.lock().unwrap().push(key);
    Json(json!({ "jobExecutionId": "job-42" }))
}

async fn execute(State(rec): State<Recorded>, Json(body): Json<Value>) -> StatusCode {
    rec.execute_bodies.lock().unwrap().push(body);
    StatusCode::OK
}

async fn job_status(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "status": "completed", "jobExecutionId": id, "outputs": { "ticket_id": "FMR-4242" } }))
}

async fn proxy_trigger(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["location"] == "fail" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to initiate workflow job", "details": "upstream down" })),
        );
    }
    (StatusCode::OK, Json(json!({ "jobExecutionId": "job-7" })))
}

async fn proxy_status(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "status": "completed", "outputs": { "ticket_id": format!("FMR-{}", id.len()) } }))
}

async fn spawn_fake(rec: Recorded) -> String {
    let app = Router::new()
        .route("/job/initiate", post(initiate))
        .route("/job/execute", post(execute))
        .route("/job/{id}/status", get(job_status))
        .route("/proxy/trigger", post(proxy_trigger))
        .route("/proxy/status/{id}", get(proxy_status))
        .with_state(rec);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn payload(location: &str, photo: Option<&str>) -> ReportPayload {
    ReportPayload {
        location: location.into(),
        description: "Pothole".into(),
        photo: photo.map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// Upstream client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_initiate_and_execute_carry_key_and_typed_inputs() {
    let rec = Recorded::default();
    let base = spawn_fake(rec.clone()).await;
    let api = WorkflowApi::new(base, "secret-key".into(), "wf-1".into());

    let job_id = api.initiate().await.unwrap();
    assert_eq!(job_id, "job-42");

    api.execute(&job_id, &payload("MG Road", None)).await.unwrap();

    assert_eq!(rec.service_keys.lock().unwrap().as_slice(), ["secret-key"]);
    let bodies = rec.execute_bodies.lock().unwrap();
    assert_eq!(bodies[0]["jobExecutionId"], "job-42");
    assert_eq!(
        bodies[0]["jobPayloadSchemaInstance"]["location"],
        json!({ "value": "MG Road", "type": "text" })
    );
    assert!(bodies[0]["jobPayloadSchemaInstance"].get("photo").is_none());
}

#[tokio::test]
async fn upstream_status_passes_payload_through() {
    let base = spawn_fake(Recorded::default()).await;
    let api = WorkflowApi::new(base, "k".into(), "wf".into());

    let status = api.status("job-9").await.unwrap();
    assert_eq!(status["status"], "completed");
    assert_eq!(status["jobExecutionId"], "job-9");
}

#[tokio::test]
async fn upstream_missing_route_is_api_error() {
    let base = spawn_fake(Recorded::default()).await;
    let api = WorkflowApi::new(base, "k".into(), "wf".into());

    let result = api.results("job-9").await;
    assert_matches!(result, Err(WorkflowApiError::ApiError { status: 404, .. }));
}

// ---------------------------------------------------------------------------
// Proxy client and live strategy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_submit_queues_job_and_poller_resolves_it() {
    let base = spawn_fake(Recorded::default()).await;
    let proxy = Arc::new(ProxyApi::new(format!("{base}/proxy/")));
    let live = LiveWorkflow::new(Arc::clone(&proxy));

    let submission = live.submit(&payload("MG Road", Some("data:x"))).await.unwrap();
    assert_eq!(submission, Submission::Queued("job-7".into()));

    let poller = JobPoller::new(
        proxy,
        PollConfig {
            interval: std::time::Duration::from_millis(10),
            timeout: std::time::Duration::from_secs(5),
        },
    );
    let outputs = poller.wait_for_completion("job-7").await.unwrap();
    assert_eq!(outputs["ticket_id"], "FMR-5");
}

#[tokio::test]
async fn live_submit_surfaces_remote_error_body_verbatim() {
    let base = spawn_fake(Recorded::default()).await;
    let live = LiveWorkflow::new(Arc::new(ProxyApi::new(format!("{base}/proxy"))));

    let result = live.submit(&payload("fail", None)).await;

    assert_matches!(
        result,
        Err(WorkflowApiError::ApiError { status: 500, body })
            if body.contains("Failed to initiate workflow job") && body.contains("upstream down")
    );
}
