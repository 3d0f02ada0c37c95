use std::sync::Arc;

use fixmyroad_workflow::api::WorkflowApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (auth only).
    pub pool: fixmyroad_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Upstream workflow client holding the service key.
    pub workflow: Arc<WorkflowApi>,
}

impl AppState {
    pub fn new(pool: fixmyroad_db::DbPool, config: ServerConfig) -> Self {
        let workflow = WorkflowApi::new(
            config.workflow.base_url.clone(),
            config.workflow.api_key.clone(),
            config.workflow.workflow_id.clone(),
        );
        Self {
            pool,
            config: Arc::new(config),
            workflow: Arc::new(workflow),
        }
    }
}
