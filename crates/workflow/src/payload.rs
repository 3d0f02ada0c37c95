//! Wire types shared by the upstream client, the proxy client, and the
//! backend routes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Content-type marker attached to each workflow input.
pub const INPUT_TYPE_TEXT: &str = "text";

/// Report fields sent for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub location: String,
    pub description: String,
    /// Encoded photo (data URL), omitted when no photo was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl ReportPayload {
    /// Build the `jobPayloadSchemaInstance` object for the execute call.
    ///
    /// Every input is wrapped as `{ "value": ..., "type": "text" }`; the
    /// `photo` input is left out entirely when absent.
    pub fn schema_instance(&self) -> Value {
        let mut inputs = Map::new();
        inputs.insert("location".into(), typed_input(&self.location));
        inputs.insert("description".into(), typed_input(&self.description));
        if let Some(photo) = &self.photo {
            inputs.insert("photo".into(), typed_input(photo));
        }
        Value::Object(inputs)
    }
}

fn typed_input(value: &str) -> Value {
    json!({ "value": value, "type": INPUT_TYPE_TEXT })
}

/// `{ "jobExecutionId": ... }`, returned by job initiation and by the
/// backend's trigger route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub job_execution_id: String,
}

/// Status payload of a remote job.
///
/// Only `status` and `outputs` are interpreted; everything else the service
/// sends is kept in `extra` so the proxy can pass it through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
