/// Errors from the workflow REST layers (upstream service and backend proxy).
#[derive(Debug, thiserror::Error)]
pub enum WorkflowApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote side returned a non-2xx status code.
    #[error("Workflow API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body, passed through verbatim.
        body: String,
    },
}

/// Ensure the response has a success status code.
///
/// Returns the response unchanged on success, or
/// [`WorkflowApiError::ApiError`] with the status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, WorkflowApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(WorkflowApiError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WorkflowApiError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
