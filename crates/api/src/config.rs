use crate::auth::jwt::JwtConfig;

/// Default upstream workflow service.
const DEFAULT_WORKFLOW_BASE_URL: &str = "https://operator.opus.com";

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Upstream workflow service credentials.
    pub workflow: WorkflowConfig,
}

/// Upstream workflow service settings. The key never leaves the server.
#[derive(Clone)]
pub struct WorkflowConfig {
    pub base_url: String,
    pub api_key: String,
    pub workflow_id: String,
}

impl std::fmt::Debug for WorkflowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("workflow_id", &self.workflow_id)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `HOST`                 | `0.0.0.0`                    |
    /// | `PORT`                 | `3000`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                         |
    ///
    /// JWT and workflow settings are read by [`JwtConfig::from_env`] and
    /// [`WorkflowConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            workflow: WorkflowConfig::from_env(),
        }
    }
}

impl WorkflowConfig {
    /// | Env Var             | Required | Default                     |
    /// |---------------------|----------|-----------------------------|
    /// | `WORKFLOW_API_KEY`  | **yes**  | --                          |
    /// | `WORKFLOW_ID`       | **yes**  | --                          |
    /// | `WORKFLOW_BASE_URL` | no       | `https://operator.opus.com` |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let api_key = std::env::var("WORKFLOW_API_KEY").expect("WORKFLOW_API_KEY must be set");
        assert!(!api_key.is_empty(), "WORKFLOW_API_KEY must not be empty");

        let workflow_id = std::env::var("WORKFLOW_ID").expect("WORKFLOW_ID must be set");
        assert!(!workflow_id.is_empty(), "WORKFLOW_ID must not be empty");

        let base_url = std::env::var("WORKFLOW_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_WORKFLOW_BASE_URL.into());

        Self {
            base_url,
            api_key,
            workflow_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_service_key() {
        let config = WorkflowConfig {
            base_url: "http://upstream".into(),
            api_key: "sk-live-123".into(),
            workflow_id: "wf-1".into(),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-live-123"));
        assert!(printed.contains("wf-1"));
    }
}
