use std::path::PathBuf;
use std::time::Duration;

use fixmyroad_workflow::demo::DEFAULT_DEMO_DELAY;
use fixmyroad_workflow::poller::PollConfig;

/// Default dashboard refresh interval in milliseconds.
const DEFAULT_DASHBOARD_REFRESH_MS: u64 = 5000;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local demo run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Classify locally instead of calling the backend proxy (default: `true`).
    pub demo_mode: bool,
    /// Backend proxy mount point for workflow calls.
    pub backend_url: String,
    /// Profile directory holding the persisted reports and statistics.
    pub data_dir: PathBuf,
    /// Status polling interval and timeout for live jobs.
    pub poll: PollConfig,
    /// Simulated processing time in demo mode.
    pub demo_delay: Duration,
    /// How often the dashboard re-reads the store.
    pub dashboard_refresh: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            demo_mode: true,
            backend_url: "http://localhost:3000/api/workflow".into(),
            data_dir: PathBuf::from(".fixmyroad"),
            poll: PollConfig::default(),
            demo_delay: DEFAULT_DEMO_DELAY,
            dashboard_refresh: Duration::from_millis(DEFAULT_DASHBOARD_REFRESH_MS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                               |
    /// |----------------------------------|---------------------------------------|
    /// | `FIXMYROAD_DEMO_MODE`            | `true`                                |
    /// | `FIXMYROAD_BACKEND_URL`          | `http://localhost:3000/api/workflow`  |
    /// | `FIXMYROAD_DATA_DIR`             | `.fixmyroad`                          |
    /// | `FIXMYROAD_POLL_INTERVAL_MS`     | `2000`                                |
    /// | `FIXMYROAD_POLL_TIMEOUT_MS`      | `60000`                               |
    /// | `FIXMYROAD_DEMO_DELAY_MS`        | `3000`                                |
    /// | `FIXMYROAD_DASHBOARD_REFRESH_MS` | `5000`                                |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let demo_mode = std::env::var("FIXMYROAD_DEMO_MODE")
            .map(|v| parse_bool(&v).expect("FIXMYROAD_DEMO_MODE must be true or false"))
            .unwrap_or(defaults.demo_mode);

        let backend_url =
            std::env::var("FIXMYROAD_BACKEND_URL").unwrap_or(defaults.backend_url);

        let data_dir = std::env::var("FIXMYROAD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let poll = PollConfig {
            interval: millis_var("FIXMYROAD_POLL_INTERVAL_MS", defaults.poll.interval),
            timeout: millis_var("FIXMYROAD_POLL_TIMEOUT_MS", defaults.poll.timeout),
        };

        Self {
            demo_mode,
            backend_url,
            data_dir,
            poll,
            demo_delay: millis_var("FIXMYROAD_DEMO_DELAY_MS", defaults.demo_delay),
            dashboard_refresh: millis_var(
                "FIXMYROAD_DASHBOARD_REFRESH_MS",
                defaults.dashboard_refresh,
            ),
        }
    }
}

fn millis_var(name: &str, default: Duration) -> Duration {
    match std::env::var(name) {
        Ok(raw) => Duration::from_millis(
            raw.parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid number of milliseconds")),
        ),
        Err(_) => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
