use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration shared by the API client, the state stores and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Versioned REST base, e.g. `http://localhost:8080/api/v1`.
    pub api_base_url: String,
    pub api_timeout_secs: u64,
    pub user_agent: String,
    /// File backing the persisted key/value state (token, cart, selected store).
    pub state_path: PathBuf,
    pub log_level: String,
    /// When `true`, catalogue reads substitute static data on remote failure.
    pub offline_fallback: bool,
    /// When `true`, every request carries `X-Request-Id` and `X-Timestamp`.
    pub send_trace_headers: bool,
    /// Coordinates used when the device location cannot be resolved.
    pub default_latitude: f64,
    pub default_longitude: f64,
}
