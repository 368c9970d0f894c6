//! Application configuration. Backend URL, session secret, paths.

use serde::Deserialize;

/// Default backend base URL (matches the development backend).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Backend base URL. Read from WSADMIN_BASE_URL.
    pub base_url: Option<String>,

    /// Secret for the encrypted session blob. Read from
    /// WSADMIN_SESSION_SECRET. Required; never compiled in.
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Directory for local state (session blob). Read from WSADMIN_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Explicit session blob path; overrides data_dir/session.enc.
    /// Read from WSADMIN_SESSION_PATH.
    #[serde(default)]
    pub session_path: Option<String>,

    /// HTTP request timeout in ms. Read from WSADMIN_REQUEST_TIMEOUT_MS.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("WSADMIN"));
        if let Ok(path) = std::env::var("WSADMIN_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the backend base URL. Defaults to the development backend.
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Returns the session secret if configured.
    pub fn session_secret(&self) -> Option<String> {
        self.session_secret
            .clone()
            .or_else(|| std::env::var("WSADMIN_SESSION_SECRET").ok())
            .filter(|s| !s.is_empty())
    }

    /// Returns the data directory. Defaults to "./data".
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.as_deref().unwrap_or("./data").to_string()
    }

    /// Returns the session blob path. Defaults to `<data_dir>/session.enc`.
    pub fn session_path_or_default(&self) -> std::path::PathBuf {
        self.session_path
            .as_deref()
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| {
                std::path::PathBuf::from(self.data_dir_or_default()).join("session.enc")
            })
    }

    /// Returns the request timeout. Defaults to 15s.
    pub fn request_timeout_ms_or_default(&self) -> u64 {
        self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    }
}
