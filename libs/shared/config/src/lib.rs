use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";
pub const DEFAULT_SESSION_FILE: &str = ".dental-panel-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub backend_url: String,
    pub session_path: PathBuf,
    pub request_timeout_secs: u64,
    backend_url_explicit: bool,
}

impl PanelConfig {
    pub fn from_env() -> Self {
        let (backend_url, backend_url_explicit) = match env::var("BACKEND_URL") {
            Ok(url) if !url.trim().is_empty() => (url, true),
            _ => {
                warn!("BACKEND_URL not set, using {}", DEFAULT_BACKEND_URL);
                (DEFAULT_BACKEND_URL.to_string(), false)
            }
        };

        let session_path = env::var("PANEL_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        let request_timeout_secs = env::var("PANEL_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    warn!("PANEL_REQUEST_TIMEOUT_SECS={} is not a positive integer, using default", raw);
                    None
                }
            })
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let config = Self {
            backend_url: normalize_base_url(&backend_url),
            session_path,
            request_timeout_secs,
            backend_url_explicit,
        };

        if !config.is_configured() {
            warn!("Panel not fully configured - talking to the default backend");
        }

        config
    }

    /// Build a config pointing at an explicit backend, e.g. a mock server.
    pub fn new(backend_url: impl Into<String>, session_path: impl Into<PathBuf>) -> Self {
        Self {
            backend_url: normalize_base_url(&backend_url.into()),
            session_path: session_path.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            backend_url_explicit: true,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend_url_explicit && !self.backend_url.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
