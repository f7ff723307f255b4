use serde::{Deserialize, Serialize};

/// Backend the client talks to when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";

/// Client configuration, persisted as `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the mail backend, without the `/api` prefix.
    pub api_base_url: String,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Per-request timeout for backend calls.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Applies `POSTBOX_API_URL` and `POSTBOX_LOG` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("POSTBOX_API_URL").ok(),
            std::env::var("POSTBOX_LOG").ok(),
        )
    }

    pub fn with_overrides(mut self, api_base_url: Option<String>, log_level: Option<String>) -> Self {
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
        self
    }

    /// Base URL with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
