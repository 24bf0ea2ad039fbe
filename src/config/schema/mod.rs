use crate::errors::MoodflixError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Where the backend lives and how long the transport waits for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url", rename = "baseUrl")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout", rename = "connectTimeoutSecs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout", rename = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash, ready for `base + path`.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding the poster cache and session token.
    /// `None` resolves to `<home>/state`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(crate::utils::get_moodflix_home()?.join("state")),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), MoodflixError> {
        self.validate_api()
    }

    fn validate_api(&self) -> Result<(), MoodflixError> {
        let raw = self.api.normalized_base_url();
        if raw.is_empty() {
            return Err(MoodflixError::Config("api.baseUrl must not be empty".into()));
        }
        let parsed = url::Url::parse(&raw).map_err(|e| {
            MoodflixError::Config(format!("api.baseUrl '{}' is not a valid URL: {}", raw, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MoodflixError::Config(format!(
                "api.baseUrl must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(MoodflixError::Config(format!(
                "api.baseUrl '{}' has no host",
                raw
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(MoodflixError::Config(
                "api.requestTimeoutSecs must be > 0".into(),
            ));
        }
        if self.api.connect_timeout_secs == 0 {
            return Err(MoodflixError::Config(
                "api.connectTimeoutSecs must be > 0".into(),
            ));
        }
        Ok(())
    }
}
