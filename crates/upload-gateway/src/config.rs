use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::UploadError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const API_URL_ENV: &str = "FEATURE_VIEWER_API_URL";
pub const TIMEOUT_ENV: &str = "FEATURE_VIEWER_TIMEOUT_SECS";

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the service; the upload endpoint is `{api_url}/upload`.
    pub api_url: String,
    /// Request timeout in seconds. STEP processing can be slow.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by `FEATURE_VIEWER_API_URL` and
    /// `FEATURE_VIEWER_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`GatewayConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UploadError> {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout_secs = raw.trim().parse().map_err(|_| UploadError::Config {
                reason: format!("{TIMEOUT_ENV}={raw:?} is not a whole number of seconds"),
            })?;
        }
        Ok(config)
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
