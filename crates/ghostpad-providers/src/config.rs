//! Endpoint settings consumed from the host's settings store

use serde::{Deserialize, Serialize};

/// Environment variable consulted when the settings leave the API key empty
pub const API_KEY_ENV: &str = "GHOSTPAD_API_KEY";

/// AI completion settings
///
/// AI completion is disabled unless `enabled` is true and every string field
/// is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Whether all four settings are present
    pub fn is_configured(&self) -> bool {
        self.enabled
            && !self.base_url.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.model.trim().is_empty()
    }

    /// Fill an empty API key from [`API_KEY_ENV`]
    pub fn with_env_fallback(mut self) -> Self {
        if self.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.api_key = key;
            }
        }
        self
    }
}

/// HTTP proxy settings for the endpoint client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub enabled: bool,
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}
