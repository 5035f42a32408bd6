/// Configuration loading and management for the completion subsystem
use crate::error::{CompletionError, CompletionResult};
use ghostpad_providers::{AiSettings, ProxySettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Project-relative directory searched for configuration
pub const PROJECT_CONFIG_DIR: &str = ".ghostpad";
/// Application directory under the user config dir
pub const USER_CONFIG_DIR: &str = "ghostpad";
/// Configuration file stem
pub const CONFIG_FILE_STEM: &str = "completion";

/// Complete configuration of the completion subsystem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub ai: AiSettings,
    pub proxy: Option<ProxySettings>,
    pub throttle: ThrottleSettings,
    pub retry: RetrySettings,
    pub request: RequestSettings,
    pub timing: TimingSettings,
}

/// Request budget window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleSettings {
    pub max_requests: u32,
    pub window_ms: u64,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            max_requests: 6,
            window_ms: 10_000,
        }
    }
}

impl ThrottleSettings {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Retry after a filter rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub delay_ms: u64,
    /// How long a retry suggestion stays valid
    pub ttl_ms: u64,
    pub max_tokens: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            delay_ms: 2_000,
            ttl_ms: 30_000,
            max_tokens: 48,
        }
    }
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Primary completion request parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    /// Chars of document text sent before the cursor
    pub context_before_chars: usize,
    /// Chars of document text sent after the cursor
    pub context_after_chars: usize,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 128,
            timeout_ms: 15_000,
            context_before_chars: 2_000,
            context_after_chars: 600,
        }
    }
}

impl RequestSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Editor-side timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Batch window for placeholderizing several selections
    pub placeholder_debounce_ms: u64,
    /// Delay before asking the host to refresh suggestions after a ghost edit
    pub suggestion_refresh_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            placeholder_debounce_ms: 100,
            suggestion_refresh_ms: 15,
        }
    }
}

impl TimingSettings {
    pub fn placeholder_debounce(&self) -> Duration {
        Duration::from_millis(self.placeholder_debounce_ms)
    }

    pub fn suggestion_refresh(&self) -> Duration {
        Duration::from_millis(self.suggestion_refresh_ms)
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load completion configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: CompletionConfig = serde_yaml::from_str(&content)?;
        Self::finish(config)
    }

    /// Load completion configuration from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: CompletionConfig = serde_json::from_str(&content)?;
        Self::finish(config)
    }

    /// Load completion configuration from a string
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> CompletionResult<CompletionConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::finish(config)
    }

    /// Load configuration with hierarchy: Project → User → Defaults
    ///
    /// 1. **Project**: `.ghostpad/completion.{yaml,yml,json}` under `project_root`
    /// 2. **User**: `<config_dir>/ghostpad/completion.{yaml,yml,json}`
    /// 3. **Defaults**: [`CompletionConfig::default`]
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_with_hierarchy(project_root: &Path) -> CompletionResult<CompletionConfig> {
        let project_dir = project_root.join(PROJECT_CONFIG_DIR);
        if let Some(config) = Self::load_from_directory(&project_dir)? {
            debug!("Loaded completion config from {}", project_dir.display());
            return Ok(config);
        }

        if let Some(user_dir) = Self::user_config_dir() {
            if let Some(config) = Self::load_from_directory(&user_dir)? {
                debug!("Loaded completion config from {}", user_dir.display());
                return Ok(config);
            }
        }

        debug!("No completion config found, using defaults");
        Self::finish(CompletionConfig::default())
    }

    /// User-level configuration directory, if the platform has one
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR))
    }

    fn load_from_directory(dir: &Path) -> CompletionResult<Option<CompletionConfig>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        for ext in ["yaml", "yml"] {
            let path = dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext));
            if path.exists() {
                return Self::load_from_yaml(&path).map(Some);
            }
        }

        let json_path = dir.join(format!("{}.json", CONFIG_FILE_STEM));
        if json_path.exists() {
            return Self::load_from_json(&json_path).map(Some);
        }

        Ok(None)
    }

    fn finish(config: CompletionConfig) -> CompletionResult<CompletionConfig> {
        let config = CompletionConfig {
            ai: config.ai.with_env_fallback(),
            ..config
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Validate completion configuration
    pub fn validate_config(config: &CompletionConfig) -> CompletionResult<()> {
        if config.throttle.max_requests == 0 {
            return Err(CompletionError::config_error(
                "throttle.max_requests must be greater than zero",
            ));
        }

        if config.throttle.window_ms == 0 {
            return Err(CompletionError::config_error(
                "throttle.window_ms must be greater than zero",
            ));
        }

        if !(0.0..=2.0).contains(&config.request.temperature) {
            return Err(CompletionError::config_error(
                "request.temperature must be between 0 and 2",
            ));
        }

        if config.request.max_tokens == 0 || config.retry.max_tokens == 0 {
            return Err(CompletionError::config_error(
                "Token budgets must be greater than zero",
            ));
        }

        if config.ai.enabled && !config.ai.base_url.trim().is_empty() {
            let url = config.ai.base_url.trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CompletionError::config_error(format!(
                    "ai.base_url must start with http:// or https://, got {}",
                    url
                )));
            }
        }

        Ok(())
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}
