//! Shared fixtures for the workspace end-to-end tests

use ghostpad_completion::{CompletionConfig, ConfigFormat, ConfigLoader, CompletionResult};
use serde_json::json;

pub const TEST_MODEL: &str = "coder-small";
pub const TEST_API_KEY: &str = "test-key";

/// Body of a successful chat-completions answer
pub fn completion_body(content: &str) -> String {
    json!({
        "model": TEST_MODEL,
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
    .to_string()
}

/// YAML configuration pointing the AI path at `base_url`
pub fn config_yaml(base_url: &str, retry_delay_ms: u64) -> String {
    format!(
        "ai:\n  enabled: true\n  base_url: \"{}\"\n  api_key: \"{}\"\n  model: \"{}\"\nretry:\n  delay_ms: {}\n",
        base_url, TEST_API_KEY, TEST_MODEL, retry_delay_ms
    )
}

/// Parsed configuration for `base_url`
pub fn config_for(base_url: &str, retry_delay_ms: u64) -> CompletionResult<CompletionConfig> {
    ConfigLoader::load_from_string(&config_yaml(base_url, retry_delay_ms), ConfigFormat::Yaml)
}
