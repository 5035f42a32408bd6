//! Error types for the completion crate

use ghostpad_providers::ProviderError;
use thiserror::Error;

/// Completion subsystem error
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Remote endpoint error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Position outside the document
    #[error("Invalid position {line}:{column}")]
    InvalidPosition { line: u32, column: u32 },
}

impl CompletionError {
    pub fn config_error(message: impl Into<String>) -> Self {
        CompletionError::ConfigError(message.into())
    }
}

pub type CompletionResult<T> = Result<T, CompletionError>;
