//! Error types for the providers module

use thiserror::Error;

/// Errors that can occur when talking to a completion endpoint
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// Authentication failed (never includes key details)
    #[error("Authentication failed")]
    AuthError,

    /// Rate limited by the endpoint
    #[error("Rate limited by endpoint")]
    RateLimited,

    /// Network error occurred
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request did not finish in time
    #[error("Request timeout")]
    Timeout,

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Generic provider error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The response had no usable message content
    #[error("Response contained no completion content")]
    EmptyResponse,
}

impl ProviderError {
    /// Transport-level failures that the caller should treat as "no suggestion"
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::NetworkError(_)
                | ProviderError::Timeout
                | ProviderError::HttpStatus { .. }
                | ProviderError::RateLimited
                | ProviderError::AuthError
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::NetworkError(err.to_string())
        } else if err.is_decode() {
            ProviderError::SerializationError(err.to_string())
        } else {
            ProviderError::ProviderError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(ProviderError::Timeout.is_transport());
        assert!(ProviderError::HttpStatus {
            status: 500,
            message: "boom".to_string()
        }
        .is_transport());
        assert!(!ProviderError::EmptyResponse.is_transport());
        assert!(!ProviderError::ConfigError("x".to_string()).is_transport());
    }

    #[test]
    fn test_auth_error_hides_details() {
        assert_eq!(ProviderError::AuthError.to_string(), "Authentication failed");
    }
}
