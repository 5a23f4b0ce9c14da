//! Error types for translation providers

use catsync_core::ErrorCode;
use thiserror::Error;

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Translation provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Provider returned an error response
    #[error("Provider error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error body returned by the provider
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Provider answered without any content
    #[error("Provider returned no content")]
    EmptyResponse,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other provider-side failure
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Whether the failure is a timeout, local or reported by the transport
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Request(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Whether a caller-level retry policy could reasonably try again
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) | Self::EmptyResponse => true,
            Self::Json(_)
            | Self::Config(_)
            | Self::MissingEnvVar(_)
            | Self::InvalidUrl(_)
            | Self::Other(_) => false,
        }
    }

    /// Map to the shared error code
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            _ if self.is_timeout() => ErrorCode::ProviderTimeout,
            Self::ApiResponse { status, .. } if (400..500).contains(status) => {
                ErrorCode::ProviderRejected
            }
            Self::Config(_) | Self::InvalidUrl(_) => ErrorCode::ConfigValidationError,
            Self::MissingEnvVar(_) => ErrorCode::MissingEnvVar,
            _ => ErrorCode::ProviderError,
        }
    }
}

impl From<ProviderError> for catsync_core::Error {
    fn from(err: ProviderError) -> Self {
        let mut error = Self::new(err.code(), err.to_string());
        if let ProviderError::MissingEnvVar(var) = &err {
            error = error.with_suggestion(format!("Export {var} before running the sync"));
        }
        error.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_classification() {
        let err = ProviderError::Timeout(Duration::from_secs(3));
        assert!(err.is_timeout());
        assert!(err.is_retryable());
        assert_eq!(err.code(), ErrorCode::ProviderTimeout);
    }

    #[test]
    fn test_status_classification() {
        let throttled = ProviderError::api_response(429, "slow down");
        assert!(throttled.is_retryable());
        assert_eq!(throttled.code(), ErrorCode::ProviderRejected);

        let server = ProviderError::api_response(503, "unavailable");
        assert!(server.is_retryable());
        assert_eq!(server.code(), ErrorCode::ProviderError);

        let bad_key = ProviderError::api_response(401, "invalid api key");
        assert!(!bad_key.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ProviderError::api_response(500, "boom");
        assert_eq!(err.to_string(), "Provider error (500): boom");
    }

    #[test]
    fn test_missing_env_converts_with_suggestion() {
        let err = catsync_core::Error::from(ProviderError::missing_env("OPENAI_API_KEY"));
        assert_eq!(err.code, ErrorCode::MissingEnvVar);
        assert_eq!(err.code.category(), "Configuration");
        assert!(err.suggestion.unwrap().contains("OPENAI_API_KEY"));
    }
}
