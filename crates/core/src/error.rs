//! Error handling with codes, context and recovery suggestions
//!
//! This module provides the structured error type shared by every catsync crate:
//! - Error codes for programmatic handling (grouped by concern)
//! - Optional context and recovery suggestions
//! - Serializable error reports for JSON output

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    /// Unclassified failure
    Unknown = 1000,
    /// Bug or panic inside catsync
    Internal = 1001,
    /// Work stopped by a shutdown request
    Cancelled = 1002,

    // Configuration errors (3xxx)
    /// Configuration could not be read
    ConfigError = 3000,
    /// Explicit configuration path does not exist
    ConfigNotFound = 3001,
    /// Configuration is not valid TOML for the schema
    ConfigParseError = 3002,
    /// Configuration values are out of range or inconsistent
    ConfigValidationError = 3003,
    /// Required environment variable is unset
    MissingEnvVar = 3004,

    // Catalog store errors (4xxx)
    /// Catalog could not be read, or does not exist
    StoreReadError = 4001,
    /// Catalog could not be written
    StoreWriteError = 4002,
    /// Catalog file is not a valid catalog
    CatalogParseError = 4003,

    // Provider errors (5xxx)
    /// Provider call failed
    ProviderError = 5000,
    /// Provider call timed out
    ProviderTimeout = 5001,
    /// Provider refused the request
    ProviderRejected = 5002,

    // Provider response errors (6xxx)
    /// No JSON object found in provider output
    ExtractionError = 6001,
    /// Provider JSON could not be repaired
    RepairError = 6002,

    // Sync errors (7xxx)
    /// Territory names could not be loaded
    TerritoryDataError = 7002,
}

impl ErrorCode {
    /// Get the numeric code
    #[must_use]
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            3 => "Configuration",
            4 => "Catalog",
            5 => "Provider",
            6 => "Response",
            7 => "Sync",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    #[must_use]
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(ToString::to_string),
        }
    }

    /// Configuration could not be read
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicit configuration path does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a catsync.toml file or use --config to specify a path")
    }

    /// Configuration values are invalid
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code
    pub code: ErrorCode,
    /// Code rendered as `E####`
    pub code_str: String,
    /// Code category
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Every locale succeeded
    pub const SUCCESS: i32 = 0;
    /// Unclassified failure
    pub const FAILURE: i32 = 1;
    /// At least one locale failed or finished partially
    pub const PARTIAL: i32 = 2;
    /// Configuration could not be loaded or validated
    pub const CONFIG_ERROR: i32 = 3;
    /// A catalog could not be read or written
    pub const STORE_ERROR: i32 = 4;
    /// Stopped by Ctrl-C
    pub const INTERRUPTED: i32 = 130;
}

// Implement From for common error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
