//! Structured logging setup
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` always wins over the
//! configured level.

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,
    /// Line format
    pub format: LogFormat,
    /// Include the event target
    pub show_target: bool,
    /// Include thread ids
    pub show_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Compact,
            show_target: false,
            show_thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Debug-level configuration for `--verbose`
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            log_level: "debug".to_string(),
            show_target: true,
            ..Self::default()
        }
    }

    /// Builder-style method to set the format
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Initialize the global subscriber
pub fn init(config: &LogConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .json(),
            )
            .try_init(),
    };

    installed.map_err(|e| {
        Error::new(
            ErrorCode::Internal,
            format!("Failed to set tracing subscriber: {e}"),
        )
    })?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_config() {
        let config = LogConfig::verbose();
        assert_eq!(config.log_level, "debug");
        assert!(config.show_target);
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_format_serialization() {
        let json = serde_json::to_string(&LogFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");
    }
}
