//! Engine settings derived from the run configuration

use crate::diff::ReservedKeys;
use crate::prompt::build_system_prompt;
use catsync_core::config::SyncConfig;
use std::time::Duration;

/// Immutable per-run settings shared by every locale task
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Locale whose catalog defines keys and order
    pub canonical_locale: String,
    /// Maximum keys per provider call
    pub chunk_size: usize,
    /// Deadline for one provider call
    pub request_timeout: Duration,
    /// Keys never sent to the provider
    pub reserved: ReservedKeys,
    /// Instructions sent with every chunk
    pub system_prompt: String,
}

impl SyncSettings {
    /// Derive settings from the `[sync]` table
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            canonical_locale: config.canonical_locale.clone(),
            chunk_size: config.chunk_size.max(1),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            reserved: ReservedKeys::new(config.reserved_prefixes.iter().cloned()),
            system_prompt: build_system_prompt(&config.preserve_terms, config.quote_char),
        }
    }

    /// Builder-style method to set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Builder-style method to set the provider timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let settings = SyncSettings::default();
        assert_eq!(settings.canonical_locale, "en");
        assert_eq!(settings.chunk_size, 40);
        assert_eq!(settings.request_timeout, Duration::from_secs(180));
        assert!(settings.reserved.is_reserved("language-code"));
        assert!(settings.system_prompt.contains("JSON object"));
    }

    #[test]
    fn test_chunk_size_floor() {
        assert_eq!(SyncSettings::default().with_chunk_size(0).chunk_size, 1);
    }
}
