//! Configuration for the chat-completion provider client
//!
//! Credentials are resolved once by the caller and passed in explicitly; the
//! client never reads the environment on its own while translating.

use crate::error::{ProviderError, ProviderResult};
use catsync_core::config::ProviderSettings;
use std::env;
use std::time::Duration;

/// Default chat-completions endpoint base
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier
const DEFAULT_MODEL: &str = "gpt-4o";

/// Provider client configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// API base URL (`/chat/completions` is appended)
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer token
    pub api_key: String,
    /// HTTP-level request timeout
    pub timeout: Duration,
    /// Sampling temperature
    pub temperature: f32,
}

// Keep the API key out of logs and panic messages.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(180),
            temperature: 0.0,
        }
    }
}

impl ProviderConfig {
    /// Build from file settings, reading the API key from the configured
    /// environment variable
    ///
    /// Overrides:
    /// - `CATSYNC_PROVIDER_URL`: API base URL
    /// - `CATSYNC_MODEL`: model identifier
    /// - `CATSYNC_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_settings(settings: &ProviderSettings, timeout: Duration) -> ProviderResult<Self> {
        let api_key = env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::missing_env(&settings.api_key_env))?;

        let base_url =
            env::var("CATSYNC_PROVIDER_URL").unwrap_or_else(|_| settings.base_url.clone());
        let model = env::var("CATSYNC_MODEL").unwrap_or_else(|_| settings.model.clone());
        let timeout = env::var("CATSYNC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(timeout, Duration::from_secs);

        let config = Self {
            base_url,
            model,
            api_key,
            timeout,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Full chat-completions URL
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ProviderResult<()> {
        if self.base_url.is_empty() {
            return Err(ProviderError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ProviderError::InvalidUrl(self.base_url.clone()));
        }

        if self.model.trim().is_empty() {
            return Err(ProviderError::config("model cannot be empty"));
        }

        if self.api_key.trim().is_empty() {
            return Err(ProviderError::config("api_key cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ProviderError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProviderConfig {
        ProviderConfig::default().with_api_key("sk-test")
    }

    #[test]
    fn test_default_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(180));
        assert!(config.validate().is_err(), "no api key yet");
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let config = valid().with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_validation() {
        assert!(valid().validate().is_ok());
        assert!(matches!(
            valid().with_base_url("ftp://example.com").validate(),
            Err(ProviderError::InvalidUrl(_))
        ));
        assert!(valid().with_model(" ").validate().is_err());
        assert!(ProviderConfig { timeout: Duration::ZERO, ..valid() }.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = ProviderSettings {
            api_key_env: "CATSYNC_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..ProviderSettings::default()
        };
        let err = ProviderConfig::from_settings(&settings, Duration::from_secs(10)).unwrap_err();
        assert!(matches!(err, ProviderError::MissingEnvVar(_)));
    }
}
