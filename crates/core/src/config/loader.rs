//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed configuration
    pub schema: ConfigSchema,
    /// File the configuration came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist; without one the standard locations are
    /// searched and defaults are used when none is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from an in-memory schema
    pub fn from_schema(schema: ConfigSchema) -> Result<Self> {
        let config = Self { schema, path: None };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the sync engine relies on
    pub fn validate(&self) -> Result<()> {
        let sync = &self.schema.sync;

        if sync.canonical_locale.trim().is_empty() {
            return Err(Error::config_validation("sync.canonical_locale cannot be empty"));
        }
        if sync.chunk_size == 0 {
            return Err(Error::config_validation("sync.chunk_size must be at least 1"));
        }
        if sync.concurrency == 0 {
            return Err(Error::config_validation("sync.concurrency must be at least 1"));
        }
        if sync.request_timeout_secs == 0 {
            return Err(Error::config_validation("sync.request_timeout_secs cannot be zero"));
        }

        let mut seen = HashSet::new();
        for locale in &self.schema.locales {
            if locale.id.trim().is_empty() {
                return Err(Error::config_validation("locale id cannot be empty"));
            }
            if locale.id == sync.canonical_locale {
                return Err(Error::config_validation(format!(
                    "locale {} is the canonical locale and cannot be a sync target",
                    locale.id
                )));
            }
            if !seen.insert(locale.id.as_str()) {
                return Err(Error::config_validation(format!(
                    "locale {} is configured more than once",
                    locale.id
                )));
            }
            if locale.base.as_deref() == Some(locale.id.as_str()) {
                return Err(Error::config_validation(format!(
                    "locale {} cannot use itself as base",
                    locale.id
                )));
            }
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["catsync.toml", ".catsync.toml", ".config/catsync.toml"];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(ToString::to_string)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {path}: {e}")).with_source(e)
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::from(e).with_context(format!("While parsing {path}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocaleDescriptor;
    use crate::error::ErrorCode;

    fn schema_with(locales: Vec<LocaleDescriptor>) -> ConfigSchema {
        ConfigSchema {
            locales,
            ..ConfigSchema::default()
        }
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::load(Some("/nonexistent/catsync.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catsync.toml");
        std::fs::write(
            &path,
            "[sync]\nchunk_size = 5\n\n[[locales]]\nid = \"fr\"\nname = \"French\"\n",
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.schema.sync.chunk_size, 5);
        assert_eq!(config.schema.locales.len(), 1);
        assert!(config.path.is_some());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catsync.toml");
        std::fs::write(&path, "[sync\nchunk_size = ").unwrap();

        let err = Config::load(path.to_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut schema = ConfigSchema::default();
        schema.sync.chunk_size = 0;
        let err = Config::from_schema(schema).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_duplicate_locale_rejected() {
        let schema = schema_with(vec![
            LocaleDescriptor::new("fr", "French"),
            LocaleDescriptor::new("fr", "French again"),
        ]);
        assert!(Config::from_schema(schema).is_err());
    }

    #[test]
    fn test_canonical_locale_not_a_target() {
        let schema = schema_with(vec![LocaleDescriptor::new("en", "English")]);
        assert!(Config::from_schema(schema).is_err());
    }

    #[test]
    fn test_valid_locales_accepted() {
        let schema = schema_with(vec![
            LocaleDescriptor::new("zh-TW", "Traditional Chinese"),
            LocaleDescriptor::new("zh-HK", "Chinese (Hong Kong)").with_base("zh-TW"),
        ]);
        assert!(Config::from_schema(schema).is_ok());
    }
}
