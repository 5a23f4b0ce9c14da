//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[sync]` table
    #[serde(default)]
    pub sync: SyncConfig,

    /// `[store]` table
    #[serde(default)]
    pub store: StoreConfig,

    /// `[territories]` table; territory injection is off without it
    #[serde(default)]
    pub territories: Option<TerritoriesConfig>,

    /// `[provider]` table
    #[serde(default)]
    pub provider: ProviderSettings,

    /// `[[locales]]` entries, in sync order
    #[serde(default)]
    pub locales: Vec<LocaleDescriptor>,
}

/// Sync engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Locale whose catalog defines the full key set and key order
    #[serde(default = "default_canonical_locale")]
    pub canonical_locale: String,

    /// Maximum keys per provider request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Number of locales processed in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Timeout for a single provider call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Keys starting with any of these prefixes are never machine-translated
    #[serde(default = "default_reserved_prefixes")]
    pub reserved_prefixes: Vec<String>,

    /// Literal terms the provider must leave untranslated
    #[serde(default)]
    pub preserve_terms: Vec<String>,

    /// Quote character the provider escapes by doubling
    #[serde(default = "default_quote_char")]
    pub quote_char: char,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            canonical_locale: default_canonical_locale(),
            chunk_size: default_chunk_size(),
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            reserved_prefixes: default_reserved_prefixes(),
            preserve_terms: Vec::new(),
            quote_char: default_quote_char(),
        }
    }
}

fn default_canonical_locale() -> String {
    "en".to_string()
}

fn default_chunk_size() -> usize {
    40
}

fn default_concurrency() -> usize {
    2
}

fn default_request_timeout_secs() -> u64 {
    180
}

fn default_reserved_prefixes() -> Vec<String> {
    vec!["language-".to_string()]
}

fn default_quote_char() -> char {
    '\''
}

/// Catalog store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one sub-directory per locale
    #[serde(default = "default_store_root")]
    pub root: String,

    /// Catalog file name inside each locale directory
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            file_name: default_file_name(),
        }
    }
}

fn default_store_root() -> String {
    "resources/translations".to_string()
}

fn default_file_name() -> String {
    "translation.json".to_string()
}

/// Auxiliary territory-name data (CLDR JSON layout)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerritoriesConfig {
    /// Directory holding `<taxonomy>/territories.json`
    pub root: String,
}

/// Translation provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Chat-completions API base URL
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_provider_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_provider_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// A target locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleDescriptor {
    /// Locale identifier, also the store key
    pub id: String,

    /// Display name handed to the provider
    pub name: String,

    /// Locale to translate from instead of the canonical locale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Identifier used to look up territory names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,
}

impl LocaleDescriptor {
    /// Create a descriptor without base or taxonomy
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base: None,
            taxonomy: None,
        }
    }

    /// Builder-style method to set the base locale
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Builder-style method to set the territory taxonomy
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: impl Into<String>) -> Self {
        self.taxonomy = Some(taxonomy.into());
        self
    }
}

/// Locale whose catalog a target locale is translated from
#[must_use]
pub fn effective_base_locale<'a>(descriptor: &'a LocaleDescriptor, canonical: &'a str) -> &'a str {
    descriptor.base.as_deref().unwrap_or(canonical)
}
