//! Message catalogs and the catalog store
//!
//! A catalog is an ordered mapping from message key to either a plain string
//! or a nested string mapping (plural/parameterized forms). Key order is kept
//! exactly as loaded so that catalogs round-trip through the store without
//! reordering.

use crate::error::ErrorCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::debug;

/// A single catalog value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// Plain message text
    Text(String),
    /// Nested string mapping, e.g. plural categories
    Plural(IndexMap<String, String>),
}

impl Message {
    /// Borrow the plain text, if this is a `Text` value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Plural(_) => None,
        }
    }

    /// Rewrite every string inside the message
    #[must_use]
    pub fn map_strings(self, f: impl Fn(String) -> String) -> Self {
        match self {
            Self::Text(s) => Self::Text(f(s)),
            Self::Plural(forms) => Self::Plural(forms.into_iter().map(|(k, v)| (k, f(v))).collect()),
        }
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered message catalog
pub type Catalog = IndexMap<String, Message>;

/// Render a catalog the way it is persisted: two-space pretty JSON plus a
/// trailing newline.
pub fn to_pretty_json(catalog: &Catalog) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(catalog)?;
    out.push('\n');
    Ok(out)
}

/// Parse catalog text, preserving key order
pub fn parse_catalog(text: &str) -> serde_json::Result<Catalog> {
    serde_json::from_str(text)
}

/// Catalog store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the catalog file failed
    #[error("failed to read catalog for {locale} at {}: {source}", path.display())]
    Read {
        /// Locale being loaded or saved
        locale: String,
        /// Catalog file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// The catalog file exists but is not a valid catalog
    #[error("failed to parse catalog for {locale} at {}: {source}", path.display())]
    Parse {
        /// Locale being loaded or saved
        locale: String,
        /// Catalog file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: serde_json::Error,
    },

    /// Writing the catalog failed
    #[error("failed to write catalog for {locale} at {}: {source}", path.display())]
    Write {
        /// Locale being loaded or saved
        locale: String,
        /// Catalog file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// The catalog could not be rendered
    #[error("failed to serialize catalog for {locale}: {source}")]
    Serialize {
        /// Locale being saved
        locale: String,
        /// Underlying failure
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the write (in-memory store only)
    #[error("catalog store rejected write for {locale}")]
    Rejected {
        /// Locale being saved
        locale: String,
    },
}

impl StoreError {
    /// Map to the shared error code
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::StoreReadError,
            Self::Parse { .. } => ErrorCode::CatalogParseError,
            Self::Write { .. } | Self::Serialize { .. } | Self::Rejected { .. } => {
                ErrorCode::StoreWriteError
            }
        }
    }

    /// Locale the failure concerns
    #[must_use]
    pub fn locale(&self) -> &str {
        match self {
            Self::Read { locale, .. }
            | Self::Parse { locale, .. }
            | Self::Write { locale, .. }
            | Self::Serialize { locale, .. }
            | Self::Rejected { locale } => locale,
        }
    }

    /// Whether the failure happened while persisting
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Write { .. } | Self::Serialize { .. } | Self::Rejected { .. }
        )
    }
}

/// Persistent catalog storage keyed by locale identifier
///
/// Implementations must be shareable across worker tasks. `load` returns
/// `Ok(None)` when no catalog exists yet for the locale.
pub trait CatalogStore: Send + Sync {
    /// Load the catalog for a locale
    fn load(&self, locale: &str) -> Result<Option<Catalog>, StoreError>;

    /// Replace the catalog for a locale
    fn save(&self, locale: &str, catalog: &Catalog) -> Result<(), StoreError>;
}

/// JSON files laid out as `<root>/<locale>/<file_name>`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    file_name: String,
}

impl JsonFileStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Root directory of the store
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the catalog file for a locale
    #[must_use]
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.root.join(locale).join(&self.file_name)
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self, locale: &str) -> Result<Option<Catalog>, StoreError> {
        let path = self.path_for(locale);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(locale, path = %path.display(), "No catalog on disk");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    locale: locale.to_string(),
                    path,
                    source,
                });
            }
        };

        parse_catalog(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                locale: locale.to_string(),
                path,
                source,
            })
    }

    fn save(&self, locale: &str, catalog: &Catalog) -> Result<(), StoreError> {
        let path = self.path_for(locale);
        let write_err = |source: io::Error| StoreError::Write {
            locale: locale.to_string(),
            path: path.clone(),
            source,
        };

        let rendered = to_pretty_json(catalog).map_err(|source| StoreError::Serialize {
            locale: locale.to_string(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write next to the target, then rename over it.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, rendered).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;

        debug!(locale, keys = catalog.len(), path = %path.display(), "Catalog saved");
        Ok(())
    }
}

/// In-process catalog store
///
/// Used by tests and by callers embedding the engine without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalogs: Mutex<HashMap<String, Catalog>>,
    writes: Mutex<HashMap<String, usize>>,
    rejected: Mutex<HashSet<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to seed a catalog
    #[must_use]
    pub fn with_catalog(self, locale: &str, catalog: Catalog) -> Self {
        lock(&self.catalogs).insert(locale.to_string(), catalog);
        self
    }

    /// Current catalog for a locale
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<Catalog> {
        lock(&self.catalogs).get(locale).cloned()
    }

    /// Persisted rendering of a locale's catalog
    #[must_use]
    pub fn rendered(&self, locale: &str) -> Option<String> {
        self.get(locale).and_then(|c| to_pretty_json(&c).ok())
    }

    /// Number of successful saves for a locale
    #[must_use]
    pub fn writes(&self, locale: &str) -> usize {
        lock(&self.writes).get(locale).copied().unwrap_or(0)
    }

    /// Make every future save for `locale` fail
    pub fn reject_writes(&self, locale: &str) {
        lock(&self.rejected).insert(locale.to_string());
    }
}

impl CatalogStore for MemoryStore {
    fn load(&self, locale: &str) -> Result<Option<Catalog>, StoreError> {
        Ok(self.get(locale))
    }

    fn save(&self, locale: &str, catalog: &Catalog) -> Result<(), StoreError> {
        if lock(&self.rejected).contains(locale) {
            return Err(StoreError::Rejected {
                locale: locale.to_string(),
            });
        }
        lock(&self.catalogs).insert(locale.to_string(), catalog.clone());
        *lock(&self.writes).entry(locale.to_string()).or_default() += 1;
        Ok(())
    }
}

/// Build a catalog from string pairs, keeping the given order
pub fn catalog_from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Catalog {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Message::from(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_preserves_order() {
        let catalog = parse_catalog(r#"{"zeta": "z", "alpha": "a", "mid": {"one": "1", "other": "n"}}"#)
            .unwrap();
        let keys: Vec<_> = catalog.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert!(matches!(catalog["mid"], Message::Plural(_)));
    }

    #[test]
    fn test_pretty_json_has_trailing_newline() {
        let catalog = catalog_from_pairs([("greeting", "Hello")]);
        let rendered = to_pretty_json(&catalog).unwrap();
        assert_eq!(rendered, "{\n  \"greeting\": \"Hello\"\n}\n");
    }

    #[test]
    fn test_file_store_missing_locale_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path(), "translation.json");
        assert!(store.load("fr").unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip_keeps_text() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path(), "translation.json");
        let catalog = catalog_from_pairs([
            ("b-key", "multi\nline"),
            ("a-key", "it's \"quoted\""),
            ("c-key", "日本語"),
        ]);

        store.save("ja", &catalog).unwrap();
        let loaded = store.load("ja").unwrap().unwrap();
        assert_eq!(loaded, catalog);

        let raw = fs::read_to_string(store.path_for("ja")).unwrap();
        assert!(raw.contains("日本語"));
        assert!(raw.ends_with("}\n"));
        assert!(!store.path_for("ja").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_parse_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path(), "translation.json");
        let path = store.path_for("de");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = store.load("de").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CatalogParseError);
        assert_eq!(err.locale(), "de");
        assert!(!err.is_write());
    }

    #[test]
    fn test_memory_store_counts_and_rejects() {
        let store = MemoryStore::new();
        let catalog = catalog_from_pairs([("k", "v")]);

        store.save("fr", &catalog).unwrap();
        assert_eq!(store.writes("fr"), 1);

        store.reject_writes("fr");
        let err = store.save("fr", &catalog).unwrap_err();
        assert!(err.is_write());
        assert_eq!(store.writes("fr"), 1);
    }

    #[test]
    fn test_message_map_strings() {
        let mut forms = IndexMap::new();
        forms.insert("one".to_string(), "a".to_string());
        let msg = Message::Plural(forms).map_strings(|s| s.to_uppercase());
        match msg {
            Message::Plural(forms) => assert_eq!(forms["one"], "A"),
            Message::Text(_) => panic!("expected plural"),
        }
    }

    proptest! {
        #[test]
        fn prop_file_store_keeps_order_and_text(
            entries in proptest::collection::vec(("[a-z][a-z0-9-]{0,12}", "\\PC{0,24}"), 0..16),
        ) {
            let dir = TempDir::new().unwrap();
            let store = JsonFileStore::new(dir.path(), "translation.json");
            let catalog: Catalog = entries.into_iter().map(|(k, v)| (k, Message::Text(v))).collect();

            store.save("xx", &catalog).unwrap();
            let raw = fs::read_to_string(store.path_for("xx")).unwrap();
            prop_assert!(raw.ends_with('\n'));

            let loaded = store.load("xx").unwrap().unwrap();
            prop_assert_eq!(
                loaded.keys().collect::<Vec<_>>(),
                catalog.keys().collect::<Vec<_>>()
            );
            prop_assert_eq!(loaded, catalog);
        }
    }
}
