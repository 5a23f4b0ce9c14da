//! Localized territory names injected as `territory-<region>` keys

use crate::error::{SyncError, SyncResult};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Key prefix of synthesized territory entries
pub const TERRITORY_KEY_PREFIX: &str = "territory-";

/// Regions whose `-alt-short` name is preferred when available
const SHORT_NAME_REGIONS: [&str; 2] = ["HK", "MO"];

/// Source of localized territory names, keyed by region code
pub trait TerritorySource: Send + Sync {
    /// Names for every region known under `taxonomy`
    fn lookup(&self, taxonomy: &str) -> SyncResult<IndexMap<String, String>>;
}

/// CLDR JSON files laid out as `<root>/<taxonomy>/territories.json`
#[derive(Debug, Clone)]
pub struct CldrTerritoryFile {
    root: PathBuf,
}

impl CldrTerritoryFile {
    /// Create a source rooted at the CLDR `main` directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TerritorySource for CldrTerritoryFile {
    fn lookup(&self, taxonomy: &str) -> SyncResult<IndexMap<String, String>> {
        let fail = |message: String| SyncError::Territory {
            taxonomy: taxonomy.to_string(),
            message,
        };

        let path = self.root.join(taxonomy).join("territories.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| fail(format!("{}: {e}", path.display())))?;
        let document: Value =
            serde_json::from_str(&content).map_err(|e| fail(format!("{}: {e}", path.display())))?;

        let territories = document
            .get("main")
            .and_then(|m| m.get(taxonomy))
            .and_then(|l| l.get("localeDisplayNames"))
            .and_then(|d| d.get("territories"))
            .and_then(Value::as_object)
            .ok_or_else(|| fail(format!("{} has no territory table", path.display())))?;

        let names: IndexMap<String, String> = territories
            .iter()
            .filter_map(|(code, name)| name.as_str().map(|n| (code.clone(), n.to_string())))
            .collect();

        debug!(taxonomy, regions = names.len(), "Territory names loaded");
        Ok(names)
    }
}

/// Whether `code` is a two-letter uppercase region code
#[must_use]
pub fn is_region_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Map raw region names to catalog entries
///
/// Codes that are not two-letter regions (numeric areas, `-alt-` variants)
/// are skipped.
#[must_use]
pub fn territory_entries(names: &IndexMap<String, String>) -> IndexMap<String, String> {
    names
        .iter()
        .filter(|(code, _)| is_region_code(code))
        .map(|(code, name)| {
            let name = if SHORT_NAME_REGIONS.contains(&code.as_str()) {
                names.get(&format!("{code}-alt-short")).unwrap_or(name)
            } else {
                name
            };
            (format!("{TERRITORY_KEY_PREFIX}{code}"), name.clone())
        })
        .collect()
}
