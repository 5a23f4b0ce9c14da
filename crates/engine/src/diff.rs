//! Key differencing between a source catalog and a target catalog

use catsync_core::catalog::Catalog;
use serde::Serialize;
use std::collections::HashSet;

/// Keys that are never sent to the provider
///
/// A key is reserved when it starts with one of the configured prefixes or is
/// listed explicitly (e.g. keys supplied by territory data).
#[derive(Debug, Clone, Default)]
pub struct ReservedKeys {
    prefixes: Vec<String>,
    exact: HashSet<String>,
}

impl ReservedKeys {
    /// Reserve every key starting with one of `prefixes`
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            exact: HashSet::new(),
        }
    }

    /// Builder-style method to reserve additional exact keys
    #[must_use]
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exact.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Whether `key` is reserved
    #[must_use]
    pub fn is_reserved(&self, key: &str) -> bool {
        self.exact.contains(key) || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// Entries of `source` absent from `target`, minus reserved keys, in
/// `source` order
#[must_use]
pub fn missing_keys(source: &Catalog, target: &Catalog, reserved: &ReservedKeys) -> Catalog {
    source
        .iter()
        .filter(|(key, _)| !target.contains_key(*key) && !reserved.is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Translation coverage of one target catalog
#[derive(Debug, Clone, Serialize)]
pub struct CoverageAudit {
    /// Translatable keys in the source catalog
    pub total: usize,
    /// Translatable keys present in the target
    pub translated: usize,
    /// Translatable keys absent from the target, in source order
    pub missing: Vec<String>,
    /// Target keys the source no longer has
    pub stale: Vec<String>,
}

impl CoverageAudit {
    /// Percentage of translatable keys present
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.translated as f64 / self.total as f64 * 100.0
        }
    }

    /// Whether nothing is left to translate
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compute coverage without touching the provider
#[must_use]
pub fn audit(source: &Catalog, target: &Catalog, reserved: &ReservedKeys) -> CoverageAudit {
    let missing: Vec<String> = missing_keys(source, target, reserved).into_keys().collect();
    let total = source.keys().filter(|k| !reserved.is_reserved(k)).count();
    let stale = target
        .keys()
        .filter(|k| !source.contains_key(*k))
        .cloned()
        .collect();

    CoverageAudit {
        total,
        translated: total - missing.len(),
        missing,
        stale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_core::catalog::catalog_from_pairs;
    use proptest::prelude::*;

    fn reserved() -> ReservedKeys {
        ReservedKeys::new(["language-"])
    }

    #[test]
    fn test_missing_keys_excludes_reserved_and_present() {
        let source = catalog_from_pairs([
            ("greeting", "Hello"),
            ("language-code", "en"),
            ("farewell", "Bye"),
            ("title", "Title"),
        ]);
        let target = catalog_from_pairs([("farewell", "Au revoir")]);

        let missing = missing_keys(&source, &target, &reserved());
        let keys: Vec<_> = missing.keys().map(String::as_str).collect();
        assert_eq!(keys, ["greeting", "title"]);
        assert_eq!(missing["greeting"].as_text(), Some("Hello"));
    }

    #[test]
    fn test_missing_keys_empty_target() {
        let source = catalog_from_pairs([("greeting", "Hello"), ("language-code", "en")]);
        let missing = missing_keys(&source, &Catalog::new(), &reserved());
        assert_eq!(missing, catalog_from_pairs([("greeting", "Hello")]));
    }

    #[test]
    fn test_exact_reserved_keys() {
        let keys = reserved().with_keys(["territory-HK"]);
        assert!(keys.is_reserved("territory-HK"));
        assert!(keys.is_reserved("language-name"));
        assert!(!keys.is_reserved("territory-MO"));
    }

    #[test]
    fn test_audit_reports_coverage_and_stale() {
        let source = catalog_from_pairs([("a", "A"), ("b", "B"), ("language-x", "x"), ("c", "C")]);
        let target = catalog_from_pairs([("a", "A'"), ("old", "gone")]);

        let report = audit(&source, &target, &reserved());
        assert_eq!(report.total, 3);
        assert_eq!(report.translated, 1);
        assert_eq!(report.missing, ["b", "c"]);
        assert_eq!(report.stale, ["old"]);
        assert!(!report.is_complete());
        assert!((report.coverage() - 100.0 / 3.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_missing_keys_is_ordered_subsequence(
            keys in proptest::collection::vec("[a-z-]{1,8}", 0..40),
            present in proptest::collection::vec(any::<bool>(), 40),
        ) {
            let source: Catalog = keys.iter().map(|k| (k.clone(), k.as_str().into())).collect();
            let target: Catalog = source
                .iter()
                .zip(present.iter())
                .filter(|(_, p)| **p)
                .map(|((k, v), _)| (k.clone(), v.clone()))
                .collect();

            let missing = missing_keys(&source, &target, &reserved());

            let mut positions = missing.keys().map(|k| source.get_index_of(k).unwrap());
            let mut last = None;
            for pos in positions.by_ref() {
                prop_assert!(last.map_or(true, |l| l < pos));
                last = Some(pos);
            }
            for key in missing.keys() {
                prop_assert!(!target.contains_key(key));
                prop_assert!(!key.starts_with("language-"));
            }
        }
    }
}
