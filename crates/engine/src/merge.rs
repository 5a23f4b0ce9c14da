//! Merging translations and normalizing the persisted catalog

use crate::diff::ReservedKeys;
use catsync_core::catalog::{Catalog, Message};
use indexmap::IndexMap;

/// A catalog ready to persist, plus the keys it still lacks
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Output catalog in base order
    pub catalog: Catalog,
    /// Translatable keys with no translation yet, in base order
    pub unresolved: Vec<String>,
}

/// Fold one chunk's translations into the working catalog
///
/// Existing keys keep their position; new keys are appended. Ordering is
/// restored by [`normalize`].
pub fn merge_chunk(working: &mut Catalog, translated: Catalog) {
    working.extend(translated);
}

/// Build the catalog to persist
///
/// For each key of `base`, in base order:
/// - territory names win when one is provided for the key
/// - otherwise the working value is used
/// - otherwise reserved keys fall back to the base value
/// - otherwise the key is left out and reported as unresolved
///
/// Working keys the base no longer has are dropped.
#[must_use]
pub fn normalize(
    base: &Catalog,
    working: &Catalog,
    reserved: &ReservedKeys,
    territories: &IndexMap<String, String>,
) -> Normalized {
    let mut catalog = Catalog::with_capacity(base.len());
    let mut unresolved = Vec::new();

    for (key, base_value) in base {
        if let Some(name) = territories.get(key) {
            catalog.insert(key.clone(), Message::Text(name.clone()));
        } else if let Some(value) = working.get(key) {
            catalog.insert(key.clone(), value.clone());
        } else if reserved.is_reserved(key) {
            catalog.insert(key.clone(), base_value.clone());
        } else {
            unresolved.push(key.clone());
        }
    }

    Normalized {
        catalog,
        unresolved,
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
    fn test_scenario_output_order() {
        let base = catalog_from_pairs([("greeting", "Hello"), ("language-code", "en")]);
        let mut working = Catalog::new();
        merge_chunk(&mut working, catalog_from_pairs([("greeting", "Bonjour")]));

        let out = normalize(&base, &working, &reserved(), &IndexMap::new());
        assert_eq!(
            out.catalog,
            catalog_from_pairs([("greeting", "Bonjour"), ("language-code", "en")])
        );
        let keys: Vec<_> = out.catalog.keys().map(String::as_str).collect();
        assert_eq!(keys, ["greeting", "language-code"]);
        assert!(out.unresolved.is_empty());
    }

    #[test]
    fn test_reserved_key_keeps_existing_value() {
        let base = catalog_from_pairs([("language-code", "en")]);
        let working = catalog_from_pairs([("language-code", "fr")]);
        let out = normalize(&base, &working, &reserved(), &IndexMap::new());
        assert_eq!(out.catalog["language-code"].as_text(), Some("fr"));
    }

    #[test]
    fn test_unresolved_and_stale_keys() {
        let base = catalog_from_pairs([("a", "A"), ("b", "B"), ("c", "C")]);
        let working = catalog_from_pairs([("c", "C'"), ("removed", "x"), ("a", "A'")]);

        let out = normalize(&base, &working, &reserved(), &IndexMap::new());
        let keys: Vec<_> = out.catalog.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(out.unresolved, ["b"]);
    }

    #[test]
    fn test_territory_names_override() {
        let base = catalog_from_pairs([("territory-HK", "Hong Kong"), ("title", "Title")]);
        let working = catalog_from_pairs([("territory-HK", "stale"), ("title", "Titre")]);
        let mut territories = IndexMap::new();
        territories.insert("territory-HK".to_string(), "香港".to_string());
        territories.insert("territory-ZZ".to_string(), "unknown".to_string());

        let out = normalize(&base, &working, &reserved(), &territories);
        assert_eq!(out.catalog["territory-HK"].as_text(), Some("香港"));
        assert!(!out.catalog.contains_key("territory-ZZ"));
    }

    #[test]
    fn test_merge_overwrites_in_place() {
        let mut working = catalog_from_pairs([("a", "1"), ("b", "2")]);
        merge_chunk(&mut working, catalog_from_pairs([("a", "one"), ("c", "3")]));
        let keys: Vec<_> = working.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(working["a"].as_text(), Some("one"));
    }

    proptest! {
        #[test]
        fn prop_output_order_follows_base(
            keys in proptest::collection::vec("[a-z]{1,6}", 0..40),
            picks in proptest::collection::vec(any::<bool>(), 40),
        ) {
            let base: Catalog = keys.iter().map(|k| (k.clone(), k.as_str().into())).collect();
            // Working catalog in reverse order to make ordering non-trivial.
            let working: Catalog = base
                .iter()
                .zip(picks.iter())
                .filter(|(_, p)| **p)
                .map(|((k, v), _)| (k.clone(), v.clone()))
                .rev()
                .collect();

            let out = normalize(&base, &working, &reserved(), &IndexMap::new());
            let expected: Vec<&String> = base.keys().filter(|k| out.catalog.contains_key(*k)).collect();
            prop_assert_eq!(out.catalog.keys().collect::<Vec<_>>(), expected);
            prop_assert_eq!(out.catalog.len() + out.unresolved.len(), base.len());
        }
    }
}
