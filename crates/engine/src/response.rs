//! Turning raw provider output into a translation result

use crate::error::{RepairError, SyncResult};
use crate::extract::extract_object;
use crate::repair::repair_json;
use catsync_core::catalog::{Catalog, Message};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse provider output for `chunk`
///
/// Only keys present in `chunk` are kept, in chunk order, and only when the
/// returned value has the same shape as the source (plain text for text,
/// an object of strings for plural forms). Keys the provider skipped are
/// simply absent.
pub fn parse_translation(raw: &str, chunk: &Catalog) -> SyncResult<Catalog> {
    let span = extract_object(raw)?;

    let object: Map<String, Value> = match serde_json::from_str(span) {
        Ok(object) => object,
        Err(strict) => {
            debug!(error = %strict, "Strict parse failed, repairing provider output");
            serde_json::from_str(&repair_json(span)).map_err(RepairError::new)?
        }
    };

    let mut result = Catalog::with_capacity(chunk.len());
    for (key, source) in chunk {
        let Some(value) = object.get(key) else {
            continue;
        };
        match to_message(value, source) {
            Some(message) => {
                result.insert(key.clone(), message.map_strings(collapse_backslashes));
            }
            None => debug!(key = %key, "Dropping translation with unexpected shape"),
        }
    }

    let extra = object.keys().filter(|k| !chunk.contains_key(*k)).count();
    if extra > 0 {
        debug!(extra, "Discarded keys not present in the request");
    }

    Ok(result)
}

fn to_message(value: &Value, source: &Message) -> Option<Message> {
    match (value, source) {
        (Value::String(text), Message::Text(_)) => Some(Message::Text(text.clone())),
        (Value::Object(forms), Message::Plural(_)) => forms
            .iter()
            .map(|(form, v)| v.as_str().map(|s| (form.clone(), s.to_string())))
            .collect::<Option<_>>()
            .map(Message::Plural),
        _ => None,
    }
}

/// Undo providers doubling backslashes when emitting JSON inside JSON
#[must_use]
pub fn collapse_backslashes(text: String) -> String {
    if text.contains("\\\\") {
        text.replace("\\\\", "\\")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, SyncError};
    use catsync_core::catalog::catalog_from_pairs;
    use indexmap::IndexMap;

    #[test]
    fn test_prose_wrapped_result() {
        let chunk = catalog_from_pairs([("a", "x")]);
        let parsed = parse_translation("Here is the result:\n{\"a\": \"b\"}\nThanks!", &chunk).unwrap();
        assert_eq!(parsed, catalog_from_pairs([("a", "b")]));
    }

    #[test]
    fn test_restricts_to_chunk_keys_in_chunk_order() {
        let chunk = catalog_from_pairs([("first", "1"), ("second", "2"), ("third", "3")]);
        let raw = r#"{"third": "drei", "bogus": "x", "first": "eins"}"#;
        let parsed = parse_translation(raw, &chunk).unwrap();
        let keys: Vec<_> = parsed.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "third"]);
    }

    #[test]
    fn test_repairs_trailing_comma() {
        let chunk = catalog_from_pairs([("a", "x"), ("b", "y")]);
        let parsed = parse_translation("{\"a\": \"1\",\n\"b\": \"2\",\n}", &chunk).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_collapses_doubled_backslashes() {
        let chunk = catalog_from_pairs([("a", "x")]);
        // The JSON string decodes to `line\\n`, i.e. two backslashes.
        let parsed = parse_translation(r#"{"a": "line\\\\n"}"#, &chunk).unwrap();
        assert_eq!(parsed["a"].as_text(), Some(r"line\n"));
    }

    #[test]
    fn test_plural_shape_kept() {
        let mut forms = IndexMap::new();
        forms.insert("one".to_string(), "{n} item".to_string());
        forms.insert("other".to_string(), "{n} items".to_string());
        let mut chunk = Catalog::new();
        chunk.insert("items".to_string(), Message::Plural(forms));
        chunk.insert("title".to_string(), "Title".into());

        let raw = r#"{"items": {"one": "{n} élément", "other": "{n} éléments"}, "title": {"x": "y"}}"#;
        let parsed = parse_translation(raw, &chunk).unwrap();
        assert!(matches!(parsed["items"], Message::Plural(ref f) if f["other"] == "{n} éléments"));
        assert!(!parsed.contains_key("title"), "shape mismatch is dropped");
    }

    #[test]
    fn test_quoted_brace_in_prose_before_result() {
        let chunk = catalog_from_pairs([("a", "x")]);
        let raw = r#"Note: the token "{" is kept. Result: {"a": "b"}"#;
        let parsed = parse_translation(raw, &chunk).unwrap();
        assert_eq!(parsed, catalog_from_pairs([("a", "b")]));
    }

    #[test]
    fn test_truncated_is_extraction_error() {
        let chunk = catalog_from_pairs([("a", "x")]);
        let err = parse_translation("{\"a\": \"b", &chunk).unwrap_err();
        assert!(matches!(err, SyncError::Extraction(ExtractionError::Unbalanced { .. })));
    }

    #[test]
    fn test_unrepairable_is_repair_error() {
        let chunk = catalog_from_pairs([("a", "x")]);
        let err = parse_translation("{\"a\" => \"b\"}", &chunk).unwrap_err();
        assert!(matches!(err, SyncError::Repair(_)));
    }
}
