//! Locating the JSON object inside free-form provider text
//!
//! Providers wrap their answer in prose or code fences. The scan below tries
//! each `{` that opens an object (the next significant character is a quote
//! or a closing brace) and follows it with an explicit stack until the
//! matching `}`. Braces inside string literals are ignored. A candidate that
//! never closes is skipped in favour of the next one.

use crate::error::ExtractionError;

/// Return the first balanced top-level JSON object span in `raw`
pub fn extract_object(raw: &str) -> Result<&str, ExtractionError> {
    let mut unbalanced = None;

    for start in raw
        .char_indices()
        .filter(|&(_, c)| c == '{')
        .map(|(i, _)| i)
        .filter(|&i| opens_object(&raw[i + 1..]))
    {
        match matching_close(&raw[start..]) {
            Some(end) => return Ok(&raw[start..start + end]),
            None => {
                unbalanced.get_or_insert(start);
            }
        }
    }

    Err(unbalanced.map_or(ExtractionError::NoObject, |start| ExtractionError::Unbalanced { start }))
}

/// Whether the text right after a `{` looks like the body of an object
fn opens_object(rest: &str) -> bool {
    matches!(rest.trim_start().chars().next(), Some('"' | '}'))
}

/// Byte length of the balanced span starting at `text[0] == '{'`
fn matching_close(text: &str) -> Option<usize> {
    let mut stack: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => stack.push(i),
            '}' => {
                stack.pop()?;
                if stack.is_empty() {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_between_prose() {
        let raw = "Here is the result:\n{\"a\": \"b\"}\nThanks!";
        assert_eq!(extract_object(raw).unwrap(), "{\"a\": \"b\"}");
    }

    #[test]
    fn test_extracts_from_code_fence() {
        let raw = "```json\n{\n  \"greeting\": \"Bonjour\"\n}\n```";
        assert_eq!(extract_object(raw).unwrap(), "{\n  \"greeting\": \"Bonjour\"\n}");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"{"a": "Hello {name}}", "b": "}{"} trailing }"#;
        assert_eq!(extract_object(raw).unwrap(), r#"{"a": "Hello {name}}", "b": "}{"}"#);
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let raw = r#"{"a": "say \"}\" now"} after"#;
        assert_eq!(extract_object(raw).unwrap(), r#"{"a": "say \"}\" now"}"#);
    }

    #[test]
    fn test_nested_objects() {
        let raw = r#"ok {"p": {"one": "1", "other": "{count}"}} done"#;
        assert_eq!(
            extract_object(raw).unwrap(),
            r#"{"p": {"one": "1", "other": "{count}"}}"#
        );
    }

    #[test]
    fn test_skips_placeholder_braces_in_prose() {
        let raw = "Kept {name} untouched: {\"a\": \"{name} ok\"}";
        assert_eq!(extract_object(raw).unwrap(), "{\"a\": \"{name} ok\"}");
    }

    #[test]
    fn test_truncated_object_fails() {
        let raw = "{\"a\": \"b\", \"c\": \"d";
        assert_eq!(
            extract_object(raw).unwrap_err(),
            ExtractionError::Unbalanced { start: 0 }
        );
    }

    #[test]
    fn test_unclosed_outer_falls_back_to_inner_object() {
        let raw = "prefix {\"a\": {\"b\": \"c\"}";
        assert_eq!(extract_object(raw).unwrap(), "{\"b\": \"c\"}");
    }

    #[test]
    fn test_skips_unclosed_brace_in_prose() {
        let raw = r#"Note: the token "{" is kept. Result: {"a": "b"}"#;
        assert_eq!(extract_object(raw).unwrap(), r#"{"a": "b"}"#);
    }

    #[test]
    fn test_reports_first_unclosed_candidate() {
        let raw = r#"{"a": "x", then {"b": "y""#;
        assert_eq!(
            extract_object(raw).unwrap_err(),
            ExtractionError::Unbalanced { start: 0 }
        );
    }

    #[test]
    fn test_no_object() {
        assert_eq!(
            extract_object("Sorry, I cannot help with that.").unwrap_err(),
            ExtractionError::NoObject
        );
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(extract_object("{ }").unwrap(), "{ }");
    }

    #[test]
    fn test_multibyte_text() {
        let raw = "結果：{\"a\": \"こんにちは\"}。";
        assert_eq!(extract_object(raw).unwrap(), "{\"a\": \"こんにちは\"}");
    }
}
