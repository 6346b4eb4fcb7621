//! JSON Extractor: recovers the first JSON object or array from model text.
//!
//! Models wrap JSON in prose ("Sure! Here is...") and in ``` fences even when told
//! not to. Recovery order:
//! 1. strip every code-fence marker (```json / ```)
//! 2. parse the whole cleaned text
//! 3. scan each `{` / `[` in order and stream-parse the first complete value there
//! 4. last resort: the outermost `[...]` span, then the outermost `{...}` span
//!
//! Step 4 is bracket matching without string awareness, so a bracket inside a
//! string literal can end the span early. Step 3 does not have that limitation
//! but is capped at `MAX_SCAN_CANDIDATES` start positions.
//!
//! Never panics; returns `None` when nothing parses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Upper bound on start offsets tried by the streaming scan.
const MAX_SCAN_CANDIDATES: usize = 64;

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(?:json)?\s*").expect("fence pattern is valid"));

/// Removes ```json and ``` markers wherever they appear.
pub fn strip_code_fences(text: &str) -> String {
    FENCE.replace_all(text, "").into_owned()
}

/// Returns the first JSON object or array recoverable from `text`.
pub fn extract_json(text: &str) -> Option<Value> {
    let cleaned = strip_code_fences(text);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        if is_container(&value) {
            return Some(value);
        }
    }

    scan_first_value(cleaned)
        .or_else(|| bracket_span(cleaned, '[', ']'))
        .or_else(|| bracket_span(cleaned, '{', '}'))
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Stream-parses from each opening delimiter; trailing prose after the value is ignored.
fn scan_first_value(text: &str) -> Option<Value> {
    text.char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .take(MAX_SCAN_CANDIDATES)
        .find_map(|(start, _)| {
            let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(value)) if is_container(&value) => Some(value),
                _ => None,
            }
        })
}

/// Parses the span from the first `open` to the last `close`.
fn bracket_span(text: &str, open: char, close: char) -> Option<Value> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(is_container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_plain_object_parses_directly() {
        let value = extract_json(r#"{"skills": ["Rust", "SQL"]}"#).unwrap();
        assert_eq!(value, json!({"skills": ["Rust", "SQL"]}));
    }

    #[test]
    fn test_fenced_array_with_leading_prose() {
        let text = "Sure! ```json\n[{\"course\":\"X\",\"score\":150,\"reason\":\"ok\"}]\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value, json!([{"course": "X", "score": 150, "reason": "ok"}]));
    }

    #[test]
    fn test_uppercase_fence_tag_is_stripped() {
        let value = extract_json("```JSON\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_object_wrapped_in_prose_keeps_nested_array() {
        let text = r#"Here are the skills: {"skills": ["Statistics", "Python"]} Good luck!"#;
        let value = extract_json(text).unwrap();
        assert_eq!(value, json!({"skills": ["Statistics", "Python"]}));
    }

    #[test]
    fn test_prose_only_is_none() {
        assert_eq!(extract_json("I cannot help with that right now."), None);
    }

    #[test]
    fn test_empty_and_fence_only_is_none() {
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("```json\n```"), None);
    }

    #[test]
    fn test_bare_scalar_is_not_a_result() {
        assert_eq!(extract_json("42"), None);
        assert_eq!(extract_json("\"just a string\""), None);
    }

    #[test]
    fn test_skips_bracketed_prose_before_real_value() {
        let text = r#"[Note] the answer follows {"personality": "curious"}"#;
        assert_eq!(extract_json(text).unwrap(), json!({"personality": "curious"}));
    }

    #[test]
    fn test_bracket_inside_string_defeats_span_heuristic_only() {
        let text = r#"Result: {"reason": "pick one }"} and that's it }"#;
        // The span heuristic runs to the last brace and fails to parse.
        assert_eq!(bracket_span(text, '{', '}'), None);
        // The streaming scan stops at the end of the first complete value.
        assert_eq!(extract_json(text).unwrap(), json!({"reason": "pick one }"}));
    }

    #[test]
    fn test_bracket_span_reads_outermost_array() {
        let text = "list: [[1, 2], [3]] done";
        assert_eq!(bracket_span(text, '[', ']').unwrap(), json!([[1, 2], [3]]));
    }

    proptest! {
        #[test]
        fn extractor_never_panics(text in ".*") {
            if let Some(value) = extract_json(&text) {
                prop_assert!(value.is_object() || value.is_array());
            }
        }

        #[test]
        fn extractor_recovers_object_with_adversarial_strings(
            prefix in "[a-zA-Z ,.!?]{0,40}",
            suffix in "[a-zA-Z ,.!?\\]\\}]{0,40}",
            fields in prop::collection::btree_map("[a-z]{1,8}", "[a-z \\[\\]\\{\\}\"]{0,12}", 0..5),
        ) {
            let expected = serde_json::to_value(&fields).unwrap();
            let text = format!("{prefix}{}{suffix}", serde_json::to_string(&fields).unwrap());
            prop_assert_eq!(extract_json(&text), Some(expected));
        }

        #[test]
        fn extractor_recovers_fenced_array(
            items in prop::collection::vec("[a-z\\[\\] ]{0,10}", 0..6),
        ) {
            let body = serde_json::to_string(&items).unwrap();
            let text = format!("Here you go:\n```json\n{body}\n```\nAnything else?");
            prop_assert_eq!(extract_json(&text), Some(serde_json::to_value(&items).unwrap()));
        }
    }
}
