//! Recovery of JSON payloads from free-form model replies
//!
//! Models are asked for bare JSON but regularly wrap it in markdown fences or
//! surround it with prose. Extraction runs an ordered list of strategies over
//! the raw text; each one is a pure function that either yields a complete
//! JSON container or nothing, and the first success wins.

use crate::error::{LitReviewError, Result};
use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Container the caller expects at the top level of the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Array => ('[', ']'),
            JsonShape::Object => ('{', '}'),
        }
    }

    /// Whether `value` is this container type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            JsonShape::Array => value.is_array(),
            JsonShape::Object => value.is_object(),
        }
    }
}

type Strategy = fn(&str, JsonShape) -> Option<Value>;

/// Strategies in the order they are attempted
const STRATEGIES: [(&str, Strategy); 4] = [
    ("direct", parse_direct),
    ("json fence", parse_json_fence),
    ("any fence", parse_any_fence),
    ("bracket span", parse_bracket_span),
];

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json[ \t]*\r?\n?(.*?)```").expect("valid json fence regex"));

static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n`]*\r?\n?(.*?)```").expect("valid fence regex"));

/// Recover a JSON array or object from `raw`.
///
/// Fails with [`LitReviewError::MalformedResponse`] carrying the original
/// text when no strategy produces a container value.
pub fn extract(raw: &str, shape: JsonShape) -> Result<Value> {
    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(raw, shape) {
            debug!("Recovered JSON from model reply via {} strategy", name);
            return Ok(value);
        }
    }

    Err(LitReviewError::MalformedResponse { raw: raw.to_string() })
}

/// Only arrays and objects count as a recovered payload
fn parse_container(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => Some(value),
        _ => None,
    }
}

pub fn parse_direct(raw: &str, _shape: JsonShape) -> Option<Value> {
    parse_container(raw)
}

pub fn parse_json_fence(raw: &str, _shape: JsonShape) -> Option<Value> {
    JSON_FENCE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| parse_container(body.as_str()))
}

pub fn parse_any_fence(raw: &str, _shape: JsonShape) -> Option<Value> {
    ANY_FENCE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| parse_container(body.as_str()))
}

/// First opening to last closing delimiter of the expected shape, inclusive
pub fn parse_bracket_span(raw: &str, shape: JsonShape) -> Option<Value> {
    let (open, close) = shape.delimiters();
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end <= start {
        return None;
    }
    parse_container(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn articles() -> Value {
        json!([
            {"title": "Federated Averaging Revisited", "publicationYear": 2021},
            {"title": "Edge-Aware Client Selection", "publicationYear": 2023, "authors": ["R. Patel"]}
        ])
    }

    #[test]
    fn test_all_wrappings_yield_the_same_value() {
        let body = serde_json::to_string_pretty(&articles()).unwrap();
        let wrappings = [
            body.clone(),
            format!("```json\n{}\n```", body),
            format!("```\n{}\n```", body),
            format!("Here are the articles you asked for:\n{}\nLet me know if you need more.", body),
        ];

        for wrapped in &wrappings {
            let value = extract(wrapped, JsonShape::Array).unwrap();
            assert_eq!(value, articles(), "failed for: {}", wrapped);
        }
    }

    #[test]
    fn test_no_json_is_malformed_with_raw_text() {
        let err = extract("I cannot comply.", JsonShape::Array).unwrap_err();
        match err {
            LitReviewError::MalformedResponse { raw } => assert_eq!(raw, "I cannot comply."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_scalar_json_is_not_a_payload() {
        assert!(extract("42", JsonShape::Object).is_err());
        assert!(extract("\"just a string\"", JsonShape::Array).is_err());
    }

    #[test]
    fn test_direct_parse_tolerates_surrounding_whitespace() {
        assert_eq!(parse_direct("  \n{\"a\": 1}\n ", JsonShape::Object), Some(json!({"a": 1})));
    }

    #[test]
    fn test_json_fence_skips_broken_block() {
        let raw = "```json\n{not json}\n```\ntext\n```json\n{\"fieldOverview\": \"ok\"}\n```";
        assert_eq!(parse_json_fence(raw, JsonShape::Object), Some(json!({"fieldOverview": "ok"})));
    }

    #[test]
    fn test_json_fence_tag_is_case_insensitive() {
        let raw = "```JSON\n[1, 2]\n```";
        assert_eq!(parse_json_fence(raw, JsonShape::Array), Some(json!([1, 2])));
    }

    #[test]
    fn test_any_fence_accepts_other_language_tags() {
        let raw = "Result:\n```javascript\n{\"a\": true}\n```";
        assert_eq!(parse_json_fence(raw, JsonShape::Object), None);
        assert_eq!(parse_any_fence(raw, JsonShape::Object), Some(json!({"a": true})));
    }

    #[test]
    fn test_bracket_span_follows_expected_shape() {
        let raw = "Sure! [{\"title\": \"A\"}] hope that helps {smile}";
        assert_eq!(
            parse_bracket_span(raw, JsonShape::Array),
            Some(json!([{"title": "A"}]))
        );
        // `{` .. `}` spans from the first object to "{smile}", which is not JSON
        assert_eq!(parse_bracket_span(raw, JsonShape::Object), None);
    }

    #[test]
    fn test_bracket_span_rejects_reversed_delimiters() {
        assert_eq!(parse_bracket_span("} nothing {", JsonShape::Object), None);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let raw = "prefix ```json\n{\"x\": [1, 2, 3]}\n``` suffix";
        let first = extract(raw, JsonShape::Object).unwrap();
        let second = extract(raw, JsonShape::Object).unwrap();
        assert_eq!(first, second);

        let reparsed = extract(&first.to_string(), JsonShape::Object).unwrap();
        assert_eq!(reparsed, first);
    }

    #[test]
    fn test_shape_matches_only_its_container() {
        assert!(JsonShape::Array.matches(&json!([])));
        assert!(!JsonShape::Array.matches(&json!({"a": 1})));
        assert!(JsonShape::Object.matches(&json!({})));
        assert!(!JsonShape::Object.matches(&json!([{"a": 1}])));
    }

    #[test]
    fn test_truncated_reply_is_not_partially_parsed() {
        let raw = "```json\n[{\"title\": \"A\"}, {\"title\": \"B\"\n```";
        assert!(extract(raw, JsonShape::Array).is_err());
    }
}
