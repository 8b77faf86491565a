//! Best-effort mapping of decoded model output onto review records
//!
//! Validation is total: every expected field is looked up by name and replaced
//! with a default when missing or of an unusable type. The two pipelines name
//! their keys differently (`publication_year` vs `publicationYear`); a
//! [`FieldNaming`] picks which spelling is tried first and the other spelling
//! is used as a fallback, so both feed the same [`Article`] shape.

use crate::review::record::{Article, Confidence, Synthesis};
use log::{debug, warn};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "Unknown";
pub const DEFAULT_VENUE: &str = "Unknown";
pub const DEFAULT_SOURCE: &str = "Unknown";
pub const DEFAULT_PUBLICATION_YEAR: i32 = 2024;

/// Key spelling used by a given prompt layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNaming {
    SnakeCase,
    CamelCase,
}

/// One logical field with both wire spellings
#[derive(Debug, Clone, Copy)]
struct FieldKey {
    snake: &'static str,
    camel: &'static str,
}

const fn key(snake: &'static str, camel: &'static str) -> FieldKey {
    FieldKey { snake, camel }
}

const TITLE: FieldKey = key("title", "title");
const AUTHORS: FieldKey = key("authors", "authors");
const PUBLICATION_YEAR: FieldKey = key("publication_year", "publicationYear");
const VENUE: FieldKey = key("venue", "venue");
const DOI: FieldKey = key("doi", "doi");
const ABSTRACT: FieldKey = key("abstract", "abstract");
const KEYWORDS: FieldKey = key("keywords", "keywords");
const RESEARCH_GOAL: FieldKey = key("research_goal", "researchGoal");
const METHODOLOGY: FieldKey = key("methodology", "methodology");
const MAIN_RESULTS: FieldKey = key("main_results", "mainResults");
const KEY_CONTRIBUTIONS: FieldKey = key("key_contributions", "keyContributions");
const LIMITATIONS: FieldKey = key("limitations", "limitations");
const CONFIDENCE: FieldKey = key("confidence", "confidence");
const SOURCE: FieldKey = key("source", "source");

const FIELD_OVERVIEW: FieldKey = key("field_overview", "fieldOverview");
const GAPS_AND_CHALLENGES: FieldKey = key("gaps_and_challenges", "gapsAndChallenges");
const FUTURE_DIRECTIONS: FieldKey = key("future_directions", "futureDirections");
const PRACTICAL_IMPLICATIONS: FieldKey = key("practical_implications", "practicalImplications");

impl FieldNaming {
    fn spellings(self, field: FieldKey) -> [&'static str; 2] {
        match self {
            FieldNaming::SnakeCase => [field.snake, field.camel],
            FieldNaming::CamelCase => [field.camel, field.snake],
        }
    }

    /// First non-null value under either spelling, preferred spelling first
    fn lookup<'a>(self, map: &'a Map<String, Value>, field: FieldKey) -> Option<&'a Value> {
        self.spellings(field)
            .into_iter()
            .filter_map(|name| map.get(name))
            .find(|value| !value.is_null())
    }
}

/// Maps raw JSON mappings onto [`Article`] and [`Synthesis`]
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator {
    naming: FieldNaming,
}

impl RecordValidator {
    pub fn new(naming: FieldNaming) -> Self {
        Self { naming }
    }

    pub fn to_article(&self, map: &Map<String, Value>) -> Article {
        let text = |field: FieldKey, default: &str| self.text(map, field, default);
        let list = |field: FieldKey| self.lookup(map, field).map(string_list).unwrap_or_default();

        Article {
            title: text(TITLE, DEFAULT_TITLE),
            authors: list(AUTHORS),
            publication_year: self
                .lookup(map, PUBLICATION_YEAR)
                .and_then(year)
                .unwrap_or(DEFAULT_PUBLICATION_YEAR),
            venue: text(VENUE, DEFAULT_VENUE),
            doi: self
                .lookup(map, DOI)
                .and_then(scalar_text)
                .filter(|doi| !doi.is_empty()),
            abstract_text: text(ABSTRACT, ""),
            keywords: list(KEYWORDS),
            research_goal: text(RESEARCH_GOAL, ""),
            methodology: text(METHODOLOGY, ""),
            main_results: text(MAIN_RESULTS, ""),
            key_contributions: text(KEY_CONTRIBUTIONS, ""),
            limitations: text(LIMITATIONS, ""),
            confidence: self
                .lookup(map, CONFIDENCE)
                .and_then(scalar_text)
                .filter(|label| !label.is_empty())
                .map(Confidence::from)
                .unwrap_or_default(),
            source: text(SOURCE, DEFAULT_SOURCE),
        }
    }

    pub fn to_synthesis(&self, map: &Map<String, Value>) -> Synthesis {
        Synthesis {
            field_overview: self.text(map, FIELD_OVERVIEW, ""),
            gaps_and_challenges: self.text(map, GAPS_AND_CHALLENGES, ""),
            future_directions: self.text(map, FUTURE_DIRECTIONS, ""),
            practical_implications: self.text(map, PRACTICAL_IMPLICATIONS, ""),
        }
    }

    /// Validate every object element of a decoded article list.
    ///
    /// Anything other than an array yields no articles.
    pub fn to_articles(&self, value: &Value) -> Vec<Article> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item.as_object() {
                    Some(map) => Some(self.to_article(map)),
                    None => {
                        warn!("Skipping article #{}: expected an object, got {}", index + 1, type_name(item));
                        None
                    }
                })
                .collect(),
            other => {
                warn!("Expected a list of articles, got {}", type_name(other));
                Vec::new()
            }
        }
    }

    fn lookup<'a>(&self, map: &'a Map<String, Value>, field: FieldKey) -> Option<&'a Value> {
        self.naming.lookup(map, field)
    }

    fn text(&self, map: &Map<String, Value>, field: FieldKey, default: &str) -> String {
        match self.lookup(map, field).and_then(scalar_text) {
            Some(value) => value,
            None => {
                debug!("Field '{}' missing, using default", self.naming.spellings(field)[0]);
                default.to_string()
            }
        }
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(FieldNaming::CamelCase)
    }
}

/// Strings are trimmed, numbers and bools are stringified, everything else is rejected
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Sequence fields. A lone string is coerced to a one-element list; inside
/// arrays, nulls and nested containers are dropped.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            scalar_text(value).filter(|item| !item.is_empty()).into_iter().collect()
        }
        _ => Vec::new(),
    }
}

fn year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
