//! Canonical review records shared by both generation pipelines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One generated article summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    /// Citation order
    pub authors: Vec<String>,
    pub publication_year: i32,
    pub venue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub research_goal: String,
    pub methodology: String,
    pub main_results: String,
    pub key_contributions: String,
    pub limitations: String,
    pub confidence: Confidence,
    /// Nominal provenance, e.g. "arXiv"
    pub source: String,
}

/// Field-level synthesis across all articles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesis {
    pub field_overview: String,
    pub gaps_and_challenges: String,
    pub future_directions: String,
    #[serde(default)]
    pub practical_implications: String,
}

/// Result of one `generate_review` call
#[derive(Debug, Clone, PartialEq)]
pub struct LiteratureReview {
    pub query: String,
    pub articles: Vec<Article>,
    pub synthesis: Synthesis,
    pub generated_at: DateTime<Utc>,
}

/// Model-reported confidence. Advisory only, so unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Other(String),
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Medium
    }
}

impl From<String> for Confidence {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Other(value),
        }
    }
}

impl From<Confidence> for String {
    fn from(value: Confidence) -> Self {
        value.as_str().to_string()
    }
}

impl Confidence {
    pub fn as_str(&self) -> &str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::Other(label) => label,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Synthesis {
    /// Synthesis fields paired with their display headings, in report order
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("Field Overview", &self.field_overview),
            ("Gaps & Challenges", &self.gaps_and_challenges),
            ("Future Directions", &self.future_directions),
            ("Practical Implications", &self.practical_implications),
        ]
    }
}

impl LiteratureReview {
    pub fn new(query: impl Into<String>, articles: Vec<Article>, synthesis: Synthesis) -> Self {
        Self {
            query: query.into(),
            articles,
            synthesis,
            generated_at: Utc::now(),
        }
    }
}
