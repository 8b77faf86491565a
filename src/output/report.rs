//! Exported review document

use crate::error::Result;
use crate::review::{Article, LiteratureReview, Synthesis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk / stdout JSON shape of a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDocument {
    pub query: String,
    pub articles: Vec<Article>,
    pub synthesis: Synthesis,
    /// ISO-8601 generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl From<&LiteratureReview> for ReviewDocument {
    fn from(review: &LiteratureReview) -> Self {
        Self {
            query: review.query.clone(),
            articles: review.articles.clone(),
            synthesis: review.synthesis.clone(),
            generated_at: review.generated_at,
        }
    }
}

impl From<ReviewDocument> for LiteratureReview {
    fn from(document: ReviewDocument) -> Self {
        Self {
            query: document.query,
            articles: document.articles,
            synthesis: document.synthesis,
            generated_at: document.generated_at,
        }
    }
}

/// Write `review` as a pretty-printed JSON document, creating parent directories
pub fn export_review(review: &LiteratureReview, file_path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&ReviewDocument::from(review))?;
    save_report_to_file(&content, file_path)?;
    log::info!("Review exported to {}", file_path.display());
    Ok(())
}

/// Read back a document written by [`export_review`]
pub fn load_review(file_path: &Path) -> Result<LiteratureReview> {
    let content = std::fs::read_to_string(file_path)?;
    let document: ReviewDocument = serde_json::from_str(&content)?;
    Ok(document.into())
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// `<query-slug>_review[_YYYYmmdd_HHMMSS].json`
pub fn suggest_filename(query: &str, timestamp: bool) -> String {
    let slug = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .take(8)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    let slug = if slug.is_empty() { "literature".to_string() } else { slug };

    let timestamp_suffix = if timestamp {
        format!("_{}", Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!("{}_review{}.json", slug, timestamp_suffix)
}
