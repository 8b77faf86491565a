//! Literature review generation pipeline

use crate::config::{PipelineVariant, MAX_ARTICLE_COUNT};
use crate::error::{LitReviewError, Result};
use crate::llm::client::{ChatMessage, CompletionClient};
use crate::llm::extract::{extract, JsonShape};
use crate::llm::prompts::PromptTemplates;
use crate::review::{Article, FieldNaming, LiteratureReview, RecordValidator, Synthesis};
use log::{info, warn};
use serde_json::Value;

/// Drives prompt → completion → extraction → validation for one query
pub struct LiteratureReviewGenerator {
    client: CompletionClient,
    prompt_templates: PromptTemplates,
    variant: PipelineVariant,
}

impl LiteratureReviewGenerator {
    pub fn new(client: CompletionClient, variant: PipelineVariant) -> Self {
        Self {
            client,
            prompt_templates: PromptTemplates::default(),
            variant,
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Generate a complete review. Any phase failure aborts the whole call.
    pub async fn generate_review(&self, query: &str, article_count: usize) -> Result<LiteratureReview> {
        let query = validate_request(query, article_count)?;
        info!(
            "Generating literature review for '{}' ({} articles, {:?} pipeline)",
            query, article_count, self.variant
        );

        let (articles, synthesis) = match self.variant {
            PipelineVariant::Console => {
                let articles = self.generate_articles(query, article_count).await?;
                let synthesis = self.generate_synthesis(query, &articles).await?;
                (articles, synthesis)
            }
            PipelineVariant::Service => self.generate_combined(query, article_count).await?,
        };

        if articles.len() != article_count {
            warn!("Requested {} articles, model returned {}", article_count, articles.len());
        }

        Ok(LiteratureReview::new(query, articles, synthesis))
    }

    /// First phase of the two-call pipeline
    pub async fn generate_articles(&self, query: &str, article_count: usize) -> Result<Vec<Article>> {
        info!("Retrieving articles");
        let prompt = self.prompt_templates.render_articles(query, article_count);
        let reply = self.client.complete(&[ChatMessage::user(prompt)]).await?;

        let value = unwrap_articles(extract(&reply, JsonShape::Array)?);
        let value = require_shape(value, JsonShape::Array, &reply)?;
        let articles = RecordValidator::new(FieldNaming::SnakeCase).to_articles(&value);
        info!("Retrieved {} articles", articles.len());
        Ok(articles)
    }

    /// Second phase; the prompt lists the titles and years of `articles`
    pub async fn generate_synthesis(&self, query: &str, articles: &[Article]) -> Result<Synthesis> {
        info!("Analyzing field and generating synthesis");
        let prompt = self.prompt_templates.render_synthesis(query, articles);
        let reply = self.client.complete(&[ChatMessage::user(prompt)]).await?;

        let value = require_shape(extract(&reply, JsonShape::Object)?, JsonShape::Object, &reply)?;
        let synthesis = match value.as_object() {
            Some(map) => RecordValidator::new(FieldNaming::SnakeCase).to_synthesis(map),
            None => return Err(malformed(&reply)),
        };
        info!("Synthesis complete");
        Ok(synthesis)
    }

    /// Single-call layout: one reply carrying both `articles` and `synthesis`
    async fn generate_combined(&self, query: &str, article_count: usize) -> Result<(Vec<Article>, Synthesis)> {
        info!("Requesting articles and synthesis in one call");
        let messages = self.prompt_templates.render_service_messages(query, article_count);
        let reply = self.client.complete(&messages).await?;

        let value = extract(&reply, JsonShape::Object)?;
        let validator = RecordValidator::new(FieldNaming::CamelCase);

        // Both sections must be present with the right container type
        let (Some(articles), Some(synthesis)) = (
            value.get("articles").filter(|v| v.is_array()),
            value.get("synthesis").and_then(Value::as_object),
        ) else {
            warn!("Combined reply lacks an `articles` array or a `synthesis` object");
            return Err(malformed(&reply));
        };

        let articles = validator.to_articles(articles);
        let synthesis = validator.to_synthesis(synthesis);

        info!("Retrieved {} articles with synthesis", articles.len());
        Ok((articles, synthesis))
    }
}

/// Reject blank queries and out-of-range counts before any network call
fn validate_request(query: &str, article_count: usize) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LitReviewError::InvalidInput("Query must not be empty".to_string()));
    }
    if !(1..=MAX_ARTICLE_COUNT).contains(&article_count) {
        return Err(LitReviewError::InvalidInput(format!(
            "Article count must be between 1 and {}, got {}",
            MAX_ARTICLE_COUNT, article_count
        )));
    }
    Ok(query)
}

fn malformed(reply: &str) -> LitReviewError {
    LitReviewError::MalformedResponse { raw: reply.to_string() }
}

/// A reply holding the wrong container type is malformed, not defaulted
fn require_shape(value: Value, shape: JsonShape, reply: &str) -> Result<Value> {
    if shape.matches(&value) {
        Ok(value)
    } else {
        warn!("Expected a JSON {:?} in model reply", shape);
        Err(malformed(reply))
    }
}

/// Models sometimes answer `{"articles": [...]}` when asked for a bare array
fn unwrap_articles(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("articles").is_some_and(Value::is_array) => {
            map.remove("articles").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_request_trims_query() {
        assert_eq!(validate_request("  edge AI  ", 3).unwrap(), "edge AI");
    }

    #[test]
    fn test_validate_request_rejects_blank_query_and_bad_counts() {
        assert!(matches!(validate_request("   ", 3), Err(LitReviewError::InvalidInput(_))));
        assert!(matches!(validate_request("q", 0), Err(LitReviewError::InvalidInput(_))));
        assert!(matches!(
            validate_request("q", MAX_ARTICLE_COUNT + 1),
            Err(LitReviewError::InvalidInput(_))
        ));
        assert!(validate_request("q", MAX_ARTICLE_COUNT).is_ok());
    }

    #[test]
    fn test_unwrap_articles_only_unwraps_article_arrays() {
        assert_eq!(unwrap_articles(json!({"articles": [{"title": "A"}]})), json!([{"title": "A"}]));
        assert_eq!(unwrap_articles(json!({"articles": "none"})), json!({"articles": "none"}));
        assert_eq!(unwrap_articles(json!([1])), json!([1]));
    }

    #[test]
    fn test_require_shape_rejects_wrong_container() {
        let reply = r#"{"error": "I cannot comply with this request."}"#;
        match require_shape(json!({"error": "x"}), JsonShape::Array, reply) {
            Err(LitReviewError::MalformedResponse { raw }) => assert_eq!(raw, reply),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            require_shape(json!([{"field_overview": "x"}]), JsonShape::Object, "[]"),
            Err(LitReviewError::MalformedResponse { .. })
        ));
        assert_eq!(require_shape(json!([]), JsonShape::Array, "[]").unwrap(), json!([]));
    }
}
