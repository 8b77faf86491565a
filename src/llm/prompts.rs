//! Prompt templates for article generation and field synthesis

use crate::llm::client::ChatMessage;
use crate::review::Article;

/// Prompt templates for both pipeline layouts
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub articles: String,
    pub synthesis: String,
    pub service_system: String,
    pub service_user: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            articles: ARTICLES_TEMPLATE.to_string(),
            synthesis: SYNTHESIS_TEMPLATE.to_string(),
            service_system: SERVICE_SYSTEM_TEMPLATE.to_string(),
            service_user: SERVICE_USER_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Request `count` article summaries as a bare JSON array (snake_case keys)
    pub fn render_articles(&self, query: &str, count: usize) -> String {
        self.articles
            .replace("{count}", &count.to_string())
            .replace("{query}", query)
    }

    /// Request a field synthesis over already generated articles
    pub fn render_synthesis(&self, query: &str, articles: &[Article]) -> String {
        let listing = articles
            .iter()
            .map(|a| format!("- {} ({})", a.title, a.publication_year))
            .collect::<Vec<_>>()
            .join("\n");

        // Fill the query around the listing slot so neither value is rescanned
        self.synthesis
            .split("{articles}")
            .map(|part| part.replace("{query}", query))
            .collect::<Vec<_>>()
            .join(&listing)
    }

    /// System + user pair asking for articles and synthesis in one reply (camelCase keys)
    pub fn render_service_messages(&self, query: &str, count: usize) -> Vec<ChatMessage> {
        let count = count.to_string();
        vec![
            ChatMessage::system(self.service_system.replace("{count}", &count)),
            ChatMessage::user(
                self.service_user
                    .replace("{count}", &count)
                    .replace("{query}", query),
            ),
        ]
    }
}

const ARTICLES_TEMPLATE: &str = r#"Generate {count} realistic academic articles for the research topic: "{query}"

Return ONLY a valid JSON array with this exact structure for each article:
[
  {
    "title": "Article Title",
    "authors": ["Author Name 1", "Author Name 2"],
    "publication_year": 2024,
    "venue": "Journal/Conference Name",
    "doi": "10.xxxx/xxxxx",
    "abstract": "Research abstract...",
    "keywords": ["keyword1", "keyword2"],
    "research_goal": "What the research aimed to achieve",
    "methodology": "Methods and data used",
    "main_results": "Key findings and results",
    "key_contributions": "Novel contributions to the field",
    "limitations": "Limitations and open questions",
    "confidence": "high",
    "source": "arXiv/Journal"
  }
]

Field types: "authors" and "keywords" are arrays of strings, "publication_year" is an integer,
"doi" is a string or null, "confidence" is one of "low", "medium", "high", every other field is a string.

Ensure all fields are filled with realistic, credible information relevant to the query."#;

const SYNTHESIS_TEMPLATE: &str = r#"Analyze these research articles on "{query}" and provide a comprehensive field synthesis:

Articles:
{articles}

Return ONLY valid JSON with this structure:
{
  "field_overview": "Overview of common themes, trends, and methodologies in the field",
  "gaps_and_challenges": "Underexplored areas, methodological gaps, and open challenges",
  "future_directions": "Promising research directions and emerging opportunities",
  "practical_implications": "Real-world applications and industry relevance"
}

All four fields are strings. Provide insightful, evidence-based analysis."#;

const SERVICE_SYSTEM_TEMPLATE: &str = r#"You are an expert research assistant specialized in literature review and summarization.
Your task is to generate a comprehensive literature landscape for the given research query.

For each article, provide accurate metadata and structured information following this exact JSON format:
{
  "articles": [
    {
      "title": "Article Title",
      "authors": ["Author Name", "Another Author"],
      "publicationYear": 2024,
      "venue": "Journal/Conference Name",
      "doi": "10.xxxx/xxxxx",
      "abstract": "Clear, concise abstract",
      "keywords": ["keyword1", "keyword2"],
      "researchGoal": "Main research objective",
      "methodology": "Methods and data used",
      "mainResults": "Key findings and conclusions",
      "keyContributions": "Novel contributions to field",
      "limitations": "Limitations and open questions",
      "confidence": "high|medium|low",
      "source": "Semantic Scholar|arXiv|IEEE|ACM"
    }
  ],
  "synthesis": {
    "fieldOverview": "Common themes and trends in the field",
    "gapsAndChallenges": "Underexplored areas and open problems",
    "futureDirections": "Potential research directions",
    "practicalImplications": "Real-world applications and industry relevance"
  }
}

Generate {count} diverse, realistic articles. Return ONLY valid JSON, no markdown or additional text."#;

const SERVICE_USER_TEMPLATE: &str = r#"Generate a comprehensive literature landscape for this research query: "{query}"

Retrieve {count} highly relevant articles with complete metadata. For each article:
- Provide realistic, plausible research information
- Set confidence level based on relevance
- Include keywords, methodology, and contributions
- Note any limitations or open questions

Format as valid JSON matching the specified schema."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::Role;
    use crate::review::RecordValidator;

    #[test]
    fn test_articles_prompt_embeds_query_count_and_schema() {
        let prompt = PromptTemplates::default().render_articles("federated learning for edge computing", 3);

        assert!(prompt.contains("Generate 3 realistic academic articles"));
        assert!(prompt.contains("\"federated learning for edge computing\""));
        assert!(prompt.contains("\"publication_year\": 2024"));
        assert!(prompt.contains("\"key_contributions\""));
        assert!(prompt.contains("ONLY a valid JSON array"));
        assert!(!prompt.contains("{count}"));
        assert!(!prompt.contains("{query}"));
    }

    #[test]
    fn test_synthesis_prompt_lists_titles_and_years() {
        let validator = RecordValidator::default();
        let first = validator.to_article(
            serde_json::json!({"title": "Edge FL Survey", "publicationYear": 2022})
                .as_object()
                .unwrap(),
        );
        let second = validator.to_article(
            serde_json::json!({"title": "Async Aggregation", "publicationYear": 2023})
                .as_object()
                .unwrap(),
        );

        let prompt = PromptTemplates::default().render_synthesis("edge FL", &[first, second]);

        assert!(prompt.contains("- Edge FL Survey (2022)\n- Async Aggregation (2023)"));
        assert!(prompt.contains("\"field_overview\""));
        assert!(prompt.contains("\"practical_implications\""));
        assert!(prompt.contains("research articles on \"edge FL\""));
    }

    #[test]
    fn test_synthesis_placeholders_in_titles_and_query_are_left_alone() {
        let article = RecordValidator::default().to_article(
            serde_json::json!({"title": "On {query} injection", "publicationYear": 2020})
                .as_object()
                .unwrap(),
        );

        let prompt = PromptTemplates::default().render_synthesis("edge AI {articles}", &[article]);

        assert!(prompt.contains("- On {query} injection (2020)"));
        assert!(prompt.contains("research articles on \"edge AI {articles}\""));
    }

    #[test]
    fn test_query_containing_placeholder_text_is_not_expanded() {
        let prompt = PromptTemplates::default().render_articles("what is {count}?", 2);
        assert!(prompt.contains("\"what is {count}?\""));
    }

    #[test]
    fn test_service_messages_are_system_then_user() {
        let messages = PromptTemplates::default().render_service_messages("OCR for historical documents", 6);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[0].content.contains("\"publicationYear\""));
        assert!(messages[0].content.contains("Generate 6 diverse"));
        assert!(messages[1].content.contains("\"OCR for historical documents\""));
    }
}
