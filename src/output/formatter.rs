//! Output formatters for console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::ReviewDocument;
use crate::review::{Article, Confidence, LiteratureReview};
use colored::{Color, Colorize};

const RULE_WIDTH: usize = 70;

/// Trait for rendering a review
pub trait OutputFormatter {
    fn format_report(&self, review: &LiteratureReview) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal report
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON document, same shape as the exported file
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn or_na(text: &str) -> &str {
    if text.trim().is_empty() {
        "N/A"
    } else {
        text
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_banner(&self, title: &str) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        format!(
            "\n{}\n{}\n{}\n",
            self.bold(&rule, Color::BrightBlue),
            self.bold(&format!("{:^width$}", title, width = RULE_WIDTH), Color::BrightBlue),
            self.bold(&rule, Color::BrightBlue)
        )
    }

    fn format_labelled(&self, label: &str, text: &str) -> String {
        format!("\n{}\n{}\n", self.bold(label, Color::White), or_na(text))
    }

    fn confidence_color(confidence: &Confidence) -> Color {
        match confidence {
            Confidence::High => Color::Green,
            Confidence::Medium => Color::Yellow,
            Confidence::Low => Color::Red,
            Confidence::Other(_) => Color::BrightBlack,
        }
    }

    fn format_article(&self, article: &Article, index: usize) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n",
            self.bold(&format!("Article {}: {}", index + 1, article.title), Color::Yellow)
        ));
        if !article.authors.is_empty() {
            output.push_str(&format!("Authors: {}\n", article.authors.join(", ")));
        }
        output.push_str(&format!("{} ({})\n", article.venue, article.publication_year));
        if let Some(doi) = &article.doi {
            output.push_str(&format!("{}\n", self.colorize(&format!("DOI: {}", doi), Color::BrightBlack)));
        }

        if self.detailed {
            output.push_str(&self.format_labelled("Abstract:", &article.abstract_text));
            if !article.keywords.is_empty() {
                output.push_str(&format!(
                    "{} {}\n",
                    self.bold("Keywords:", Color::White),
                    article.keywords.join(", ")
                ));
            }
        }

        output.push_str(&self.format_labelled("Research Goal:", &article.research_goal));
        output.push_str(&self.format_labelled("Methodology:", &article.methodology));
        output.push_str(&self.format_labelled("Main Results:", &article.main_results));
        output.push_str(&self.format_labelled("Key Contributions:", &article.key_contributions));
        output.push_str(&self.format_labelled("Limitations:", &article.limitations));

        output.push_str(&format!(
            "\nConfidence: {} | Source: {}\n",
            self.colorize(article.confidence.as_str(), Self::confidence_color(&article.confidence)),
            article.source
        ));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, review: &LiteratureReview) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_banner(&format!("Literature Review Results: {}", review.query)));
        output.push_str(&format!(
            "Generated: {}\n",
            review.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&format!(
            "\n{}\n",
            self.bold(&format!("📚 RESEARCH ARTICLES ({})", review.articles.len()), Color::White)
        ));
        for (index, article) in review.articles.iter().enumerate() {
            output.push_str(&self.format_article(article, index));
        }

        output.push_str(&format!("\n{}\n", self.bold(&"=".repeat(RULE_WIDTH), Color::BrightBlue)));
        output.push_str(&format!("\n{}\n", self.bold("🔍 FIELD ANALYSIS & SYNTHESIS", Color::White)));
        for (heading, text) in review.synthesis.sections() {
            output.push_str(&format!("\n{}\n{}\n", self.bold(&format!("{}:", heading), Color::Yellow), or_na(text)));
        }
        output.push_str(&format!("\n{}\n", self.bold(&"=".repeat(RULE_WIDTH), Color::BrightBlue)));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, review: &LiteratureReview) -> Result<String> {
        let document = ReviewDocument::from(review);
        if self.pretty {
            Ok(serde_json::to_string_pretty(&document)?)
        } else {
            Ok(serde_json::to_string(&document)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn format_markdown_article(index: usize, article: &Article) -> String {
        let mut output = format!("### {}. {}\n\n", index, article.title);

        if !article.authors.is_empty() {
            output.push_str(&format!("**Authors:** {}  \n", article.authors.join(", ")));
        }
        output.push_str(&format!("**Venue:** {} ({})  \n", article.venue, article.publication_year));
        if let Some(doi) = &article.doi {
            output.push_str(&format!("**DOI:** [{}](https://doi.org/{})  \n", doi, doi));
        }
        output.push_str(&format!(
            "**Confidence:** {} | **Source:** {}\n\n",
            article.confidence, article.source
        ));

        if !article.abstract_text.is_empty() {
            output.push_str(&format!("> {}\n\n", article.abstract_text));
        }
        for (label, text) in [
            ("Research Goal", &article.research_goal),
            ("Methodology", &article.methodology),
            ("Main Results", &article.main_results),
            ("Key Contributions", &article.key_contributions),
            ("Limitations", &article.limitations),
        ] {
            output.push_str(&format!("- **{}:** {}\n", label, or_na(text)));
        }
        if !article.keywords.is_empty() {
            output.push_str(&format!("- **Keywords:** `{}`\n", article.keywords.join("`, `")));
        }
        output.push('\n');
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, review: &LiteratureReview) -> Result<String> {
        let mut output = format!("# Literature Review: {}\n\n", review.query);

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Articles:** {}\n\n",
                review.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                review.articles.len()
            ));
        }

        output.push_str("## 📚 Research Articles\n\n");
        for (i, article) in review.articles.iter().enumerate() {
            output.push_str(&Self::format_markdown_article(i + 1, article));
        }

        output.push_str("## 🔍 Field Analysis & Synthesis\n\n");
        for (heading, text) in review.synthesis.sections() {
            output.push_str(&format!("### {}\n\n{}\n\n", heading, or_na(text)));
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!("*Generated by litreview v{}*\n", env!("CARGO_PKG_VERSION")));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, review: &LiteratureReview, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), *format);
        formatter.format_report(review)
    }
}
