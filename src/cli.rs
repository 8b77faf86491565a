//! CLI interface for the literature review generator

use crate::config::{OutputFormat, PipelineVariant};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "litreview")]
#[command(version)]
#[command(about = "LLM-assisted literature review generator")]
#[command(long_about = "Generate article summaries and a field synthesis for a research topic using a hosted chat-completion model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a literature review for a research query
    Generate {
        /// Research query, e.g. "federated learning for edge computing"
        query: String,

        /// Number of articles to request (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Model identifier override
        #[arg(short, long)]
        model: Option<String>,

        /// Prompt layout: console (two calls) or service (one call)
        #[arg(long)]
        variant: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Also export the review as JSON to this path
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include abstracts and keywords in console output
        #[arg(short, long)]
        detailed: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Render a previously exported review
    Show {
        /// Path to an exported review JSON file
        path: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Include abstracts and keywords in console output
        #[arg(short, long)]
        detailed: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Parse and validate pipeline variant
pub fn parse_variant(variant: &str) -> Result<PipelineVariant, String> {
    match variant.to_lowercase().as_str() {
        "console" => Ok(PipelineVariant::Console),
        "service" => Ok(PipelineVariant::Service),
        _ => Err(format!("Invalid pipeline variant: {}. Supported: console, service", variant)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!(parse_variant("Service"), Ok(PipelineVariant::Service));
        assert!(parse_variant("batch").is_err());
    }

    #[test]
    fn test_generate_arguments_parse() {
        let cli = Cli::parse_from([
            "litreview",
            "generate",
            "federated learning for edge computing",
            "-n",
            "3",
            "--output",
            "json",
            "--no-color",
        ]);

        match cli.command {
            Commands::Generate { query, count, output, no_color, save, .. } => {
                assert_eq!(query, "federated learning for edge computing");
                assert_eq!(count, Some(3));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(no_color);
                assert!(save.is_none());
            }
            _ => panic!("expected generate command"),
        }
    }
}
