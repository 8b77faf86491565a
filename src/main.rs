//! litreview: LLM-assisted literature review generator

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use litreview::cli::{self, Cli, Commands, ConfigAction};
use litreview::config::{Config, OutputFormat};
use litreview::error::{LitReviewError, Result};
use litreview::llm::client::{ClientConfig, CompletionClient};
use litreview::llm::generator::LiteratureReviewGenerator;
use litreview::output::formatter::ReportGenerator;
use litreview::output::report::{export_review, load_review};
use litreview::review::LiteratureReview;
use log::{debug, error, info};
use std::path::Path;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // API keys may live in a local .env file
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Load configuration
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        if let Some(raw) = e.raw_response() {
            debug!("Raw model reply:\n{}", raw);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Generate {
            query,
            count,
            model,
            variant,
            output,
            save,
            detailed,
            no_color,
        } => {
            let output_format = resolve_format(output.as_deref(), &config)?;
            let variant = match variant {
                Some(v) => cli::parse_variant(&v).map_err(LitReviewError::InvalidInput)?,
                None => config.generation.variant,
            };
            let article_count = count.unwrap_or(config.generation.article_count);
            let use_colors = apply_color_choice(no_color, &config);

            // Fail fast on a missing credential, before any network call
            let api_key = config.api_key_from_env()?;
            let client = CompletionClient::new(ClientConfig::from_config(&config, api_key, model))?;
            let generator = LiteratureReviewGenerator::new(client, variant);

            info!("Query: {} | Model: {} | Articles: {}", query, generator.model(), article_count);

            let spinner = progress_spinner(&format!("Generating literature review: {}", query));
            let result = generator.generate_review(&query, article_count).await;
            spinner.finish_and_clear();
            let review = result?;

            render(&review, &output_format, use_colors, detailed || config.output.detailed)?;

            if let Some(path) = save {
                export_review(&review, &path)?;
                eprintln!("{}", format!("✓ Review exported to {}", path.display()).green());
            }
        }

        Commands::Show {
            path,
            output,
            detailed,
            no_color,
        } => {
            let output_format = resolve_format(output.as_deref(), &config)?;
            let use_colors = apply_color_choice(no_color, &config);
            let review = load_review(&path)?;
            render(&review, &output_format, use_colors, detailed || config.output.detailed)?;
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| LitReviewError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("# {}\n{}", config_path.display(), content);
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset to defaults: {}", config_path.display());
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(LitReviewError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Returns whether colors are on, and forces `colored` off when they are not
fn apply_color_choice(no_color: bool, config: &Config) -> bool {
    let use_colors = !no_color && config.output.color_output;
    if !use_colors {
        colored::control::set_override(false);
    }
    use_colors
}

fn render(review: &LiteratureReview, format: &OutputFormat, use_colors: bool, detailed: bool) -> Result<()> {
    let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
    let report = generator.generate_report(review, format)?;
    println!("{}", report);
    Ok(())
}

fn progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        Ok(style) => pb.set_style(style),
        Err(e) => debug!("Falling back to default spinner style: {}", e),
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
