//! Literature review generator library

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod review;

pub use config::Config;
pub use error::{LitReviewError, Result};
pub use llm::generator::LiteratureReviewGenerator;
