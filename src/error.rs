//! Error handling for the literature review generator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LitReviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// DNS, connect, timeout or body-read failure talking to the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success HTTP status
    #[error("Upstream error: HTTP {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// No JSON could be recovered from the model reply. Carries the raw text.
    #[error("Malformed response: no JSON found in model reply ({} chars)", .raw.len())]
    MalformedResponse { raw: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, LitReviewError>;

impl From<reqwest::Error> for LitReviewError {
    fn from(err: reqwest::Error) -> Self {
        LitReviewError::Transport(err.to_string())
    }
}

impl LitReviewError {
    /// Raw model output attached to the error, if any
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            LitReviewError::MalformedResponse { raw } => Some(raw),
            _ => None,
        }
    }
}
