//! Domain-specific error types for symptom-scribe

use thiserror::Error;

use crate::clients::ModelError;

/// Main error type for the symptom extractor
#[derive(Error, Debug)]
pub enum SymptomScribeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Model provider error: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid JSON structure: missing key '{field}'")]
    MissingField { field: String },

    #[error("HTTP client error: {message}")]
    HttpClient { message: String },

    #[error("HTTP server error: {message}")]
    Http { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SymptomScribeError {
    /// Name of the record field this error is about, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SymptomScribeError::MissingField { field } => Some(field),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SymptomScribeError {
    fn from(err: reqwest::Error) -> Self {
        SymptomScribeError::HttpClient {
            message: err.to_string(),
        }
    }
}

/// Result type alias for symptom-scribe operations
pub type Result<T> = std::result::Result<T, SymptomScribeError>;
