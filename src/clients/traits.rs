use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One function call returned by the model: the tool it picked and the
/// decoded JSON arguments it filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to model provider failed: {0}")]
    Http(String),
    #[error("model provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode model response: {0}")]
    Decode(String),
    #[error("tool call '{tool}' has malformed arguments: {message}")]
    MalformedArguments { tool: String, message: String },
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Http(err.to_string())
    }
}

/// A language model that can be asked to extract symptom records from text.
#[async_trait]
pub trait SymptomModel: Send + Sync {
    /// Send the patient's text and return every tool call in the reply, in order.
    async fn extract(&self, input: &str) -> Result<Vec<ToolCall>, ModelError>;
}
