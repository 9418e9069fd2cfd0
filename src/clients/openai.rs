//! OpenAI chat-completions client bound to the Symptom tool

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::clients::traits::{ModelError, SymptomModel, ToolCall};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::prompts::{ChatMessage, build_messages};
use crate::symptom::Symptom;

#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
    tools: [Value; 1],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[async_trait]
impl SymptomModel for OpenAiClient {
    async fn extract(&self, input: &str) -> std::result::Result<Vec<ToolCall>, ModelError> {
        debug!(
            "Requesting symptom extraction (model={}, chars={})",
            self.model,
            input.len()
        );

        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: build_messages(input),
            tools: [Symptom::tool_definition()],
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let text = res.text().await?;
        parse_tool_calls(&text)
    }
}

/// Pull every tool call out of a chat-completion response body.
///
/// A reply without tool calls (plain text) yields an empty list.
pub fn parse_tool_calls(body: &str) -> std::result::Result<Vec<ToolCall>, ModelError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::Decode("response has no choices".to_string()))?;

    choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| -> std::result::Result<ToolCall, ModelError> {
            let args = serde_json::from_str(&call.function.arguments).map_err(|e| {
                ModelError::MalformedArguments {
                    tool: call.function.name.clone(),
                    message: e.to_string(),
                }
            })?;
            Ok(ToolCall {
                name: call.function.name,
                args,
            })
        })
        .collect()
}
