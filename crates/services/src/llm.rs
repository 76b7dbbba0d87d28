use clinivox_config::ClaudeSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::upstream::{RetryPolicy, UpstreamError};

const UPSTREAM: &str = "language model";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude Messages API client used by the clinical services.
#[derive(Debug, Clone)]
pub struct LlmService {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl LlmService {
    pub fn new(client: Client, settings: &ClaudeSettings, retry: RetryPolicy) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            endpoint: format!("{}/v1/messages", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            retry,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one completion request and returns the text of the first
    /// content block. `messages` must start with a user turn.
    pub async fn complete(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::NotConfigured(UPSTREAM))?;

        let request = ClaudeRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages,
        };
        debug!(model = %self.model, turns = messages.len(), "Requesting completion");

        let response = self
            .retry
            .send(UPSTREAM, || {
                self.client
                    .post(&self.endpoint)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&request)
            })
            .await?;

        let body: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::decode(UPSTREAM, e))?;

        body.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(UpstreamError::NoResult(UPSTREAM))
    }
}
