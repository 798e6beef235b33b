use crate::{MessageBackend, MessagesRequest, MessagesResponse};
use async_trait::async_trait;
use common::LlmConfig;
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Anthropic API key cannot be empty")]
    MissingApiKey,

    #[error("Anthropic request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Anthropic API error {status}: {body}")]
    Http { status: u16, body: String },
}

/// Client for the Messages endpoint, tool use included
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        // Tool-use turns with long prompts can be slow
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    pub async fn create_message(
        &self,
        request: &MessagesRequest,
    ) -> Result<MessagesResponse, LlmError> {
        let start_time = Instant::now();
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending Anthropic request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Anthropic API error");
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        info!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            stop_reason = ?parsed.stop_reason,
            "Anthropic response received"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl MessageBackend for AnthropicClient {
    async fn send(&self, request: &MessagesRequest) -> anyhow::Result<MessagesResponse> {
        Ok(self.create_message(request).await?)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
