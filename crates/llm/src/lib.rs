use anyhow::Result;
use async_trait::async_trait;

mod anthropic;
mod messages;

pub use anthropic::{AnthropicClient, LlmError, ANTHROPIC_VERSION};
pub use messages::{
    ContentBlock, Message, MessagesRequest, MessagesResponse, Role, StopReason, ToolDefinition,
    Usage,
};

/// Anything that can answer a Messages request.
///
/// The conversation loop only depends on this trait, so tests can script
/// model replies without a network.
#[async_trait]
pub trait MessageBackend: Send + Sync {
    async fn send(&self, request: &MessagesRequest) -> Result<MessagesResponse>;

    fn model(&self) -> &str;

    /// Output token cap sent with every request
    fn max_tokens(&self) -> u32 {
        common::config::DEFAULT_MAX_TOKENS
    }
}
