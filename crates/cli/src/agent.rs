use anyhow::{anyhow, Result};
use llm::{ContentBlock, Message, MessageBackend, MessagesRequest, MessagesResponse, ToolDefinition};
use std::sync::Arc;
use tools::{ToolInput, ToolRegistry};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// Stateful conversation: keeps history across turns and runs the tool-use
/// loop against the registry until the model produces a final answer.
pub struct AssistantAgent<B: MessageBackend> {
    backend: B,
    registry: Arc<ToolRegistry>,
    system_prompt: String,
    max_tool_rounds: usize,
    history: Vec<Message>,
}

impl<B: MessageBackend> AssistantAgent<B> {
    pub fn new(backend: B, registry: Arc<ToolRegistry>, system_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            registry,
            system_prompt: system_prompt.into(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            history: Vec::new(),
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .definitions()
            .into_iter()
            .map(|spec| ToolDefinition {
                name: spec.name,
                description: spec.description,
                input_schema: spec.input_schema,
            })
            .collect()
    }

    fn request(&self) -> MessagesRequest {
        MessagesRequest {
            model: self.backend.model().to_string(),
            max_tokens: self.backend.max_tokens(),
            system: Some(self.system_prompt.clone()),
            messages: self.history.clone(),
            tools: self.tool_definitions(),
        }
    }

    /// Send one user turn and return the assistant's final text.
    ///
    /// A failed turn is rolled back so the history stays a valid
    /// alternation of user and assistant messages.
    pub async fn ask(&mut self, input: &str) -> Result<String> {
        let checkpoint = self.history.len();
        self.history.push(Message::user(input));

        match self.run_turn().await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                self.history.truncate(checkpoint);
                Err(e)
            }
        }
    }

    async fn run_turn(&mut self) -> Result<String> {
        for round in 0..=self.max_tool_rounds {
            let response = self.backend.send(&self.request()).await?;
            self.history.push(Message::assistant(response.known_content()));

            if !response.wants_tools() {
                info!(rounds = round, "Assistant turn complete");
                return Ok(response.text());
            }
            if round == self.max_tool_rounds {
                break;
            }

            let results = self.run_tools(&response).await;
            self.history.push(Message::tool_results(results));
        }

        warn!(limit = self.max_tool_rounds, "Tool loop did not settle");
        Err(anyhow!(
            "Assistant kept requesting tools after {} rounds",
            self.max_tool_rounds
        ))
    }

    async fn run_tools(&self, response: &MessagesResponse) -> Vec<ContentBlock> {
        let mut results = Vec::new();
        for (id, name, input) in response.tool_uses() {
            debug!(tool = %name, "Model requested tool");
            let block = match self
                .registry
                .call(name, ToolInput::from_value(input.clone()))
                .await
            {
                Ok(output) => {
                    ContentBlock::tool_result(id, output.text_content(), output.is_error)
                }
                Err(e) => {
                    warn!(tool = %name, error = %e, "Tool call failed");
                    ContentBlock::tool_result(id, format!("Error: {}", e), true)
                }
            };
            results.push(block);
        }
        results
    }
}
