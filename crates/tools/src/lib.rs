use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

// Allow-list checks backed by the active projects cache
pub mod active_projects;

// Remote MCP endpoint over HTTP
pub mod mcp;

pub use active_projects::{
    active_projects_tools, IsProjectActiveTool, ListActiveProjectsTool, IS_PROJECT_ACTIVE,
    LIST_ACTIVE_PROJECTS,
};
pub use mcp::{McpError, McpHttpClient, RemoteTool};

/// Arguments of one tool call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolInput {
    pub args: Map<String, Value>,
}

impl ToolInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.args.insert(name.to_string(), value.into());
        self
    }

    /// Non-object values (null included) become an empty argument map.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(args) => Self { args },
            _ => Self::default(),
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

/// Response payload: a list of content blocks, one text block in practice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// All text blocks joined by newlines
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Declared shape of a tool, as handed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "inputSchema", default = "empty_schema")]
    pub input_schema: Value,
}

pub fn empty_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;
    async fn execute(&self, input: ToolInput) -> Result<ToolOutput>;
}

/// Tools by name. Definitions are listed in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering an existing name replaces the previous tool in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.spec().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "Tool registered twice, keeping the latest");
        } else {
            self.order.push(name);
        }
    }

    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Box<dyn Tool>>) {
        for tool in tools {
            self.register(tool);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn definitions(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.spec())
            .collect()
    }

    /// Unknown names are answered, not failed, so the model can recover.
    pub async fn call(&self, name: &str, input: ToolInput) -> Result<ToolOutput> {
        match self.get(name) {
            Some(tool) => {
                debug!(tool = %name, "Executing tool");
                tool.execute(input).await
            }
            None => Ok(ToolOutput::text(format!("Unknown tool: {}", name))),
        }
    }
}
