use crate::{Tool, ToolInput, ToolOutput, ToolSpec};
use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::McpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const LIST_TOOLS_ID: u64 = 1;
const CALL_TOOL_ID: u64 = 2;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("MCP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("MCP server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("No data found in SSE response")]
    NoData,

    #[error("invalid MCP JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MCP error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid MCP credentials header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

#[derive(Debug, Serialize)]
struct McpRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct McpResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ToolsListResult {
    #[serde(default)]
    tools: Vec<ToolSpec>,
}

/// Extract the JSON payload of an MCP reply.
///
/// Streamable HTTP servers answer with an SSE body; the first `data: ` line
/// carries the JSON-RPC message. A plain JSON body is accepted too.
pub fn parse_sse_response(body: &str) -> Result<Value, McpError> {
    if let Some(data) = body.lines().find_map(|line| line.strip_prefix("data: ")) {
        return Ok(serde_json::from_str(data)?);
    }
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    Err(McpError::NoData)
}

/// JSON-RPC client for a remote MCP server reached over HTTP POST
#[derive(Debug, Clone)]
pub struct McpHttpClient {
    server_url: String,
    client: Client,
}

impl McpHttpClient {
    pub fn new(config: &McpConfig) -> Result<Self, McpError> {
        Self::with_credentials(
            &config.server_url,
            Some((config.email.as_str(), config.access_token.as_str())),
        )
    }

    /// Basic auth is `email:personal_access_token`; `None` sends no
    /// Authorization header.
    pub fn with_credentials(
        server_url: &str,
        credentials: Option<(&str, &str)>,
    ) -> Result<Self, McpError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/event-stream"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("tcm-assistant/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some((email, token)) = credentials {
            let encoded = STANDARD.encode(format!("{}:{}", email, token));
            let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn rpc(&self, method: &str, params: Value, id: u64) -> Result<Value, McpError> {
        let request = McpRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };
        debug!(method, "Sending MCP request");

        let response = self
            .client
            .post(&self.server_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(McpError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let reply: McpResponse = serde_json::from_value(parse_sse_response(&body)?)?;
        if let Some(error) = reply.error {
            return Err(McpError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(reply.result.unwrap_or_else(|| json!({})))
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolSpec>, McpError> {
        let result = self.rpc("tools/list", json!({}), LIST_TOOLS_ID).await?;
        let listed: ToolsListResult = serde_json::from_value(result)?;
        info!(count = listed.tools.len(), "Listed remote MCP tools");
        Ok(listed.tools)
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, McpError> {
        self.rpc(
            "tools/call",
            json!({ "name": name, "arguments": arguments }),
            CALL_TOOL_ID,
        )
        .await
    }
}

/// One tool advertised by the remote server, proxied as a local [`Tool`]
pub struct RemoteTool {
    spec: ToolSpec,
    client: Arc<McpHttpClient>,
}

impl RemoteTool {
    pub fn new(spec: ToolSpec, client: Arc<McpHttpClient>) -> Self {
        Self { spec, client }
    }

    /// Wrap every tool the server lists
    pub async fn discover(client: Arc<McpHttpClient>) -> Result<Vec<Box<dyn Tool>>, McpError> {
        let specs = client.list_tools().await?;
        Ok(specs
            .into_iter()
            .map(|spec| Box::new(RemoteTool::new(spec, Arc::clone(&client))) as Box<dyn Tool>)
            .collect())
    }
}

#[async_trait::async_trait]
impl Tool for RemoteTool {
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn execute(&self, input: ToolInput) -> Result<ToolOutput> {
        let result = self
            .client
            .call_tool(&self.spec.name, input.into_value())
            .await?;
        Ok(ToolOutput::text(serde_json::to_string_pretty(&result)?))
    }
}
