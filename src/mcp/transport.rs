//! Streamable HTTP transport to the knowledge service.
//!
//! Opens one rmcp client session per query against the configured endpoint.
//! Dropping a [`McpSession`] cancels the underlying service, so a session
//! never outlives the query that opened it.

use std::time::Duration;

use async_trait::async_trait;
use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParams, CallToolResult};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::StreamableHttpClientTransport;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::session::{JsonObject, KnowledgeService, KnowledgeSession};
use crate::agent::config::AgentConfig;
use crate::error::ToolError;

/// Base delay between reconnect attempts; multiplied by the attempt number.
const RECONNECT_BACKOFF: Duration = Duration::from_millis(250);

/// Knowledge service reached over MCP streamable HTTP.
#[derive(Debug, Clone)]
pub struct McpKnowledgeService {
    endpoint: String,
    timeout: Duration,
    connect_retries: u32,
}

impl McpKnowledgeService {
    /// Creates a service for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration, connect_retries: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            connect_retries,
        }
    }

    /// Creates a service from agent configuration.
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.knowledge_endpoint.clone(),
            config.timeout,
            config.connect_retries,
        )
    }

    /// Endpoint this service dials.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect_once(&self) -> Result<RunningService<RoleClient, ()>, ToolError> {
        let transport = StreamableHttpClientTransport::from_uri(self.endpoint.clone());
        let connect_err = |message: String| ToolError::Connect {
            endpoint: self.endpoint.clone(),
            message,
        };

        tokio::time::timeout(self.timeout, ().serve(transport))
            .await
            .map_err(|_| connect_err(format!("timed out after {}s", self.timeout.as_secs())))?
            .map_err(|e| connect_err(e.to_string()))
    }
}

#[async_trait]
impl KnowledgeService for McpKnowledgeService {
    async fn open(&self) -> Result<Box<dyn KnowledgeSession>, ToolError> {
        let mut attempt: u32 = 0;
        loop {
            match self.connect_once().await {
                Ok(service) => {
                    debug!(endpoint = %self.endpoint, attempt, "knowledge session opened");
                    return Ok(Box::new(McpSession {
                        service: Some(service),
                        timeout: self.timeout,
                    }));
                }
                Err(e) if attempt < self.connect_retries => {
                    attempt += 1;
                    warn!(endpoint = %self.endpoint, attempt, error = %e, "retrying knowledge-service connection");
                    tokio::time::sleep(RECONNECT_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// A live rmcp client session.
pub struct McpSession {
    service: Option<RunningService<RoleClient, ()>>,
    timeout: Duration,
}

#[async_trait]
impl KnowledgeSession for McpSession {
    async fn call_tool(&self, tool: &str, arguments: JsonObject) -> Result<Value, ToolError> {
        let service = self.service.as_ref().ok_or_else(|| ToolError::Call {
            tool: tool.to_string(),
            message: "session already closed".to_string(),
        })?;

        let params: CallToolRequestParams =
            serde_json::from_value(json!({ "name": tool, "arguments": arguments })).map_err(
                |e| ToolError::Decode {
                    tool: tool.to_string(),
                    message: e.to_string(),
                },
            )?;

        debug!(tool, "calling knowledge tool");
        let result = tokio::time::timeout(self.timeout, service.call_tool(params))
            .await
            .map_err(|_| ToolError::Timeout {
                tool: tool.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| ToolError::Call {
                tool: tool.to_string(),
                message: e.to_string(),
            })?;

        result_value(tool, &result)
    }

    async fn close(&mut self) {
        if let Some(service) = self.service.take()
            && let Err(e) = service.cancel().await
        {
            debug!(error = %e, "knowledge session did not shut down cleanly");
        }
    }
}

impl std::fmt::Debug for McpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpSession")
            .field("open", &self.service.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Converts a tool result into an enveloped JSON value.
fn result_value(tool: &str, result: &CallToolResult) -> Result<Value, ToolError> {
    let raw = serde_json::to_value(result).map_err(|e| ToolError::Decode {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;

    if result.is_error == Some(true) {
        let message = content_parts(&raw)
            .into_iter()
            .filter_map(|part| part.as_str().map(str::to_string))
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ToolError::Flagged {
            tool: tool.to_string(),
            message,
        });
    }

    Ok(normalize_result(raw))
}

/// Prefers structured content; otherwise wraps the text parts under `data`.
///
/// Text parts are parsed as JSON where possible, since servers without
/// structured output serialize their return value into a text part.
pub(crate) fn normalize_result(raw: Value) -> Value {
    let has_structured = raw
        .get("structuredContent")
        .is_some_and(|sc| !sc.is_null());
    if has_structured {
        return raw;
    }
    json!({ "data": content_parts(&raw) })
}

fn content_parts(raw: &Value) -> Vec<Value> {
    raw.get("content")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .map(|text| {
                    serde_json::from_str::<Value>(text)
                        .unwrap_or_else(|_| Value::String(text.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}
