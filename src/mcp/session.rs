//! The tool-invocation seam between workflows and the knowledge service.
//!
//! A [`KnowledgeService`] hands out one [`KnowledgeSession`] per query. The
//! workflow closes it when done; implementations must also release it on
//! drop so early returns cannot leak a connection.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ToolError;

/// JSON object used for tool arguments.
pub type JsonObject = Map<String, Value>;

/// Factory for scoped knowledge-service sessions.
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    /// Opens a session for one query.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Connect`] if no session could be established.
    async fn open(&self) -> Result<Box<dyn KnowledgeSession>, ToolError>;
}

/// An open connection to the knowledge service.
#[async_trait]
pub trait KnowledgeSession: Send + Sync {
    /// Invokes a tool and returns its raw (still enveloped) result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the call itself fails. A tool that answers
    /// with an `error` field is not a failure at this level.
    async fn call_tool(&self, tool: &str, arguments: JsonObject) -> Result<Value, ToolError>;

    /// Releases the session. Calls after close fail with [`ToolError::Call`].
    async fn close(&mut self);
}
