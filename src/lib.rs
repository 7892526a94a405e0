//! # support-agent
//!
//! Customer-support agent that answers natural-language queries from a
//! remote knowledge service reached over MCP.
//!
//! Each query is routed either to a classification workflow (classify,
//! fetch the category template, retrieve scoped documentation, generate)
//! or to an exploratory workflow (broad semantic search, generate). Every
//! path ends in an [`agent::Answer`]: model failures fall back to a
//! deterministic answer and protocol failures to a short diagnostic.

pub mod agent;
pub mod cli;
pub mod core;
pub mod error;
pub mod mcp;

pub use agent::{AgentConfig, Answer, AnswerKind, QueryProcessor};
pub use crate::core::{Category, Route, route};
pub use error::{AgentError, CommandError, Error, Result, ToolError};
pub use mcp::{KnowledgeService, McpKnowledgeService};
