//! Scripted doubles for workflow tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::message::{ChatRequest, ChatResponse, TokenUsage};
use super::provider::LlmProvider;
use crate::error::{AgentError, ToolError};
use crate::mcp::{JsonObject, KnowledgeService, KnowledgeSession};

#[derive(Debug, Clone)]
enum Scripted {
    Value(Value),
    Failure(String),
    Hang,
}

/// Knowledge service answering each tool with a fixed reply.
#[derive(Default)]
pub struct ScriptedKnowledge {
    replies: HashMap<String, Scripted>,
    refuse_connections: bool,
    calls: Arc<Mutex<Vec<(String, JsonObject)>>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl ScriptedKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `tool` with `value` (an enveloped or bare payload).
    pub fn reply(mut self, tool: &str, value: Value) -> Self {
        self.replies.insert(tool.to_string(), Scripted::Value(value));
        self
    }

    /// Fails `tool` at the protocol level.
    pub fn fail(mut self, tool: &str, message: &str) -> Self {
        self.replies
            .insert(tool.to_string(), Scripted::Failure(message.to_string()));
        self
    }

    /// Never answers `tool`.
    pub fn hang(mut self, tool: &str) -> Self {
        self.replies.insert(tool.to_string(), Scripted::Hang);
        self
    }

    pub const fn refuse_connections(mut self) -> Self {
        self.refuse_connections = true;
        self
    }

    /// Tool names invoked so far, in order.
    pub fn tools_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(tool, _)| tool.clone()).collect())
            .unwrap_or_default()
    }

    /// Arguments of the first call to `tool`.
    pub fn arguments_of(&self, tool: &str) -> Option<JsonObject> {
        self.calls.lock().ok().and_then(|calls| {
            calls
                .iter()
                .find(|(name, _)| name == tool)
                .map(|(_, args)| args.clone())
        })
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeService for ScriptedKnowledge {
    async fn open(&self) -> Result<Box<dyn KnowledgeSession>, ToolError> {
        if self.refuse_connections {
            return Err(ToolError::Connect {
                endpoint: "scripted".to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            replies: self.replies.clone(),
            calls: Arc::clone(&self.calls),
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct ScriptedSession {
    replies: HashMap<String, Scripted>,
    calls: Arc<Mutex<Vec<(String, JsonObject)>>>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl KnowledgeSession for ScriptedSession {
    async fn call_tool(&self, tool: &str, arguments: JsonObject) -> Result<Value, ToolError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((tool.to_string(), arguments));
        }
        match self.replies.get(tool) {
            Some(Scripted::Value(value)) => Ok(value.clone()),
            Some(Scripted::Failure(message)) => Err(ToolError::Call {
                tool: tool.to_string(),
                message: message.clone(),
            }),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(ToolError::Call {
                tool: tool.to_string(),
                message: "unknown tool".to_string(),
            }),
        }
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Answer,
    Fail,
    Hang,
}

/// Provider that returns a fixed completion, always fails, or never answers.
pub struct ScriptedProvider {
    behavior: Behavior,
    reply: String,
    calls: AtomicUsize,
    last_user_message: Mutex<Option<String>>,
}

impl ScriptedProvider {
    fn with(behavior: Behavior, reply: &str) -> Self {
        Self {
            behavior,
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_user_message: Mutex::new(None),
        }
    }

    pub fn answering(reply: &str) -> Self {
        Self::with(Behavior::Answer, reply)
    }

    pub fn failing() -> Self {
        Self::with(Behavior::Fail, "")
    }

    pub fn hanging() -> Self {
        Self::with(Behavior::Hang, "")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_message(&self) -> Option<String> {
        self.last_user_message.lock().ok().and_then(|m| m.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_user_message.lock() {
            *last = request.messages.last().map(|m| m.content.clone());
        }
        match self.behavior {
            Behavior::Answer => Ok(ChatResponse {
                content: self.reply.clone(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".to_string()),
            }),
            Behavior::Fail => Err(AgentError::ApiRequest {
                message: "service unavailable".to_string(),
                status: Some(503),
            }),
            Behavior::Hang => std::future::pending().await,
        }
    }
}
