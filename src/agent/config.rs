//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! The built [`AgentConfig`] is immutable and shared by every query.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;
use crate::mcp::McpKnowledgeService;

/// Default knowledge-service endpoint (streamable HTTP MCP).
pub const DEFAULT_KNOWLEDGE_ENDPOINT: &str = "http://127.0.0.1:8000/mcp/";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default number of knowledge chunks per answer.
const DEFAULT_TOP_K: usize = 3;
/// Default result count requested from the broad semantic search.
const DEFAULT_SEARCH_TOP_K: usize = 5;
/// Default max tokens for generated answers.
const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default bound on each tool call and each model call, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default number of reconnect attempts when opening a session.
const DEFAULT_CONNECT_RETRIES: u32 = 2;

/// Configuration for the support agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model used by both answering agents.
    pub model: String,
    /// Knowledge-service MCP endpoint.
    pub knowledge_endpoint: String,
    /// Number of knowledge chunks used to build an answer.
    pub top_k: usize,
    /// Result count requested from the broad semantic search.
    ///
    /// Never below [`AgentConfig::top_k`]: broad search has no category
    /// filter, so it over-fetches and keeps the best `top_k`.
    pub search_top_k: usize,
    /// Maximum tokens for generated answers.
    pub max_tokens: u32,
    /// Bound applied to every tool call and every model call.
    pub timeout: Duration,
    /// Reconnect attempts when opening a knowledge-service session.
    pub connect_retries: u32,
    /// Directory containing prompt template files.
    ///
    /// When set, system prompts are loaded from markdown files in this
    /// directory, falling back to compiled-in defaults for any missing files.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    knowledge_endpoint: Option<String>,
    top_k: Option<usize>,
    search_top_k: Option<usize>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    connect_retries: Option<u32>,
    prompt_dir: Option<PathBuf>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("SUPPORT_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("SUPPORT_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("SUPPORT_BASE_URL"))
                .ok();
        }
        if self.model.is_none() {
            self.model = std::env::var("SUPPORT_MODEL").ok();
        }
        if self.knowledge_endpoint.is_none() {
            self.knowledge_endpoint = std::env::var("SUPPORT_MCP_ENDPOINT").ok();
        }
        if self.top_k.is_none() {
            self.top_k = std::env::var("SUPPORT_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.search_top_k.is_none() {
            self.search_top_k = std::env::var("SUPPORT_SEARCH_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.timeout.is_none() {
            self.timeout = std::env::var("SUPPORT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        if self.connect_retries.is_none() {
            self.connect_retries = std::env::var("SUPPORT_CONNECT_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("SUPPORT_PROMPT_DIR")
                .ok()
                .map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the knowledge-service endpoint.
    #[must_use]
    pub fn knowledge_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.knowledge_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the result count.
    #[must_use]
    pub const fn top_k(mut self, n: usize) -> Self {
        self.top_k = Some(n);
        self
    }

    /// Sets the broad-search result count.
    #[must_use]
    pub const fn search_top_k(mut self, n: usize) -> Self {
        self.search_top_k = Some(n);
        self
    }

    /// Sets the max tokens for generated answers.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the reconnect attempts.
    #[must_use]
    pub const fn connect_retries(mut self, n: u32) -> Self {
        self.connect_retries = Some(n);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Knowledge-service client from the resolved endpoint settings.
    ///
    /// Needs no API key, so commands that never call the model can use it.
    #[must_use]
    pub fn knowledge_service(&self) -> McpKnowledgeService {
        McpKnowledgeService::new(
            self.knowledge_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_ENDPOINT.to_string()),
            self.call_timeout(),
            self.connect_retries.unwrap_or(DEFAULT_CONNECT_RETRIES),
        )
    }

    /// Per-call timeout as it will resolve in the built config.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;
        let top_k = self.top_k.unwrap_or(DEFAULT_TOP_K).max(1);

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            knowledge_endpoint: self
                .knowledge_endpoint
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_ENDPOINT.to_string()),
            top_k,
            search_top_k: self
                .search_top_k
                .unwrap_or(DEFAULT_SEARCH_TOP_K)
                .max(top_k),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_retries: self.connect_retries.unwrap_or(DEFAULT_CONNECT_RETRIES),
            prompt_dir: self.prompt_dir,
        })
    }
}
