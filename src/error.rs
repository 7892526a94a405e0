//! Error types for the support agent.
//!
//! Errors are split by layer: [`AgentError`] for the language-model side,
//! [`ToolError`] for the knowledge-service protocol, and [`CommandError`]
//! for the CLI. Workflows catch the first two and turn them into answer
//! text, so only configuration and CLI failures ever reach `main`.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the LLM provider layer and agent configuration.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was configured for the provider.
    #[error("API key missing: set OPENAI_API_KEY or SUPPORT_API_KEY")]
    ApiKeyMissing,

    /// The configured provider name is not known.
    #[error("unsupported LLM provider: {name}")]
    UnsupportedProvider {
        /// Provider name as configured.
        name: String,
    },

    /// The provider API call failed.
    #[error("LLM API request failed: {message}")]
    ApiRequest {
        /// Error message from the SDK.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// The provider returned a completion with no text.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// The model call did not finish within the configured bound.
    #[error("LLM call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Errors raised while talking to the knowledge service.
///
/// These are protocol failures: the tool call itself did not complete.
/// A tool that answers with an `error` field is a domain error and is
/// carried in [`crate::mcp::Reply::Error`] instead.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Could not establish a session with the knowledge service.
    #[error("failed to connect to knowledge service at {endpoint}: {message}")]
    Connect {
        /// Endpoint URL that was dialled.
        endpoint: String,
        /// Transport error message.
        message: String,
    },

    /// The tool call was rejected or the transport failed mid-call.
    #[error("tool `{tool}` failed: {message}")]
    Call {
        /// Tool name.
        tool: String,
        /// Error message from the protocol layer.
        message: String,
    },

    /// The tool call did not finish within the configured bound.
    #[error("tool `{tool}` timed out after {}s", .timeout.as_secs())]
    Timeout {
        /// Tool name.
        tool: String,
        /// Bound that was exceeded.
        timeout: Duration,
    },

    /// The server flagged the tool result as an error.
    #[error("tool `{tool}` reported an error: {message}")]
    Flagged {
        /// Tool name.
        tool: String,
        /// Text content of the error result.
        message: String,
    },

    /// The tool result could not be encoded or decoded.
    #[error("malformed payload from `{tool}`: {message}")]
    Decode {
        /// Tool name.
        tool: String,
        /// Decoder message.
        message: String,
    },
}

/// Errors raised by CLI command handling.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A command could not complete.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Output could not be rendered in the requested format.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// LLM provider or configuration error.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Knowledge-service protocol error.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// CLI command error.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
