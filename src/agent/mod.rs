//! Answering layer for the support agent.
//!
//! Wraps a pluggable LLM provider and the knowledge-service client into two
//! workflows, with a [`QueryProcessor`] in front that routes each query.
//!
//! # Architecture
//!
//! ```text
//! User query → QueryProcessor
//!   ├── Router (keywords, then help-seeking patterns)
//!   ├── Support → ClassificationWorkflow
//!   │   └── classify → template → scoped knowledge → SupportSpecialistAgent
//!   └── Exploratory → ExploratoryWorkflow
//!       └── broad search → compile context → ExplorerAgent
//! ```
//!
//! A failed model call falls back to a deterministic answer; a failed tool
//! call becomes a one-line diagnostic. Callers always get an [`Answer`].

pub mod answer;
pub mod classification;
pub mod client;
pub mod config;
pub mod explorer;
pub mod exploratory;
pub mod fallback;
pub mod message;
pub mod processor;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod specialist;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use answer::{Answer, AnswerKind};
pub use classification::ClassificationWorkflow;
pub use client::create_provider;
pub use config::AgentConfig;
pub use explorer::ExplorerAgent;
pub use exploratory::{ExploratoryWorkflow, NO_MATCHES_MESSAGE};
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use processor::{DEMO_QUERIES, QueryProcessor};
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use specialist::SupportSpecialistAgent;
pub use traits::{Agent, AgentResponse};
