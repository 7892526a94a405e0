//! MCP (Model Context Protocol) client for the knowledge service.
//!
//! The agent is a pure client: it opens one session per query, invokes a
//! fixed set of tools, and unwraps whatever envelope the results arrive in.
//!
//! # Architecture
//!
//! ```text
//! Workflow
//!   ↓ KnowledgeService::open()        (one session per query)
//! McpSession (rmcp, streamable HTTP)
//!   ↓ KnowledgeTools::call()           (bounded by config.timeout)
//! CallToolResult → normalize_result → envelope::unwrap
//!   ↓
//! Reply<T> = Payload | Error (domain) | Malformed
//! ```

pub mod envelope;
pub mod knowledge;
pub mod params;
pub mod session;
pub mod transport;

pub use envelope::{Envelope, unwrap};
pub use knowledge::{
    CategoryInfo, Classification, KnowledgeBaseStats, KnowledgeTools, NO_DOCUMENTATION_SENTINEL,
    Reply, ScopedKnowledge, SearchMatch, SearchResults, TemplateRecord, Validation,
};
pub use session::{JsonObject, KnowledgeService, KnowledgeSession};
pub use transport::{McpKnowledgeService, McpSession};
