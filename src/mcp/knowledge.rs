//! Typed view of the knowledge-service tool surface.
//!
//! Every call unwraps the result envelope and then sorts the payload into
//! one of three outcomes: the expected record, a domain error the tool
//! reported in an `error` field, or a payload of the wrong shape.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::envelope;
use super::params::{
    CLASSIFY_TOOL, ClassifyParams, LIST_CATEGORIES_TOOL, NoParams, SCOPED_KNOWLEDGE_TOOL,
    SEARCH_TOOL, STATS_TOOL, ScopedKnowledgeParams, SearchParams, TEMPLATE_TOOL, TemplateParams,
    VALIDATE_TOOL, ValidateParams, to_arguments,
};
use super::session::{JsonObject, KnowledgeSession};
use crate::error::ToolError;

/// Sentinel the knowledge service returns when retrieval finds nothing.
pub const NO_DOCUMENTATION_SENTINEL: &str = "No relevant documentation found.";

/// Outcome of a tool call that completed at the protocol level.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// The expected record.
    Payload(T),
    /// The tool answered with an explicit `error` field.
    Error(String),
    /// The payload did not have the expected shape.
    Malformed(String),
}

/// Result of classifying a query.
///
/// Only the category is required. The remaining fields are informational
/// and decode to their defaults when the service sends an unexpected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Canonical category name.
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    /// Older servers name the category field `suggested_query`.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub suggested_query: Option<String>,
    /// Classifier confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Option<f64>,
    /// Human-readable reason for the match.
    #[serde(default, deserialize_with = "lenient")]
    pub reason: Option<String>,
    /// Runner-up categories.
    #[serde(default, deserialize_with = "lenient")]
    pub alternatives: Vec<Alternative>,
}

impl Classification {
    /// The category name, preferring `category` over `suggested_query`.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        [self.category.as_deref(), self.suggested_query.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

/// A runner-up category from the classifier.
///
/// Accepts either `{"query": .., "score": ..}` or a bare category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AlternativeRepr")]
pub struct Alternative {
    /// Canonical category name.
    pub query: String,
    /// Match score, when the service sent one.
    pub score: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AlternativeRepr {
    Name(String),
    Scored {
        query: String,
        #[serde(default, deserialize_with = "lenient")]
        score: Option<f64>,
    },
}

impl From<AlternativeRepr> for Alternative {
    fn from(repr: AlternativeRepr) -> Self {
        match repr {
            AlternativeRepr::Name(query) => Self { query, score: None },
            AlternativeRepr::Scored { query, score } => Self { query, score },
        }
    }
}

/// Prompt template for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Template text with `{query}` and `{knowledge}` slots.
    pub template: String,
    /// Short description of the category.
    #[serde(default)]
    pub description: String,
}

/// Category-scoped retrieval result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedKnowledge {
    /// Concatenated knowledge text.
    #[serde(default)]
    pub knowledge: String,
    /// Source identifiers, in retrieval order.
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ScopedKnowledge {
    /// Returns `true` when retrieval produced nothing usable.
    ///
    /// Empty text and the service's "no documentation" sentinel both count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let text = self.knowledge.trim();
        text.is_empty() || text == NO_DOCUMENTATION_SENTINEL
    }
}

/// Broad semantic-search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matches in the service's ranking order.
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

/// One semantic-search match.
///
/// A field of the wrong shape (a `null` document, a numeric source) decodes
/// to its default so one bad match cannot discard the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Matched document text.
    #[serde(default, deserialize_with = "lenient")]
    pub document: String,
    /// Document metadata; `source` is the identifier used for attribution.
    #[serde(default)]
    pub metadata: Value,
    /// Match-level source, when the service lifts it out of metadata.
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    /// Embedding distance (lower is closer).
    #[serde(default, deserialize_with = "lenient")]
    pub distance: Option<f64>,
}

impl SearchMatch {
    /// Source identifier from metadata, falling back to the match-level field.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.metadata
            .get("source")
            .and_then(Value::as_str)
            .or(self.source.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// A canonical category as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Canonical name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// A few example queries.
    #[serde(default)]
    pub example_queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryList {
    #[serde(default)]
    queries: Vec<CategoryInfo>,
}

/// Knowledge-base indexing statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseStats {
    /// Total indexed chunks.
    #[serde(default)]
    pub total_chunks: u64,
    /// Chunk count per document filename.
    #[serde(default)]
    pub documents: BTreeMap<String, u64>,
    /// Indexing status text.
    #[serde(default)]
    pub status: String,
}

/// Verdict on whether a query is suitable for customer support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Whether the query can be handled.
    pub valid: bool,
    /// Reason for the verdict.
    #[serde(default, deserialize_with = "lenient")]
    pub reason: String,
    /// Suggestions for the customer when the query is rejected.
    #[serde(default, deserialize_with = "lenient")]
    pub suggestions: Vec<String>,
}

/// Decodes a field, falling back to its default when the shape is wrong.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Typed tool calls over one session.
///
/// Every call is bounded by the timeout given at construction, whatever
/// the session implementation does on its own.
pub struct KnowledgeTools<'a> {
    session: &'a dyn KnowledgeSession,
    timeout: Duration,
}

impl<'a> KnowledgeTools<'a> {
    /// Wraps an open session.
    #[must_use]
    pub fn new(session: &'a dyn KnowledgeSession, timeout: Duration) -> Self {
        Self { session, timeout }
    }

    /// Classifies a query.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn classify(&self, query: &str) -> Result<Reply<Classification>, ToolError> {
        let args = to_arguments(CLASSIFY_TOOL, &ClassifyParams { user_query: query })?;
        let raw = self.call(CLASSIFY_TOOL, args).await?;
        Ok(decode(CLASSIFY_TOOL, raw))
    }

    /// Fetches the template for a category.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn template(&self, category: &str) -> Result<Reply<TemplateRecord>, ToolError> {
        let args = to_arguments(
            TEMPLATE_TOOL,
            &TemplateParams {
                query_name: category,
            },
        )?;
        let raw = self.call(TEMPLATE_TOOL, args).await?;
        Ok(decode(TEMPLATE_TOOL, raw))
    }

    /// Retrieves knowledge scoped to a category.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn scoped_knowledge(
        &self,
        category: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Reply<ScopedKnowledge>, ToolError> {
        let args = to_arguments(
            SCOPED_KNOWLEDGE_TOOL,
            &ScopedKnowledgeParams {
                category,
                query,
                top_k,
            },
        )?;
        let raw = self.call(SCOPED_KNOWLEDGE_TOOL, args).await?;
        Ok(decode(SCOPED_KNOWLEDGE_TOOL, raw))
    }

    /// Runs a broad semantic search.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Reply<SearchResults>, ToolError> {
        let args = to_arguments(SEARCH_TOOL, &SearchParams { query, top_k })?;
        let raw = self.call(SEARCH_TOOL, args).await?;
        Ok(decode(SEARCH_TOOL, raw))
    }

    /// Asks the service whether a query is suitable for customer support.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn validate(&self, query: &str) -> Result<Reply<Validation>, ToolError> {
        let args = to_arguments(VALIDATE_TOOL, &ValidateParams { query })?;
        let raw = self.call(VALIDATE_TOOL, args).await?;
        Ok(decode(VALIDATE_TOOL, raw))
    }

    /// Lists the canonical categories the service knows.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn list_categories(&self) -> Result<Reply<Vec<CategoryInfo>>, ToolError> {
        let args = to_arguments(LIST_CATEGORIES_TOOL, &NoParams {})?;
        let raw = self.call(LIST_CATEGORIES_TOOL, args).await?;
        Ok(match decode::<CategoryList>(LIST_CATEGORIES_TOOL, raw) {
            Reply::Payload(list) => Reply::Payload(list.queries),
            Reply::Error(e) => Reply::Error(e),
            Reply::Malformed(e) => Reply::Malformed(e),
        })
    }

    /// Fetches knowledge-base statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] if the call fails at the protocol level.
    pub async fn stats(&self) -> Result<Reply<KnowledgeBaseStats>, ToolError> {
        let args = to_arguments(STATS_TOOL, &NoParams {})?;
        let raw = self.call(STATS_TOOL, args).await?;
        Ok(decode(STATS_TOOL, raw))
    }

    async fn call(&self, tool: &str, arguments: JsonObject) -> Result<Value, ToolError> {
        tokio::time::timeout(self.timeout, self.session.call_tool(tool, arguments))
            .await
            .map_err(|_| ToolError::Timeout {
                tool: tool.to_string(),
                timeout: self.timeout,
            })?
    }
}

impl std::fmt::Debug for KnowledgeTools<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeTools")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Unwraps and decodes a raw tool result.
fn decode<T: DeserializeOwned>(tool: &str, raw: Value) -> Reply<T> {
    let payload = envelope::unwrap(raw);

    let Value::Object(map) = &payload else {
        debug!(tool, payload = %payload, "tool payload is not a mapping");
        return Reply::Malformed(format!("expected a mapping, got {}", kind(&payload)));
    };

    if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), str::to_string);
        return Reply::Error(message);
    }

    serde_json::from_value(payload).map_or_else(|e| Reply::Malformed(e.to_string()), Reply::Payload)
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedKnowledge;
    use crate::mcp::KnowledgeService;
    use serde_json::json;

    #[test]
    fn test_decode_classification() {
        let raw = json!({"structuredContent": {"category": "account_security", "confidence": 0.9}});
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, raw);
        let Reply::Payload(c) = reply else {
            unreachable!("expected a classification payload");
        };
        assert_eq!(c.category_name(), Some("account_security"));
        assert_eq!(c.confidence, Some(0.9));
    }

    #[test]
    fn test_decode_classification_accepts_suggested_query() {
        let raw = json!({
            "suggested_query": "returns_refunds",
            "confidence": 0.5,
            "alternatives": [{"query": "general_support", "score": 0.2}],
            "reason": "Matched to returns_refunds"
        });
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, raw);
        let Reply::Payload(c) = reply else {
            unreachable!("expected a classification payload");
        };
        assert_eq!(c.category_name(), Some("returns_refunds"));
        assert_eq!(
            c.alternatives,
            vec![Alternative {
                query: "general_support".to_string(),
                score: Some(0.2)
            }]
        );
    }

    #[test]
    fn test_category_wins_over_suggested_query() {
        let raw = json!({"category": "account_security", "suggested_query": "general_support"});
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, raw);
        assert!(matches!(
            reply,
            Reply::Payload(ref c) if c.category_name() == Some("account_security")
        ));
    }

    #[test]
    fn test_informational_fields_tolerate_odd_shapes() {
        let raw = json!({
            "category": "device_troubleshooting",
            "confidence": null,
            "reason": 42,
            "alternatives": ["general_support", {"query": "returns_refunds", "score": "high"}]
        });
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, raw);
        let Reply::Payload(c) = reply else {
            unreachable!("expected a classification payload");
        };
        assert_eq!(c.category_name(), Some("device_troubleshooting"));
        assert_eq!(c.confidence, None);
        assert_eq!(c.reason, None);
        assert_eq!(c.alternatives.len(), 2);
        assert_eq!(c.alternatives[0].query, "general_support");
        assert_eq!(c.alternatives[1].score, None);

        let raw = json!({"category": "device_troubleshooting", "alternatives": "none"});
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, raw);
        assert!(matches!(reply, Reply::Payload(ref c) if c.alternatives.is_empty()));
    }

    #[test]
    fn test_decode_missing_category_has_no_name() {
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, json!({"confidence": 0.4}));
        assert!(matches!(reply, Reply::Payload(ref c) if c.category_name().is_none()));

        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, json!({"category": "  "}));
        assert!(matches!(reply, Reply::Payload(ref c) if c.category_name().is_none()));
    }

    #[test]
    fn test_decode_non_mapping_is_malformed() {
        let reply: Reply<Classification> = decode(CLASSIFY_TOOL, json!("account_security"));
        assert_eq!(
            reply,
            Reply::Malformed("expected a mapping, got a string".to_string())
        );
    }

    #[test]
    fn test_decode_error_field_wins() {
        let raw = json!({"matches": [], "count": 0, "error": "Knowledge base not indexed."});
        let reply: Reply<SearchResults> = decode(SEARCH_TOOL, raw);
        assert_eq!(reply, Reply::Error("Knowledge base not indexed.".to_string()));
    }

    #[test]
    fn test_scoped_knowledge_sentinel_counts_as_empty() {
        let k = ScopedKnowledge {
            knowledge: NO_DOCUMENTATION_SENTINEL.to_string(),
            sources: vec![],
        };
        assert!(k.is_empty());
        let k = ScopedKnowledge {
            knowledge: "  ".to_string(),
            sources: vec![],
        };
        assert!(k.is_empty());
        let k = ScopedKnowledge {
            knowledge: "Hold the power button for 10 seconds.".to_string(),
            sources: vec!["manual.pdf".to_string()],
        };
        assert!(!k.is_empty());
    }

    #[test]
    fn test_search_match_source_fallbacks() {
        let m: SearchMatch = serde_json::from_value(json!({
            "document": "d",
            "metadata": {"source": "knowledge_base_pdfs/a.pdf"},
            "source": "b.pdf"
        }))
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(m.source_id(), Some("knowledge_base_pdfs/a.pdf"));

        let m: SearchMatch = serde_json::from_value(json!({
            "document": "d",
            "metadata": null,
            "source": "b.pdf"
        }))
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(m.source_id(), Some("b.pdf"));

        let m: SearchMatch =
            serde_json::from_value(json!({"document": "d"})).unwrap_or_else(|_| unreachable!());
        assert_eq!(m.source_id(), None);
    }

    #[test]
    fn test_null_document_does_not_discard_other_matches() {
        let raw = json!({"matches": [
            {"document": "Laptops ship in two days.", "metadata": {"source": "shipping.pdf"}},
            {"document": null, "metadata": {}},
            {"document": "Phones ship in one day.", "source": 7, "distance": "near"}
        ]});
        let reply: Reply<SearchResults> = decode(SEARCH_TOOL, raw);
        let Reply::Payload(results) = reply else {
            unreachable!("expected search results");
        };
        assert_eq!(results.matches.len(), 3);
        assert_eq!(results.matches[0].document, "Laptops ship in two days.");
        assert_eq!(results.matches[1].document, "");
        assert_eq!(results.matches[2].source, None);
        assert_eq!(results.matches[2].distance, None);
    }

    #[test]
    fn test_decode_validation() {
        let raw = json!({
            "valid": false,
            "reason": "Query too short",
            "suggestions": ["Please provide more details about your issue"]
        });
        let reply: Reply<Validation> = decode(VALIDATE_TOOL, raw);
        let Reply::Payload(v) = reply else {
            unreachable!("expected a validation payload");
        };
        assert!(!v.valid);
        assert_eq!(v.reason, "Query too short");
        assert_eq!(v.suggestions.len(), 1);

        let reply: Reply<Validation> = decode(VALIDATE_TOOL, json!({"reason": "?"}));
        assert!(matches!(reply, Reply::Malformed(ref m) if m.contains("valid")));
    }

    #[tokio::test]
    async fn test_validate_sends_query() {
        let knowledge = ScriptedKnowledge::new().reply(
            VALIDATE_TOOL,
            json!({"structuredContent": {"valid": true, "reason": "Query is appropriate", "suggestions": []}}),
        );
        let session = knowledge.open().await.unwrap_or_else(|_| unreachable!());

        let reply = KnowledgeTools::new(session.as_ref(), Duration::from_secs(5))
            .validate("my account was hacked")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(matches!(reply, Reply::Payload(ref v) if v.valid));
        let args = knowledge.arguments_of(VALIDATE_TOOL).unwrap_or_default();
        assert_eq!(args["query"], "my account was hacked");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_call_times_out() {
        let knowledge = ScriptedKnowledge::new().hang(SEARCH_TOOL);
        let session = knowledge.open().await.unwrap_or_else(|_| unreachable!());

        let result = KnowledgeTools::new(session.as_ref(), Duration::from_millis(50))
            .search("anything", 3)
            .await;

        assert!(matches!(
            result,
            Err(ToolError::Timeout { ref tool, timeout }) if tool == SEARCH_TOOL && timeout == Duration::from_millis(50)
        ));
    }

    #[test]
    fn test_decode_stats() {
        let raw = json!({
            "total_chunks": 42,
            "documents": {"manual.pdf": 40, "faq.pdf": 2},
            "status": "Indexed and ready"
        });
        let reply: Reply<KnowledgeBaseStats> = decode(STATS_TOOL, raw);
        assert!(matches!(reply, Reply::Payload(ref s) if s.total_chunks == 42 && s.documents.len() == 2));
    }
}
