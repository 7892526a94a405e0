//! Knowledge-service tool names and argument types.
//!
//! Each struct serializes to the exact argument object the remote tool
//! expects.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Classifies a query into a canonical category.
pub const CLASSIFY_TOOL: &str = "classify_canonical_query";
/// Fetches the prompt template for a category.
pub const TEMPLATE_TOOL: &str = "get_query_template";
/// Retrieves category-scoped knowledge.
pub const SCOPED_KNOWLEDGE_TOOL: &str = "get_knowledge_for_query";
/// Broad semantic search over the whole knowledge base.
pub const SEARCH_TOOL: &str = "vector_search_knowledge";
/// Lists the canonical categories.
pub const LIST_CATEGORIES_TOOL: &str = "list_canonical_queries";
/// Reports knowledge-base indexing statistics.
pub const STATS_TOOL: &str = "get_knowledge_base_stats";
/// Screens a query for suitability before it is answered.
pub const VALIDATE_TOOL: &str = "validate_support_query";

/// Arguments for [`CLASSIFY_TOOL`].
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyParams<'a> {
    /// Raw customer query.
    pub user_query: &'a str,
}

/// Arguments for [`TEMPLATE_TOOL`].
#[derive(Debug, Clone, Serialize)]
pub struct TemplateParams<'a> {
    /// Canonical category name.
    pub query_name: &'a str,
}

/// Arguments for [`SCOPED_KNOWLEDGE_TOOL`].
#[derive(Debug, Clone, Serialize)]
pub struct ScopedKnowledgeParams<'a> {
    /// Canonical category name.
    pub category: &'a str,
    /// Raw customer query.
    pub query: &'a str,
    /// Number of knowledge chunks to retrieve.
    pub top_k: usize,
}

/// Arguments for [`SEARCH_TOOL`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams<'a> {
    /// Free-text query.
    pub query: &'a str,
    /// Number of matches to retrieve.
    pub top_k: usize,
}

/// Arguments for [`VALIDATE_TOOL`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidateParams<'a> {
    /// Raw customer query.
    pub query: &'a str,
}

/// Arguments for tools that take none.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoParams {}

/// Serializes tool arguments into a JSON object.
///
/// # Errors
///
/// Returns [`ToolError::Decode`] if `params` does not serialize to an object.
pub fn to_arguments<T: Serialize>(tool: &str, params: &T) -> Result<Map<String, Value>, ToolError> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ToolError::Decode {
            tool: tool.to_string(),
            message: format!("arguments must be an object, got {other}"),
        }),
        Err(e) => Err(ToolError::Decode {
            tool: tool.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scoped_knowledge_arguments() {
        let args = to_arguments(
            SCOPED_KNOWLEDGE_TOOL,
            &ScopedKnowledgeParams {
                category: "account_security",
                query: "reset password",
                top_k: 3,
            },
        )
        .unwrap_or_default();
        assert_eq!(
            Value::Object(args),
            json!({"category": "account_security", "query": "reset password", "top_k": 3})
        );
    }

    #[test]
    fn test_classify_uses_user_query_key() {
        let args = to_arguments(CLASSIFY_TOOL, &ClassifyParams { user_query: "hi" })
            .unwrap_or_default();
        assert_eq!(args.get("user_query"), Some(&json!("hi")));
    }

    #[test]
    fn test_no_params_is_empty_object() {
        let args = to_arguments(STATS_TOOL, &NoParams {}).unwrap_or_else(|_| unreachable!());
        assert!(args.is_empty());
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let result = to_arguments(SEARCH_TOOL, &"just a string");
        assert!(matches!(result, Err(ToolError::Decode { .. })));
    }
}
