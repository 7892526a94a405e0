//! Output formatting for CLI commands.

use std::fmt::Write;

use serde::Serialize;

use crate::agent::Answer;
use crate::core::RouteDecision;
use crate::mcp::{CategoryInfo, KnowledgeBaseStats, Validation};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name, defaulting to text for anything unknown.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes a value as pretty JSON.
    #[must_use]
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Formats a single answer.
#[must_use]
pub fn format_answer(answer: &Answer, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{answer}\n"),
        OutputFormat::Json => format.to_json(answer),
    }
}

/// Formats demo results: each query followed by its answer.
#[must_use]
pub fn format_demo(results: &[(String, Answer)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for (i, (query, answer)) in results.iter().enumerate() {
                let _ = write!(
                    output,
                    "=== Query {}: {query}\n[{} / {}]\n{answer}\n\n",
                    i + 1,
                    answer.route,
                    answer.kind.as_str()
                );
            }
            output
        }
        OutputFormat::Json => {
            let entries: Vec<_> = results
                .iter()
                .map(|(query, answer)| serde_json::json!({ "query": query, "answer": answer }))
                .collect();
            format.to_json(&entries)
        }
    }
}

/// Formats a routing decision.
#[must_use]
pub fn format_route(query: &str, decision: &RouteDecision, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let reason = match (decision.keyword, decision.keyword_category, decision.pattern) {
                (Some(keyword), Some(category), _) => {
                    format!("keyword \"{keyword}\" ({category})")
                }
                (Some(keyword), None, _) => format!("keyword \"{keyword}\""),
                (None, _, Some(pattern)) => format!("pattern {pattern}"),
                (None, _, None) => "no support keyword or help pattern".to_string(),
            };
            format!("{}\n  query:  {query}\n  reason: {reason}\n", decision.route)
        }
        OutputFormat::Json => format.to_json(&serde_json::json!({
            "query": query,
            "route": decision.route,
            "keyword": decision.keyword,
            "keyword_category": decision.keyword_category,
            "pattern": decision.pattern,
        })),
    }
}

/// Formats the category listing.
#[must_use]
pub fn format_categories(categories: &[CategoryInfo], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if categories.is_empty() {
                return "No categories defined.\n".to_string();
            }
            let mut output = format!("Categories ({}):\n", categories.len());
            for category in categories {
                let _ = writeln!(output, "  {:<24} {}", category.name, category.description);
                for example in &category.example_queries {
                    let _ = writeln!(output, "      e.g. {example}");
                }
            }
            output
        }
        OutputFormat::Json => format.to_json(categories),
    }
}

/// Formats knowledge-base statistics.
#[must_use]
pub fn format_stats(stats: &KnowledgeBaseStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format!(
                "Knowledge base: {}\nTotal chunks: {}\nDocuments: {}\n",
                if stats.status.is_empty() {
                    "unknown"
                } else {
                    &stats.status
                },
                stats.total_chunks,
                stats.documents.len()
            );
            for (document, chunks) in &stats.documents {
                let _ = writeln!(output, "  {document}: {chunks} chunks");
            }
            output
        }
        OutputFormat::Json => format.to_json(stats),
    }
}

/// Formats a query-validation verdict.
#[must_use]
pub fn format_validation(validation: &Validation, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let verdict = if validation.valid { "valid" } else { "invalid" };
            let mut output = if validation.reason.is_empty() {
                format!("{verdict}\n")
            } else {
                format!("{verdict}: {}\n", validation.reason)
            };
            for suggestion in &validation.suggestions {
                let _ = writeln!(output, "  - {suggestion}");
            }
            output
        }
        OutputFormat::Json => format.to_json(validation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AnswerKind;
    use crate::core::{Route, explain};
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_format_answer_json() {
        let answer = Answer::plain(Route::Exploratory, AnswerKind::NoMatches, "nothing");
        let json: serde_json::Value =
            serde_json::from_str(&format_answer(&answer, OutputFormat::Json)).unwrap_or_default();
        assert_eq!(json["text"], "nothing");
        assert_eq!(json["kind"], "no_matches");
    }

    #[test]
    fn test_format_route_text() {
        let decision = explain("please reset my password");
        let text = format_route("please reset my password", &decision, OutputFormat::Text);
        assert!(text.starts_with("support\n"));
        assert!(text.contains("keyword \"password\" (account_security)"));

        let decision = explain("what do you sell");
        let text = format_route("what do you sell", &decision, OutputFormat::Text);
        assert!(text.starts_with("exploratory\n"));
    }

    #[test]
    fn test_format_stats_text() {
        let stats = KnowledgeBaseStats {
            total_chunks: 12,
            documents: BTreeMap::from([("manual.pdf".to_string(), 12)]),
            status: "indexed".to_string(),
        };
        let text = format_stats(&stats, OutputFormat::Text);
        assert!(text.contains("Knowledge base: indexed"));
        assert!(text.contains("manual.pdf: 12 chunks"));
    }

    #[test]
    fn test_format_empty_categories() {
        assert_eq!(
            format_categories(&[], OutputFormat::Text),
            "No categories defined.\n"
        );
    }

    #[test]
    fn test_format_validation_text() {
        let validation = Validation {
            valid: false,
            reason: "Query too short".to_string(),
            suggestions: vec!["Please provide more details about your issue".to_string()],
        };
        assert_eq!(
            format_validation(&validation, OutputFormat::Text),
            "invalid: Query too short\n  - Please provide more details about your issue\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&format_validation(&validation, OutputFormat::Json))
                .unwrap_or_default();
        assert_eq!(json["valid"], false);
    }
}
