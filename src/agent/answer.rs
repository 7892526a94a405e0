//! The final answer handed back to the caller.

use serde::Serialize;

use crate::core::{Category, Route, attribution_line};

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Written by the language model.
    Generated,
    /// Assembled locally after the model call failed.
    Fallback,
    /// The workflow stopped on a domain error or unusable payload.
    Halted,
    /// Broad search found nothing.
    NoMatches,
    /// A protocol failure, rendered as a one-line diagnostic.
    Diagnostic,
}

impl AnswerKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
            Self::Halted => "halted",
            Self::NoMatches => "no_matches",
            Self::Diagnostic => "diagnostic",
        }
    }
}

/// Agent response for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// Workflow the query went through.
    pub route: Route,
    /// How the text was produced.
    pub kind: AnswerKind,
    /// Category resolved by the classifier, for support queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Deduplicated display names of the sources behind the answer.
    pub sources: Vec<String>,
    /// Final text, attribution suffix included.
    pub text: String,
}

impl Answer {
    /// Builds an answer from a body and its sources, appending attribution.
    #[must_use]
    pub fn with_sources(route: Route, kind: AnswerKind, body: &str, sources: Vec<String>) -> Self {
        let text = match attribution_line(&sources) {
            Some(line) => format!("{}\n\n{line}", body.trim_end()),
            None => body.trim_end().to_string(),
        };
        Self {
            route,
            kind,
            category: None,
            sources,
            text,
        }
    }

    /// Builds a source-less answer.
    #[must_use]
    pub fn plain(route: Route, kind: AnswerKind, text: impl Into<String>) -> Self {
        Self {
            route,
            kind,
            category: None,
            sources: Vec::new(),
            text: text.into(),
        }
    }

    /// Builds a diagnostic answer, collapsing `message` onto one line.
    #[must_use]
    pub fn diagnostic(route: Route, message: &str) -> Self {
        let text = message.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::plain(route, AnswerKind::Diagnostic, text)
    }

    /// Attaches the resolved category.
    #[must_use]
    pub const fn in_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
