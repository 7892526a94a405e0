//! Deterministic answers used when the model call fails.
//!
//! Built only from data the workflow already retrieved, so they cannot fail.

use std::fmt::Write;

use crate::core::Category;
use crate::mcp::SearchMatch;

/// Maximum characters of retrieved knowledge quoted in a support fallback.
pub const SUPPORT_EXCERPT_CHARS: usize = 500;
/// Maximum matches echoed in an exploratory fallback.
pub const EXPLORATORY_MAX_MATCHES: usize = 3;
/// Maximum characters quoted per match in an exploratory fallback.
pub const EXPLORATORY_EXCERPT_CHARS: usize = 300;

/// Suggestion shown when there is nothing to quote.
pub const ESCALATION_SUGGESTION: &str = "I couldn't find specific documentation for this issue. \
Please contact our support team so a specialist can help you directly.";

/// Truncates to `max_chars` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

/// Fallback for the classification workflow.
///
/// `knowledge` is `None` when retrieval found nothing usable.
#[must_use]
pub fn support_fallback(category: Category, description: &str, knowledge: Option<&str>) -> String {
    let mut text = format!("**{}**", category.title());
    if !description.trim().is_empty() {
        let _ = write!(text, "\n\n{}", description.trim());
    }

    match knowledge.filter(|k| !k.trim().is_empty()) {
        Some(knowledge) => {
            let _ = write!(
                text,
                "\n\nBased on our documentation:\n\n{}\n\n\
                 If this doesn't resolve your issue, please contact our support team.",
                truncate_chars(knowledge, SUPPORT_EXCERPT_CHARS)
            );
        }
        None => {
            let _ = write!(text, "\n\n{ESCALATION_SUGGESTION}");
        }
    }
    text
}

/// Fallback for the exploratory workflow: echoes the top match excerpts.
#[must_use]
pub fn exploratory_fallback(matches: &[SearchMatch]) -> String {
    let mut text = String::from("Here's what I found in our documentation:");
    for (i, m) in matches
        .iter()
        .filter(|m| !m.document.trim().is_empty())
        .take(EXPLORATORY_MAX_MATCHES)
        .enumerate()
    {
        let _ = write!(
            text,
            "\n\n{}. {}",
            i + 1,
            truncate_chars(&m.document, EXPLORATORY_EXCERPT_CHARS)
        );
    }
    text
}
