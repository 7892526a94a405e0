//! Source attribution helpers.

use std::collections::HashSet;

/// Strips any path-like prefix, keeping the trailing filename segment.
///
/// Both `/` and `\` count as separators. A trailing separator is ignored
/// so `docs/manuals/` displays as `manuals`.
#[must_use]
pub fn display_name(source: &str) -> &str {
    let trimmed = source.trim().trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(trimmed)
}

/// Normalizes and deduplicates sources, keeping first-seen order.
///
/// Empty identifiers are dropped.
#[must_use]
pub fn dedup_display_names<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .map(display_name)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Renders the attribution suffix, or `None` when there are no sources.
#[must_use]
pub fn attribution_line(sources: &[String]) -> Option<String> {
    if sources.is_empty() {
        None
    } else {
        Some(format!("Sources: {}", sources.join(", ")))
    }
}
