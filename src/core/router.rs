//! Intent routing: support request or exploratory question.
//!
//! Routing is a first-hit lookup with no scoring. Keywords from every
//! support group are tried first, then the help-seeking phrase patterns.
//! A query that trips neither is exploratory.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// The two workflows a query can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Classifiable support request.
    Support,
    /// Open-ended question answered by broad search.
    Exploratory,
}

impl Route {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Exploratory => "exploratory",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named keyword group in the routing catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordGroup {
    /// Keywords hinting at one support category.
    Support(Category),
    /// Keywords typical of open-ended questions.
    ///
    /// Skipped during matching: an exploratory keyword never routes a
    /// query anywhere, the fall-through does.
    Exploratory,
}

/// Keyword catalog, matched as lowercase substrings.
pub const KEYWORD_CATALOG: &[(KeywordGroup, &[&str])] = &[
    (
        KeywordGroup::Support(Category::AccountSecurity),
        &[
            "password",
            "login",
            "log in",
            "sign in",
            "locked out",
            "2fa",
            "two-factor",
            "two factor",
            "authentication",
            "hacked",
            "account access",
            "verification code",
        ],
    ),
    (
        KeywordGroup::Support(Category::DeviceTroubleshooting),
        &[
            "not working",
            "won't turn on",
            "wont turn on",
            "broken",
            "error",
            "crash",
            "frozen",
            "battery",
            "overheating",
            "bluetooth",
            "wifi",
            "wi-fi",
            "troubleshoot",
            "reboot",
            "firmware",
        ],
    ),
    (
        KeywordGroup::Support(Category::ReturnsRefunds),
        &[
            "return",
            "refund",
            "exchange",
            "warranty",
            "damaged",
            "money back",
            "replacement",
            "cancel my order",
        ],
    ),
    (
        KeywordGroup::Support(Category::GeneralSupport),
        &[
            "order status",
            "shipping",
            "tracking",
            "delivery",
            "invoice",
            "billing",
            "subscription",
            "contact support",
        ],
    ),
    (
        KeywordGroup::Exploratory,
        &[
            "tell me about",
            "what is",
            "what are",
            "explain",
            "overview",
            "compare",
            "features",
            "products",
        ],
    ),
];

/// Help-seeking phrase patterns, tried after the keyword catalog.
pub const HELP_PATTERNS: &[&str] = &[
    r"\bhow (do|can|should) i\b",
    r"\bcan you help\b",
    r"\bhelp me\b",
    r"\bi need help\b",
    r"\b(problem|issue|trouble) with\b",
    r"\bmy \w+ (is|isn't|isnt|won't|wont|doesn't|doesnt|can't|cant|keeps)\b",
    r"\bi (can't|cannot|cant) \w+",
    r"\bwhy (is|does|won't|isn't|doesn't) my\b",
    r"\b(stopped|stops) working\b",
];

static COMPILED_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    HELP_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok().map(|regex| (regex, *pattern)))
        .collect()
});

/// Returns `true` if the query should go through the classification workflow.
#[must_use]
pub fn is_support_query(query: &str) -> bool {
    let lowered = query.to_lowercase();
    matched_keyword(&lowered).is_some() || matched_pattern(&lowered).is_some()
}

/// Routes a query to one of the two workflows.
#[must_use]
pub fn route(query: &str) -> Route {
    if is_support_query(query) {
        Route::Support
    } else {
        Route::Exploratory
    }
}

/// Explains a routing decision: the rule that fired, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    /// Chosen route.
    pub route: Route,
    /// Keyword that matched, when routed by keyword.
    pub keyword: Option<&'static str>,
    /// Category owning the matched keyword.
    pub keyword_category: Option<Category>,
    /// Pattern that matched, when routed by phrasing.
    pub pattern: Option<&'static str>,
}

/// Routes a query and reports which rule decided it.
#[must_use]
pub fn explain(query: &str) -> RouteDecision {
    let lowered = query.to_lowercase();

    if let Some((category, keyword)) = matched_keyword(&lowered) {
        return RouteDecision {
            route: Route::Support,
            keyword: Some(keyword),
            keyword_category: Some(category),
            pattern: None,
        };
    }

    let pattern = matched_pattern(&lowered);
    RouteDecision {
        route: if pattern.is_some() {
            Route::Support
        } else {
            Route::Exploratory
        },
        keyword: None,
        keyword_category: None,
        pattern,
    }
}

fn matched_keyword(lowered: &str) -> Option<(Category, &'static str)> {
    KEYWORD_CATALOG.iter().find_map(|(group, keywords)| {
        let KeywordGroup::Support(category) = group else {
            return None;
        };
        keywords
            .iter()
            .find(|keyword| lowered.contains(**keyword))
            .map(|keyword| (*category, *keyword))
    })
}

fn matched_pattern(lowered: &str) -> Option<&'static str> {
    COMPILED_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(lowered))
        .map(|(_, pattern)| *pattern)
}
