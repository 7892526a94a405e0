//! Unwrapping of nested tool-result envelopes.
//!
//! Tool results arrive wrapped to varying depth: a structured-content
//! facet, a `data` facet, a singleton list around the real payload, or any
//! combination. [`unwrap`] peels layers until the value is no longer an
//! envelope.

use serde_json::Value;

/// Facet carrying structured tool output (MCP wire spelling).
const STRUCTURED_KEY: &str = "structuredContent";
/// Facet carrying structured tool output (snake_case spelling).
const STRUCTURED_KEY_SNAKE: &str = "structured_content";
/// Generic data facet.
const DATA_KEY: &str = "data";

/// One layer of a tool-result value.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A mapping with a non-empty structured-content facet.
    Structured(Value),
    /// A mapping with a non-empty `data` facet.
    Data(Value),
    /// A sequence of exactly one element.
    Singleton(Value),
    /// Anything else: the payload itself.
    Raw(Value),
}

impl Envelope {
    /// Classifies the outermost layer of `value`.
    ///
    /// The structured facet wins over `data` when both are present.
    #[must_use]
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                for key in [STRUCTURED_KEY, STRUCTURED_KEY_SNAKE] {
                    if map.get(key).is_some_and(is_non_empty)
                        && let Some(inner) = map.remove(key)
                    {
                        return Self::Structured(inner);
                    }
                }
                if map.get(DATA_KEY).is_some_and(is_non_empty)
                    && let Some(inner) = map.remove(DATA_KEY)
                {
                    return Self::Data(inner);
                }
                Self::Raw(Value::Object(map))
            }
            Value::Array(mut items) if items.len() == 1 => {
                Self::Singleton(items.pop().unwrap_or(Value::Null))
            }
            other => Self::Raw(other),
        }
    }
}

/// Reduces a possibly nested envelope to its innermost payload.
///
/// Never fails. Idempotent: the result classifies as [`Envelope::Raw`], so
/// unwrapping it again returns it unchanged.
#[must_use]
pub fn unwrap(value: Value) -> Value {
    let mut current = value;
    loop {
        match Envelope::classify(current) {
            Envelope::Structured(inner) | Envelope::Data(inner) | Envelope::Singleton(inner) => {
                current = inner;
            }
            Envelope::Raw(payload) => return payload,
        }
    }
}

/// Emptiness in the sense of a falsy container or scalar.
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}
