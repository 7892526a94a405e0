//! Canonical support categories.
//!
//! The remote classifier answers with one of these names. Anything else
//! aborts the classification workflow.

use serde::{Deserialize, Serialize};

/// A canonical support-query class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Passwords, logins, two-factor, compromised accounts.
    AccountSecurity,
    /// Devices that fail to power on, connect, or behave.
    DeviceTroubleshooting,
    /// Returns, refunds, exchanges, warranty claims.
    ReturnsRefunds,
    /// Orders, shipping, billing and everything else.
    GeneralSupport,
}

impl Category {
    /// All canonical categories, in catalog order.
    pub const ALL: [Self; 4] = [
        Self::AccountSecurity,
        Self::DeviceTroubleshooting,
        Self::ReturnsRefunds,
        Self::GeneralSupport,
    ];

    /// Parses a canonical name as sent by the classifier.
    ///
    /// Matching is exact after trimming; the classifier speaks in
    /// snake_case identifiers, not prose.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "account_security" => Some(Self::AccountSecurity),
            "device_troubleshooting" => Some(Self::DeviceTroubleshooting),
            "returns_refunds" => Some(Self::ReturnsRefunds),
            "general_support" => Some(Self::GeneralSupport),
            _ => None,
        }
    }

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountSecurity => "account_security",
            Self::DeviceTroubleshooting => "device_troubleshooting",
            Self::ReturnsRefunds => "returns_refunds",
            Self::GeneralSupport => "general_support",
        }
    }

    /// Human-readable title used in fallback answers.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::AccountSecurity => "Account Security",
            Self::DeviceTroubleshooting => "Device Troubleshooting",
            Self::ReturnsRefunds => "Returns Refunds",
            Self::GeneralSupport => "General Support",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_category() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert_eq!(Category::parse("billing_disputes"), None);
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("Account Security"), None);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            Category::parse("  returns_refunds\n"),
            Some(Category::ReturnsRefunds)
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Category::DeviceTroubleshooting).unwrap_or_default();
        assert_eq!(json, "\"device_troubleshooting\"");
    }
}
