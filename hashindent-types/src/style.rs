use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Enforced style for the first pair of a multi-line hash.
///
/// - special_inside_parentheses: a hash whose left brace opens a parenthesized argument list is
///   indented relative to the first position after the left parenthesis
/// - consistent: every hash is indented relative to the start of the left brace's line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcedStyle {
    #[default]
    SpecialInsideParentheses,
    Consistent,
}

impl EnforcedStyle {
    pub const ALL: [EnforcedStyle; 2] = [
        EnforcedStyle::SpecialInsideParentheses,
        EnforcedStyle::Consistent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnforcedStyle::SpecialInsideParentheses => "special_inside_parentheses",
            EnforcedStyle::Consistent => "consistent",
        }
    }

    /// The style a configuration patch would switch to.
    pub fn other(self) -> Self {
        match self {
            EnforcedStyle::SpecialInsideParentheses => EnforcedStyle::Consistent,
            EnforcedStyle::Consistent => EnforcedStyle::SpecialInsideParentheses,
        }
    }
}

impl fmt::Display for EnforcedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown EnforcedStyle '{0}' (supported: special_inside_parentheses, consistent)")]
pub struct UnknownStyleError(pub String);

impl FromStr for EnforcedStyle {
    type Err = UnknownStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnforcedStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s.trim())
            .ok_or_else(|| UnknownStyleError(s.to_string()))
    }
}
