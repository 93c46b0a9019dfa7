use serde::{Deserialize, Serialize};

/// Syntactic position of a braced hash literal, as far as indentation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashContext {
    /// Operand, assignment right-hand side, pair value of a non-argument hash, etc.
    StatementLevel,
    /// Argument of a parenthesized call, opening right after the left parenthesis.
    ArgWithParensLeading,
    /// Argument of a parenthesized call that does not open the argument list.
    ArgWithParensNested,
    /// Argument of a call written without parentheses.
    ArgWithoutParens,
}

impl HashContext {
    /// The only context in which the two enforced styles disagree.
    pub fn styles_disagree(self) -> bool {
        matches!(self, HashContext::ArgWithParensLeading)
    }
}
