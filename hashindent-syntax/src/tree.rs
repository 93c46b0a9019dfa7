//! Nodes produced by the hash scanner.

/// Position of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRef {
    /// Index in the token stream of the file.
    pub index: usize,
    /// Byte offset.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Braces {
    pub open: TokenRef,
    pub close: TokenRef,
}

/// Source range of one key-value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairNode {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

/// The construct a hash literal appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enclosing {
    /// Operand of a binary operator, e.g. `a << {`.
    Operand,
    /// Right-hand side of an assignment.
    Assignment,
    /// Argument of a method call. `left_paren` is the call's `(` when the arguments are
    /// parenthesized.
    Argument { left_paren: Option<TokenRef> },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLiteral {
    /// `None` for braceless call arguments and for hashes whose closing brace is missing.
    pub braces: Option<Braces>,
    pub pairs: Vec<PairNode>,
    pub enclosing: Enclosing,
}

impl HashLiteral {
    pub fn is_braceless(&self) -> bool {
        self.braces.is_none()
    }

    pub fn is_single_line(&self) -> bool {
        self.braces
            .is_some_and(|braces| braces.open.line == braces.close.line)
    }

    pub fn first_pair(&self) -> Option<&PairNode> {
        self.pairs.first()
    }

    /// Byte offset used to order hashes within a file.
    pub fn offset(&self) -> usize {
        match (self.braces, self.pairs.first()) {
            (Some(braces), _) => braces.open.offset,
            (None, Some(pair)) => pair.start,
            (None, None) => 0,
        }
    }
}
