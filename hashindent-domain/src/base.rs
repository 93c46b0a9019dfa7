//! Base column resolution.

use hashindent_syntax::{Enclosing, HashLiteral, SourceFile};
use hashindent_types::context::HashContext;
use hashindent_types::style::EnforcedStyle;

/// Positions a base column can be measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    /// First non-blank column on the left brace's line.
    pub brace_line_indent: usize,
    /// Column of the enclosing call's left parenthesis, if there is one.
    pub left_paren_column: Option<usize>,
}

impl Anchors {
    pub fn of(source: &SourceFile, hash: &HashLiteral) -> Self {
        let brace_line_indent = hash
            .braces
            .and_then(|b| source.indentation(b.open.line))
            .unwrap_or(0);
        let left_paren_column = match hash.enclosing {
            Enclosing::Argument {
                left_paren: Some(paren),
            } => Some(paren.column),
            _ => None,
        };
        Self {
            brace_line_indent,
            left_paren_column,
        }
    }
}

/// What the base column is relative to. Selects the offense message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    LineStart,
    LeftParen,
}

impl Reference {
    pub fn description(self) -> &'static str {
        match self {
            Reference::LineStart => "the start of the line where the left curly brace is",
            Reference::LeftParen => "the first position after the preceding left parenthesis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base {
    pub column: usize,
    pub reference: Reference,
}

/// Base column for `context` under `style`.
///
/// Only a leading parenthesized argument under `special_inside_parentheses` is measured from
/// the left parenthesis. Every other combination uses the brace line's indentation.
pub fn resolve(context: HashContext, style: EnforcedStyle, anchors: &Anchors) -> Base {
    match (context, style, anchors.left_paren_column) {
        (
            HashContext::ArgWithParensLeading,
            EnforcedStyle::SpecialInsideParentheses,
            Some(paren),
        ) => Base {
            column: paren + 1,
            reference: Reference::LeftParen,
        },
        _ => Base {
            column: anchors.brace_line_indent,
            reference: Reference::LineStart,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHORS: Anchors = Anchors {
        brace_line_indent: 3,
        left_paren_column: Some(10),
    };

    #[test]
    fn table() {
        for context in [
            HashContext::StatementLevel,
            HashContext::ArgWithParensNested,
            HashContext::ArgWithoutParens,
        ] {
            for style in EnforcedStyle::ALL {
                assert_eq!(
                    resolve(context, style, &ANCHORS),
                    Base {
                        column: 3,
                        reference: Reference::LineStart
                    },
                    "{context:?} / {style}"
                );
            }
        }

        let leading = HashContext::ArgWithParensLeading;
        assert_eq!(
            resolve(leading, EnforcedStyle::Consistent, &ANCHORS).column,
            3
        );
        assert_eq!(
            resolve(leading, EnforcedStyle::SpecialInsideParentheses, &ANCHORS),
            Base {
                column: 11,
                reference: Reference::LeftParen
            }
        );
    }

    #[test]
    fn leading_without_paren_falls_back_to_line_start() {
        let anchors = Anchors {
            brace_line_indent: 4,
            left_paren_column: None,
        };
        let base = resolve(
            HashContext::ArgWithParensLeading,
            EnforcedStyle::SpecialInsideParentheses,
            &anchors,
        );
        assert_eq!(base.column, 4);
        assert_eq!(base.reference, Reference::LineStart);
    }
}
