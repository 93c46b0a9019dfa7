use hashindent_syntax::{Enclosing, HashLiteral};
use hashindent_types::context::HashContext;

/// Syntactic context of a braced hash literal.
///
/// A hash inside a parenthesized argument list counts as leading when its left brace is on the
/// same line as the call's left parenthesis, which covers `func({` as well as a brace opened by
/// a later argument on that line. Hashes that belong to the argument list but open on a later
/// line are nested.
pub fn classify(hash: &HashLiteral) -> HashContext {
    match hash.enclosing {
        Enclosing::Argument {
            left_paren: Some(paren),
        } => match hash.braces {
            Some(braces) if braces.open.line == paren.line => HashContext::ArgWithParensLeading,
            _ => HashContext::ArgWithParensNested,
        },
        Enclosing::Argument { left_paren: None } => HashContext::ArgWithoutParens,
        Enclosing::Operand | Enclosing::Assignment | Enclosing::Other => {
            HashContext::StatementLevel
        }
    }
}
