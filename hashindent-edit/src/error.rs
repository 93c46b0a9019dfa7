//! Error types for hashindent-edit.
//!
//! This module defines error types that distinguish between:
//! - Refused edits (exit code 2): stale buffer, out-of-bounds range, overlapping ranges
//! - Runtime errors (exit code 1): I/O errors, invalid arguments

use thiserror::Error;

/// The top-level error type for hashindent-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// An edit was refused (exit code 2). The source is left untouched.
    #[error("refused edit: {0}")]
    Refused(#[from] RefusedEdit),

    /// A runtime/tool error occurred (exit code 1).
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

/// Why a correction was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefusedEdit {
    /// The buffer changed since the corrections were computed.
    #[error("precondition mismatch: expected sha256 {expected}, got {actual}")]
    PreconditionMismatch { expected: String, actual: String },

    /// The replacement range falls outside the buffer.
    #[error("line {line}: range {start}..{end} is outside the buffer ({len} bytes)")]
    OutOfBounds {
        line: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// The replacement range contains something other than blanks.
    #[error("line {line}: range {start}..{end} is not leading whitespace")]
    NotBlank {
        line: usize,
        start: usize,
        end: usize,
    },

    /// Another correction already rewrites this range.
    #[error("line {line}: overlaps the correction for line {other_line}")]
    Overlap { line: usize, other_line: usize },
}

impl EditError {
    /// Returns true if this is a refused edit (exit code 2).
    pub fn is_refused(&self) -> bool {
        matches!(self, EditError::Refused(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::Refused(_) => 2,
            EditError::Runtime(_) => 1,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::{EditError, RefusedEdit};

    #[test]
    fn refused_edit_reports_exit_code_2() {
        let err = EditError::from(RefusedEdit::PreconditionMismatch {
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        });
        assert!(err.is_refused());
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("refused edit"));
    }

    #[test]
    fn runtime_error_reports_exit_code_1() {
        let err = EditError::from(anyhow::anyhow!("boom"));
        assert!(!err.is_refused());
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("runtime error"));
    }

    #[test]
    fn refusal_display_includes_location() {
        let err = RefusedEdit::Overlap {
            line: 4,
            other_line: 3,
        };
        assert!(err.to_string().contains("line 4"));
        assert!(err.to_string().contains("line 3"));
    }
}
