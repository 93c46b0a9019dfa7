use crate::context::HashContext;
use crate::style::EnforcedStyle;
use serde::{Deserialize, Serialize};

/// Where an offense starts and which bytes it highlights.
///
/// `line` is 1-based, `column` is 0-based (character count from the start of the line).
/// `start..end` is the byte range of the highlighted text in the original buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offense {
    pub rule: String,
    pub location: Location,
    pub message: String,
    pub highlight: String,
    pub indent: IndentFacts,
}

/// Structural facts the checker derived for the offending hash.
///
/// Config suggestion and correction are computed from these alone, so both work against the
/// original buffer after the node itself is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentFacts {
    pub context: HashContext,
    pub style: EnforcedStyle,
    /// Base column under the configured style.
    pub base: usize,
    /// Base column the other style would have used.
    pub other_base: usize,
    /// Indentation of the first pair's line.
    pub actual: usize,
    /// Byte offset where the first pair's line starts.
    pub line_start: usize,
}

impl IndentFacts {
    pub fn expected(&self) -> usize {
        self.base + crate::INDENTATION_WIDTH
    }

    pub fn expected_under_other_style(&self) -> usize {
        self.other_base + crate::INDENTATION_WIDTH
    }
}
