use crate::offense::Offense;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Rewrite of one line's leading whitespace.
///
/// Offsets refer to the buffer the offense was found in, never to a buffer that already had
/// other corrections applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// 1-based line number, for reporting.
    pub line: usize,
    /// Byte offset where the line starts.
    pub line_start: usize,
    /// Width of the blank run currently indenting the line.
    pub current_width: usize,
    /// Width the blank run must have afterwards.
    pub target_width: usize,
}

impl Correction {
    /// Saturates at `usize::MAX`; an unrepresentable range is never in bounds.
    pub fn range(&self) -> Range<usize> {
        self.line_start..self.line_start.saturating_add(self.current_width)
    }

    pub fn replacement(&self) -> String {
        " ".repeat(self.target_width)
    }

    pub fn overlaps(&self, other: &Correction) -> bool {
        let (a, b) = (self.range(), other.range());
        if a.is_empty() || b.is_empty() {
            return a.start == b.start;
        }
        a.start < b.end && b.start < a.end
    }
}

impl From<&Offense> for Correction {
    fn from(offense: &Offense) -> Self {
        Correction {
            line: offense.location.line,
            line_start: offense.indent.line_start,
            current_width: offense.indent.actual,
            target_width: offense.indent.expected(),
        }
    }
}
