//! Shared DTOs (schemas-as-code) for the hashindent workspace.
//!
//! # Design constraints
//! - These types are serialized into JSON reports and YAML config snippets.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod context;
pub mod correction;
pub mod offense;
pub mod patch;
pub mod report;
pub mod style;

/// Name under which the rule reports offenses and reads its configuration.
pub const RULE_NAME: &str = "Style/IndentHash";

/// Columns the first pair must be indented past the base column.
pub const INDENTATION_WIDTH: usize = 2;

/// Schema identifiers.
pub mod schema {
    pub const HASHINDENT_REPORT_V1: &str = "hashindent.report.v1";
}
