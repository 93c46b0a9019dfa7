//! Domain logic: decide whether the first pair of a multi-line hash literal is indented where
//! the configured style expects it, and what to do about it when it is not.
//!
//! This crate owns *what* is wrong and which config change would allow it. It does not own *how*
//! source text is rewritten; that's the `hashindent-edit` crate.

pub mod base;
pub mod check;
pub mod classify;
mod inspector;
mod rule;
pub mod suggest;

pub use check::{Exemption, Verdict, check};
pub use classify::classify;
pub use inspector::{Inspector, InspectorConfig};
pub use rule::{IndentHash, Rule, RuleMeta, builtin_rule_metas, builtin_rules};
pub use suggest::{fold_suggestions, reconcile_with_accepted, suggested_config};
