//! Rule explanations for the `hashindent explain` command.
//!
//! Each entry pairs a builtin rule with its styles, offense messages and examples.

use hashindent_domain::base::Reference;
use hashindent_domain::{RuleMeta, builtin_rule_metas};
use hashindent_types::style::EnforcedStyle;

#[derive(Debug, Clone)]
pub struct RuleExplanation {
    /// Short key for the rule (user-facing, e.g., "indent-hash").
    pub key: &'static str,
    /// Name the rule reports offenses and reads configuration under.
    pub rule: &'static str,
    pub title: &'static str,
    /// What the rule checks and which hashes it skips.
    pub details: &'static str,
    pub styles: &'static [StyleExplanation],
}

#[derive(Debug, Clone)]
pub struct StyleExplanation {
    pub style: EnforcedStyle,
    pub meaning: &'static str,
    pub good: &'static str,
    pub bad: &'static str,
}

pub static RULE_REGISTRY: &[RuleExplanation] = &[RuleExplanation {
    key: "indent-hash",
    rule: hashindent_types::RULE_NAME,
    title: "Indentation of the first pair in a hash",
    details: r#"Checks the first key-value pair of every hash literal whose left brace and
first pair are on different lines. The pair must be indented 2 columns past a
base column chosen by the hash's position and the enforced style.

Only the first pair is checked. Single-line hashes, empty hashes, hashes whose
first pair sits on the brace line, and braceless argument hashes are skipped.
Offenses can be corrected automatically by rewriting the first pair's leading
whitespace."#,
    styles: &[
        StyleExplanation {
            style: EnforcedStyle::SpecialInsideParentheses,
            meaning: "A hash whose left brace is on the same line as the left parenthesis of\n\
                      its method call is indented relative to the first position after\n\
                      that parenthesis. Every other hash is indented relative to the\n\
                      start of the line where the left curly brace is.",
            good: r#"special_inside_parens_method({
                               a: 1
                             })"#,
            bad: r#"special_inside_parens_method({
  a: 1
})"#,
        },
        StyleExplanation {
            style: EnforcedStyle::Consistent,
            meaning: "Every hash is indented relative to the start of the line where the\n\
                      left curly brace is.",
            good: r#"consistent_method({
  a: 1
})"#,
            bad: r#"consistent_method({
                    a: 1
                  })"#,
        },
    ],
}];

pub fn lookup_rule(query: &str) -> Option<&'static RuleExplanation> {
    let query_lower = query.to_lowercase();
    let query_normalized = query_lower.replace('_', "-");

    RULE_REGISTRY.iter().find(|entry| {
        entry.key == query_normalized
            || entry.rule.to_lowercase() == query_lower
            // Rule name without its department, e.g. "IndentHash".
            || entry
                .rule
                .rsplit('/')
                .next()
                .is_some_and(|name| name.to_lowercase() == query_lower)
    })
}

pub fn list_rule_keys() -> Vec<&'static str> {
    RULE_REGISTRY.iter().map(|e| e.key).collect()
}

/// Metadata of the builtin rule an explanation belongs to.
pub fn rule_meta(entry: &RuleExplanation) -> Option<RuleMeta> {
    builtin_rule_metas()
        .into_iter()
        .find(|meta| meta.name == entry.rule)
}

/// Offense messages, one per base column reference.
pub fn message_templates() -> Vec<String> {
    [Reference::LineStart, Reference::LeftParen]
        .into_iter()
        .map(hashindent_domain::check::message)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_key() {
        let entry = lookup_rule("indent-hash").expect("should find indent-hash");
        assert_eq!(entry.rule, "Style/IndentHash");
    }

    #[test]
    fn test_lookup_by_rule_name() {
        assert!(lookup_rule("Style/IndentHash").is_some());
        assert!(lookup_rule("style/indenthash").is_some());
        assert!(lookup_rule("IndentHash").is_some());
    }

    #[test]
    fn test_lookup_underscores() {
        assert!(lookup_rule("indent_hash").is_some());
        assert!(lookup_rule("INDENT_HASH").is_some());
    }

    #[test]
    fn test_unknown_rule() {
        assert!(lookup_rule("Layout/IndentArray").is_none());
    }

    #[test]
    fn test_every_builtin_rule_is_explained() {
        for meta in builtin_rule_metas() {
            let entry = lookup_rule(meta.name).expect("explanation for builtin rule");
            let explained: Vec<_> = entry.styles.iter().map(|s| s.style).collect();
            assert_eq!(explained, meta.supported_styles.to_vec());
        }
        for entry in RULE_REGISTRY {
            assert!(rule_meta(entry).is_some());
        }
    }

    #[test]
    fn test_message_templates() {
        let templates = message_templates();
        assert_eq!(templates.len(), 2);
        assert!(templates[0].ends_with("the line where the left curly brace is."));
        assert!(templates[1].ends_with("the preceding left parenthesis."));
    }
}
