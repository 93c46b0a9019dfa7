//! Property-based tests for the indent-hash rule.
//!
//! These tests verify that:
//! - Single-line, empty and braceless hashes never offend
//! - A first pair on the brace line is never checked
//! - Autocorrect is idempotent
//! - A suggested style switch silences the offense on the uncorrected buffer

use hashindent_domain::{Inspector, InspectorConfig};
use hashindent_edit::autocorrect;
use hashindent_syntax::SourceFile;
use hashindent_types::patch::ConfigPatch;
use hashindent_types::style::EnforcedStyle;
use proptest::prelude::*;

fn inspector(style: EnforcedStyle) -> Inspector {
    Inspector::new(InspectorConfig {
        enabled: true,
        style,
    })
}

fn arb_style() -> impl Strategy<Value = EnforcedStyle> {
    prop_oneof![
        Just(EnforcedStyle::SpecialInsideParentheses),
        Just(EnforcedStyle::Consistent),
    ]
}

fn arb_pairs() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        ("[a-z][a-z0-9_]{0,5}", "[0-9]{1,3}").prop_map(|(k, v)| format!("{k}: {v}")),
        1..4,
    )
}

/// A multi-line hash in one of several syntactic positions.
fn hash_in_context(ctx: usize, outer: usize, pair_indent: usize, pairs: &[String]) -> String {
    let o = " ".repeat(outer);
    let body: Vec<String> = pairs
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let comma = if i + 1 == pairs.len() { "" } else { "," };
            format!("{}{p}{comma}", " ".repeat(pair_indent))
        })
        .collect();
    let (open, close): (Vec<String>, Vec<String>) = match ctx {
        0 => (vec![format!("{o}a << {{")], vec![format!("{o}}}")]),
        1 => (vec![format!("{o}a = {{")], vec![format!("{o}}}")]),
        2 => (vec![format!("{o}func({{")], vec![format!("{o}}})")]),
        3 => (vec![format!("{o}func x, {{")], vec![format!("{o}}}")]),
        4 => (
            vec![format!("{o}scope.where("), format!("{o}  k => {{")],
            vec![format!("{o}  }}"), format!("{o})")],
        ),
        _ => (vec![format!("{o}foo.bar(1, {{")], vec![format!("{o}}})")]),
    };
    open.into_iter()
        .chain(body)
        .chain(close)
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn single_line_hashes_never_offend(
        ctx in 0usize..6,
        pairs in arb_pairs(),
        style in arb_style(),
    ) {
        let prefix = ["a << ", "a = ", "func(", "func x, ", "scope.where(k => ", "foo.bar(1, "][ctx];
        let suffix = if matches!(ctx, 2 | 4 | 5) { ")" } else { "" };
        let text = format!("{prefix}{{ {} }}{suffix}", pairs.join(", "));
        prop_assert!(inspector(style).inspect_source(&SourceFile::new(text)).is_empty());
    }

    #[test]
    fn empty_and_braceless_hashes_never_offend(
        pairs in arb_pairs(),
        indent in 0usize..12,
        style in arb_style(),
    ) {
        let braceless = format!("func {}", pairs.join(&format!(",\n{}", " ".repeat(indent))));
        prop_assert!(inspector(style).inspect_source(&SourceFile::new(braceless)).is_empty());

        let empty = format!("a = {{\n{}}}", " ".repeat(indent));
        prop_assert!(inspector(style).inspect_source(&SourceFile::new(empty)).is_empty());
    }

    #[test]
    fn first_pair_on_brace_line_is_never_checked(
        pairs in arb_pairs(),
        indent in 0usize..12,
        style in arb_style(),
    ) {
        let rest = pairs
            .iter()
            .map(|p| format!("{}{p}", " ".repeat(indent)))
            .collect::<Vec<_>>()
            .join(",\n");
        let text = format!("a = {{ first: 1,\n{rest} }}");
        prop_assert!(inspector(style).inspect_source(&SourceFile::new(text)).is_empty());
    }

    #[test]
    fn autocorrect_is_idempotent(
        ctx in 0usize..6,
        outer in 0usize..4,
        pair_indent in 0usize..12,
        pairs in arb_pairs(),
        style in arb_style(),
    ) {
        let text = hash_in_context(ctx, outer, pair_indent, &pairs);
        let inspector = inspector(style);
        let found = inspector.inspect_source(&SourceFile::new(text.clone()));
        prop_assert!(found.len() <= 1);

        let fixed = found
            .iter()
            .rev()
            .fold(text, |buffer, offense| autocorrect(&buffer, offense));
        prop_assert!(inspector.inspect_source(&SourceFile::new(fixed.clone())).is_empty());

        let again = inspector
            .inspect_source(&SourceFile::new(fixed.clone()))
            .iter()
            .fold(fixed.clone(), |buffer, offense| autocorrect(&buffer, offense));
        prop_assert_eq!(again, fixed);
    }

    #[test]
    fn suggested_style_silences_the_original_buffer(
        ctx in 0usize..6,
        outer in 0usize..4,
        pair_indent in 0usize..12,
        pairs in arb_pairs(),
        style in arb_style(),
    ) {
        let text = hash_in_context(ctx, outer, pair_indent, &pairs);
        let configured = inspector(style);
        for offense in configured.inspect_source(&SourceFile::new(text.clone())) {
            if let ConfigPatch::EnforcedStyle(other) = configured.suggested_config(&offense) {
                prop_assert_ne!(other, style);
                let switched = inspector(other).inspect_source(&SourceFile::new(text.clone()));
                prop_assert!(switched.is_empty());
            }
        }
    }
}
