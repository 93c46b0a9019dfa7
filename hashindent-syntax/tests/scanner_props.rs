//! Property tests for the hash scanner.

use hashindent_syntax::{SourceFile, scan_hashes};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(|k| format!("{k}: ")),
        "[a-z][a-z0-9_]{0,6}".prop_map(|k| format!(":{k} => ")),
        "[a-z]{1,6}".prop_map(|k| format!("\"{k}\" => ")),
    ]
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}".prop_map(|v| v),
        "[a-z]{1,6}".prop_map(|v| format!("'{v}'")),
        Just("nil".to_string()),
        "[a-z]{1,6}".prop_map(|v| format!("[{v}, 1]")),
    ]
}

fn pairs() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec((key(), value()).prop_map(|(k, v)| format!("{k}{v}")), 1..5)
}

proptest! {
    #[test]
    fn multi_line_hash_yields_every_pair(pairs in pairs(), indent in 0usize..8) {
        let mut lines = vec!["x = {".to_string()];
        let last = pairs.len() - 1;
        for (i, pair) in pairs.iter().enumerate() {
            let comma = if i == last { "" } else { "," };
            lines.push(format!("{}{pair}{comma}", " ".repeat(indent)));
        }
        lines.push("}".to_string());
        let src = SourceFile::new(lines.join("\n"));

        let hashes = scan_hashes(&src);
        prop_assert_eq!(hashes.len(), 1);
        let hash = &hashes[0];
        prop_assert!(!hash.is_braceless());
        prop_assert!(!hash.is_single_line());
        prop_assert_eq!(hash.pairs.len(), pairs.len());
        for (i, (node, text)) in hash.pairs.iter().zip(&pairs).enumerate() {
            prop_assert_eq!(&src.text()[node.start..node.end], text.as_str());
            prop_assert_eq!(node.line, i + 2);
            prop_assert_eq!(node.column, indent);
        }
    }

    #[test]
    fn single_line_hash_is_single_line(pairs in pairs()) {
        let src = SourceFile::new(format!("x = {{ {} }}", pairs.join(", ")));
        let hashes = scan_hashes(&src);
        prop_assert_eq!(hashes.len(), 1);
        prop_assert!(hashes[0].is_single_line());
    }

    #[test]
    fn scanning_arbitrary_text_does_not_panic(text in "[ -~\n]{0,200}") {
        let src = SourceFile::new(text);
        for hash in scan_hashes(&src) {
            for pair in &hash.pairs {
                prop_assert!(pair.start <= pair.end);
                prop_assert!(pair.end <= src.text().len());
            }
        }
    }
}
