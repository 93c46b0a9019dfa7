#![no_main]

//! Fuzz target for the scan -> inspect -> correct pipeline.
//!
//! Arbitrary text must never panic the lexer, scanner, rule or corrector, and corrections may
//! only ever touch leading whitespace.

use hashindent_domain::{Inspector, InspectorConfig};
use hashindent_edit::{apply_corrections, correct_until_stable};
use hashindent_syntax::{SourceFile, scan_hashes};
use hashindent_types::correction::Correction;
use hashindent_types::style::EnforcedStyle;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct PipelineInput {
    text: String,
    consistent: bool,
}

fuzz_target!(|input: PipelineInput| {
    let style = if input.consistent {
        EnforcedStyle::Consistent
    } else {
        EnforcedStyle::SpecialInsideParentheses
    };
    let inspector = Inspector::new(InspectorConfig {
        enabled: true,
        style,
    });

    let source = SourceFile::new(input.text.as_str());
    let _ = scan_hashes(&source);
    let offenses = inspector.inspect_source(&source);
    for offense in &offenses {
        let _ = inspector.suggested_config(offense);
    }

    let corrections: Vec<Correction> = offenses.iter().map(Correction::from).collect();
    let outcome = apply_corrections(&input.text, &corrections);
    assert_eq!(
        outcome.text.lines().count(),
        input.text.lines().count(),
        "corrections must not add or remove lines"
    );
    for (before, after) in input.text.lines().zip(outcome.text.lines()) {
        assert_eq!(before.trim_start(), after.trim_start());
    }

    let converged = correct_until_stable(&input.text, 4, |text| {
        inspector.inspect_source(&SourceFile::new(text))
    });
    let replayed = apply_corrections(&input.text, &converged.corrections);
    assert_eq!(replayed.text, converged.text);
});
