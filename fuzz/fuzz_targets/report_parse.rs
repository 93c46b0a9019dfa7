#![no_main]

//! Fuzz target for report, correction and config patch deserialization.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(report) = serde_json::from_str::<hashindent_types::report::IndentReport>(s) {
        let _ = serde_json::to_string(&report);
        let _ = report.status();
    }

    let _ = serde_json::from_str::<hashindent_types::patch::ConfigPatch>(s);
    let _ = serde_json::from_str::<hashindent_types::correction::Correction>(s);
    let _ = serde_json::from_str::<hashindent_edit::CorrectionBatch>(s);
    let _ = serde_json::from_str::<hashindent_types::offense::Offense>(s);
});
