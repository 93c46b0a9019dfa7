//! Edit engine for hashindent corrections.
//!
//! Responsibilities:
//! - Rewrite the leading whitespace of offending lines, computed against the original buffer.
//! - Refuse stale, out-of-bounds, non-blank and overlapping edits instead of corrupting text.
//! - Apply corrections to disk, or render a unified diff preview.

pub mod error;

pub use error::{EditError, EditResult, RefusedEdit};

use anyhow::Context;
use camino::Utf8PathBuf;
use diffy::PatchFormatter;
use fs_err as fs;
use hashindent_types::correction::Correction;
use hashindent_types::offense::Offense;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCorrection {
    pub correction: Correction,
    pub reason: RefusedEdit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutcome {
    pub text: String,
    pub applied: Vec<Correction>,
    pub skipped: Vec<SkippedCorrection>,
}

/// Corrects the line of a single offense. Returns `source` unchanged when the correction is
/// refused.
pub fn autocorrect(source: &str, offense: &Offense) -> String {
    apply_corrections(source, &[Correction::from(offense)]).text
}

/// Applies `corrections` to `source`.
///
/// Every correction must refer to offsets in `source` itself. Of two overlapping corrections
/// only the first (by offset) is applied. Edits are applied back to front so earlier offsets stay
/// valid.
pub fn apply_corrections(source: &str, corrections: &[Correction]) -> CorrectionOutcome {
    let mut sorted = corrections.to_vec();
    sorted.sort_by_key(|c| (c.line_start, c.current_width, c.target_width, c.line));

    let mut applied: Vec<Correction> = Vec::new();
    let mut skipped = Vec::new();
    for correction in sorted {
        if let Err(reason) = validate(source, &correction) {
            warn!(line = correction.line, %reason, "correction refused");
            skipped.push(SkippedCorrection { correction, reason });
            continue;
        }
        if let Some(prev) = applied.iter().find(|prev| prev.overlaps(&correction)) {
            let reason = RefusedEdit::Overlap {
                line: correction.line,
                other_line: prev.line,
            };
            warn!(line = correction.line, %reason, "correction refused");
            skipped.push(SkippedCorrection { correction, reason });
            continue;
        }
        applied.push(correction);
    }

    let mut text = source.to_string();
    for correction in applied.iter().rev() {
        text.replace_range(correction.range(), &correction.replacement());
    }

    debug!(
        applied = applied.len(),
        skipped = skipped.len(),
        "applied corrections"
    );
    CorrectionOutcome {
        text,
        applied,
        skipped,
    }
}

fn validate(source: &str, correction: &Correction) -> Result<(), RefusedEdit> {
    let bytes = source.as_bytes();
    let end = correction.line_start.checked_add(correction.current_width);
    let range = match end {
        Some(end) if end <= bytes.len() && source.is_char_boundary(correction.line_start) => {
            correction.line_start..end
        }
        _ => {
            return Err(RefusedEdit::OutOfBounds {
                line: correction.line,
                start: correction.line_start,
                end: end.unwrap_or(usize::MAX),
                len: bytes.len(),
            });
        }
    };
    let at_line_start = range.start == 0 || bytes[range.start - 1] == b'\n';
    let blank = bytes[range.clone()].iter().all(|b| matches!(b, b' ' | b'\t'));
    if !at_line_start || !blank {
        return Err(RefusedEdit::NotBlank {
            line: correction.line,
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

/// Result of correcting a buffer until no offense is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    pub text: String,
    /// Net whitespace changes, expressed against the original buffer.
    pub corrections: Vec<Correction>,
    /// Corrections applied across all passes.
    pub applied: usize,
    pub passes: usize,
    /// Offenses still reported after the last pass.
    pub remaining: usize,
}

/// Repeatedly inspects and corrects `source` until `inspect` reports nothing, no correction can
/// be applied, or `max_passes` is reached.
///
/// Fixing the first pair of an outer hash can shift the base of a hash nested on that line, so a
/// single pass is not always enough.
pub fn correct_until_stable<F>(source: &str, max_passes: usize, mut inspect: F) -> Convergence
where
    F: FnMut(&str) -> Vec<Offense>,
{
    let mut text = source.to_string();
    let mut applied = 0;
    let mut passes = 0;
    let mut remaining = inspect(&text);
    while !remaining.is_empty() && passes < max_passes {
        passes += 1;
        let corrections: Vec<Correction> = remaining.iter().map(Correction::from).collect();
        let outcome = apply_corrections(&text, &corrections);
        if outcome.applied.is_empty() {
            break;
        }
        applied += outcome.applied.len();
        text = outcome.text;
        remaining = inspect(&text);
    }

    if !remaining.is_empty() {
        warn!(remaining = remaining.len(), passes, "offenses left after correcting");
    }
    Convergence {
        corrections: indentation_changes(source, &text),
        text,
        applied,
        passes,
        remaining: remaining.len(),
    }
}

/// One correction per line whose leading blanks differ. Both buffers must have the same lines
/// apart from leading blanks.
fn indentation_changes(before: &str, after: &str) -> Vec<Correction> {
    let mut out = Vec::new();
    let mut line_start = 0;
    for (idx, (old, new)) in before.split('\n').zip(after.split('\n')).enumerate() {
        let current = leading_blanks(old);
        let target = leading_blanks(new);
        if old[..current] != new[..target] {
            out.push(Correction {
                line: idx + 1,
                line_start,
                current_width: current,
                target_width: target,
            });
        }
        line_start += old.len() + 1;
    }
    out
}

fn leading_blanks(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Corrections computed for one buffer, pinned to that buffer's sha256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionBatch {
    pub sha256: String,
    pub corrections: Vec<Correction>,
}

impl CorrectionBatch {
    pub fn new(source: &str, offenses: &[Offense]) -> Self {
        Self::from_corrections(source, offenses.iter().map(Correction::from).collect())
    }

    pub fn from_corrections(source: &str, corrections: Vec<Correction>) -> Self {
        Self {
            sha256: sha256_hex(source.as_bytes()),
            corrections,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Applies the batch to `current`, which must be the buffer the batch was computed from.
    pub fn apply(&self, current: &str) -> EditResult<CorrectionOutcome> {
        let actual = sha256_hex(current.as_bytes());
        if actual != self.sha256 {
            return Err(RefusedEdit::PreconditionMismatch {
                expected: self.sha256.clone(),
                actual,
            }
            .into());
        }
        Ok(apply_corrections(current, &self.corrections))
    }
}

/// Corrections for one file on disk.
#[derive(Debug, Clone)]
pub struct FileFix {
    pub path: Utf8PathBuf,
    /// Path used in diffs and reports.
    pub display_path: String,
    pub batch: CorrectionBatch,
}

#[derive(Debug, Clone)]
pub struct FileFixOutcome {
    pub display_path: String,
    pub before: String,
    pub outcome: CorrectionOutcome,
    pub written: bool,
}

impl FileFixOutcome {
    pub fn changed(&self) -> bool {
        self.before != self.outcome.text
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixRun {
    pub files: Vec<FileFixOutcome>,
    pub patch: String,
}

impl FixRun {
    pub fn applied(&self) -> usize {
        self.files.iter().map(|f| f.outcome.applied.len()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.files.iter().map(|f| f.outcome.skipped.len()).sum()
    }
}

/// Applies every file's batch. When `opts.dry_run` is true, no files are written, but outcomes
/// and a patch are still produced.
///
/// Fails with a refused edit if any file changed since its batch was computed; no file is written
/// in that case.
pub fn apply_fixes(fixes: &[FileFix], opts: &ApplyOptions) -> EditResult<FixRun> {
    let mut files = Vec::new();
    for fix in fixes {
        let before = fs::read_to_string(&fix.path)
            .with_context(|| format!("read {}", fix.path))?;
        let outcome = fix.batch.apply(&before)?;
        let file = FileFixOutcome {
            display_path: fix.display_path.clone(),
            before,
            outcome,
            written: false,
        };
        files.push((fix, file));
    }

    if !opts.dry_run {
        // Write only changed files.
        for (fix, file) in files.iter_mut() {
            if !file.changed() {
                continue;
            }
            fs::write(&fix.path, &file.outcome.text)
                .with_context(|| format!("write {}", fix.path))?;
            file.written = true;
        }
    }

    let files: Vec<FileFixOutcome> = files.into_iter().map(|(_, file)| file).collect();
    let patch = render_patch(
        files
            .iter()
            .map(|f| (f.display_path.as_str(), f.before.as_str(), f.outcome.text.as_str())),
    );
    Ok(FixRun { files, patch })
}

/// Unified diff of every `(path, before, after)` entry that changed.
pub fn render_patch<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for (path, old, new) in entries {
        if old == new {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

        let patch = diffy::create_patch(old, new);
        let rendered = formatter.fmt_patch(&patch).to_string();
        // diffy repeats the ---/+++ header; keep only the hunks.
        let hunks = rendered
            .find("\n@@")
            .map(|idx| &rendered[idx + 1..])
            .unwrap_or(rendered.as_str());
        out.push_str(hunks);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correction(line: usize, line_start: usize, current: usize, target: usize) -> Correction {
        Correction {
            line,
            line_start,
            current_width: current,
            target_width: target,
        }
    }

    #[test]
    fn rewrites_only_the_leading_blanks() {
        let src = "a = {\n    a: 1,\n  b: 2,\n c: 3\n}";
        let out = apply_corrections(src, &[correction(2, 6, 4, 2)]);
        assert_eq!(out.text, "a = {\n  a: 1,\n  b: 2,\n c: 3\n}");
        assert_eq!(out.applied.len(), 1);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn out_of_bounds_is_refused() {
        let src = "a = {\n a: 1\n}";
        let out = apply_corrections(src, &[correction(2, 100, 1, 2)]);
        assert_eq!(out.text, src);
        assert!(matches!(
            out.skipped[0].reason,
            RefusedEdit::OutOfBounds { .. }
        ));
    }

    #[test]
    fn huge_line_start_is_refused() {
        let src = "a = {\n a: 1\n}";
        let huge = correction(2, usize::MAX, 4, 2);
        let out = apply_corrections(src, &[huge, correction(2, 6, 1, 2)]);
        assert_eq!(out.text, "a = {\n  a: 1\n}");
        assert_eq!(out.applied.len(), 1);
        assert_eq!(
            out.skipped[0].reason,
            RefusedEdit::OutOfBounds {
                line: 2,
                start: usize::MAX,
                end: usize::MAX,
                len: src.len(),
            }
        );

        let alone = apply_corrections(src, &[huge]);
        assert_eq!(alone.text, src);
    }

    #[test]
    fn non_blank_range_is_refused() {
        let src = "a = {\n a: 1\n}";
        let out = apply_corrections(src, &[correction(2, 6, 3, 2)]);
        assert_eq!(out.text, src);
        assert!(matches!(out.skipped[0].reason, RefusedEdit::NotBlank { .. }));

        // Not at the start of a line.
        let out = apply_corrections(src, &[correction(1, 1, 1, 2)]);
        assert!(matches!(out.skipped[0].reason, RefusedEdit::NotBlank { .. }));
    }

    #[test]
    fn overlapping_corrections_apply_at_most_one() {
        let src = "x = {\n    a: 1\n}";
        let out = apply_corrections(src, &[correction(2, 6, 4, 2), correction(2, 6, 4, 6)]);
        assert_eq!(out.applied.len(), 1);
        assert_eq!(out.skipped.len(), 1);
        assert!(matches!(out.skipped[0].reason, RefusedEdit::Overlap { .. }));
        assert_eq!(out.text, "x = {\n  a: 1\n}");
    }

    #[test]
    fn corrections_use_original_offsets() {
        let src = "a = {\n a: 1\n}\nb = {\n     b: 2\n}";
        let out = apply_corrections(src, &[correction(5, 20, 5, 2), correction(2, 6, 1, 2)]);
        assert_eq!(out.text, "a = {\n  a: 1\n}\nb = {\n  b: 2\n}");
        assert_eq!(out.applied.iter().map(|c| c.line).collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn indentation_changes_are_relative_to_the_original() {
        let before = "a = {\n b: {\n   c: 1\n }\n}";
        let after = "a = {\n  b: {\n      c: 1\n }\n}";
        assert_eq!(
            indentation_changes(before, after),
            vec![correction(2, 6, 1, 2), correction(3, 12, 3, 6)]
        );

        let out = apply_corrections(before, &indentation_changes(before, after));
        assert_eq!(out.text, after);
    }

    #[test]
    fn tabs_replaced_by_spaces_count_as_a_change() {
        assert_eq!(
            indentation_changes("x\n\ty", "x\n y"),
            vec![correction(2, 2, 1, 1)]
        );
    }

    #[test]
    fn batch_refuses_stale_buffer() {
        let src = "a << {\n a: 1\n}";
        let batch = CorrectionBatch::from_corrections(src, vec![correction(2, 7, 1, 2)]);
        let err = batch.apply("a << {\n  a: 1\n}").unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let out = batch.apply(src).expect("apply");
        assert_eq!(out.text, "a << {\n  a: 1\n}");
    }

    #[test]
    fn patch_lists_only_changed_files() {
        let patch = render_patch([
            ("same.rb", "x\n", "x\n"),
            ("a.rb", "a = {\n a: 1\n}\n", "a = {\n  a: 1\n}\n"),
        ]);
        assert!(patch.starts_with("diff --git a/a.rb b/a.rb\n--- a/a.rb\n+++ b/a.rb\n@@"));
        assert!(patch.contains("- a: 1\n"));
        assert!(patch.contains("+  a: 1\n"));
        assert!(!patch.contains("same.rb"));
    }
}
