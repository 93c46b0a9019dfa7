//! Rendering helpers for human-readable output: offense lines, markdown summaries and the
//! config snippet that allows existing offenses.

use anyhow::Context;
use hashindent_types::RULE_NAME;
use hashindent_types::patch::ConfigPatch;
use hashindent_types::report::{IndentReport, ReportOffense, ReportStatus, ReportSummary};
use std::collections::BTreeMap;

/// One offense in the `path:line:col: C: rule: message` form, followed by the offending source
/// line and a caret underline of the highlighted text.
pub fn render_offense_text(path: &str, offense: &ReportOffense, line_text: &str) -> String {
    let mut out = format!(
        "{}:{}:{}: C: {}: {}\n",
        path, offense.line, offense.column, offense.rule, offense.message
    );
    out.push_str(line_text);
    out.push('\n');

    // Keep tabs so the carets line up with the source line.
    let pad: String = line_text
        .chars()
        .take(offense.column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    let width = offense
        .highlight
        .lines()
        .next()
        .map(|first| first.chars().count())
        .unwrap_or(0)
        .max(1);
    out.push_str(&pad);
    out.push_str(&"^".repeat(width));
    out.push('\n');
    out
}

pub fn render_summary(summary: &ReportSummary) -> String {
    let mut out = format!(
        "{} inspected, {} detected",
        plural(summary.files_inspected, "file"),
        match summary.offenses {
            0 => "no offenses".to_string(),
            n => plural(n, "offense"),
        }
    );
    if summary.corrected > 0 {
        out.push_str(&format!(", {} corrected", plural(summary.corrected, "offense")));
    }
    out
}

fn plural(n: u64, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

pub fn render_report_md(report: &IndentReport) -> String {
    let mut out = String::new();
    out.push_str("# hashindent report\n\n");
    out.push_str(&format!("- Status: `{}`\n", status_label(report.status())));
    out.push_str(&format!(
        "- Enforced style: `{}`\n",
        report.config.enforced_style.as_str()
    ));
    out.push_str(&format!(
        "- Files inspected: {}\n- Offenses: {}\n- Corrected: {}\n",
        report.summary.files_inspected, report.summary.offenses, report.summary.corrected
    ));
    if let Some(patch) = report.suggested_config {
        out.push_str(&format!("- Suggested config: `{}`\n", patch_label(patch)));
    }
    out.push('\n');

    out.push_str("## Offenses\n\n");
    let files: Vec<_> = report.files.iter().filter(|f| !f.offenses.is_empty()).collect();
    if files.is_empty() {
        out.push_str("_No offenses detected._\n");
    }
    for file in files {
        out.push_str(&format!("### `{}`\n\n", file.path));
        for o in &file.offenses {
            out.push_str(&format!(
                "- {}:{} {} (`{}`, `{}`)\n",
                o.line,
                o.column,
                o.message,
                o.highlight.lines().next().unwrap_or_default(),
                patch_label(o.suggested_config)
            ));
        }
        out.push('\n');
    }

    if !report.inputs_failed.is_empty() {
        out.push_str("## Inputs not read\n\n");
        for failure in &report.inputs_failed {
            out.push_str(&format!("- `{}`: {}\n", failure.path, failure.reason));
        }
    }

    out
}

/// YAML snippet keyed by the rule name that silences every offense counted in `offenses`.
/// Empty when there is nothing to allow.
pub fn render_todo_yaml(patch: Option<ConfigPatch>, offenses: u64) -> anyhow::Result<String> {
    let Some(patch) = patch else {
        return Ok(String::new());
    };
    let doc = BTreeMap::from([(RULE_NAME, patch)]);
    let yaml = serde_yaml::to_string(&doc).context("serialize config snippet")?;
    Ok(format!("# Offense count: {offenses}\n{yaml}"))
}

fn patch_label(patch: ConfigPatch) -> String {
    match patch {
        ConfigPatch::EnforcedStyle(style) => format!("{}: {}", patch.key(), style.as_str()),
        ConfigPatch::Disable => format!("{}: false", patch.key()),
    }
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Fail => "fail",
        ReportStatus::Skip => "skip",
    }
}
