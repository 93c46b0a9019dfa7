mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::{ConfigMerger, MergedConfig};
use fs_err as fs;
use hashindent_domain::{Inspector, InspectorConfig};
use hashindent_edit::{
    ApplyOptions, CorrectionBatch, EditError, FileFix, apply_fixes, correct_until_stable,
};
use hashindent_render::{render_offense_text, render_report_md, render_summary, render_todo_yaml};
use hashindent_syntax::{LoadedSource, SourceFile, load_sources};
use hashindent_types::report::{IndentReport, ReportToolInfo};
use hashindent_types::style::EnforcedStyle;
use std::collections::{BTreeSet, HashMap};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Upper bound on inspect/correct rounds per file.
const MAX_CORRECTION_PASSES: usize = 10;

#[derive(Debug, Parser)]
#[command(
    name = "hashindent",
    version,
    about = "Checks and corrects the indentation of the first pair in multi-line Ruby hashes."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report offenses (exit 1 when any are found).
    Check(CheckArgs),
    /// Correct offenses in place, or preview the corrections as a diff.
    Fix(FixArgs),
    /// Print the configuration that allows every current offense.
    AutoGenConfig(AutoGenConfigArgs),
    /// Explain a rule, its styles and its messages.
    Explain(ExplainArgs),
}

#[derive(Debug, clap::Args)]
struct InputArgs {
    /// Files, directories or glob patterns (default: `[files] include` from the config).
    paths: Vec<String>,

    /// Project root; paths and the config file are resolved against it.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Config file (default: <root>/hashindent.toml, if present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Override EnforcedStyle (special_inside_parentheses, consistent).
    #[arg(long)]
    style: Option<EnforcedStyle>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct FixArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print a unified diff instead of writing files.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Also write report.json, report.md and patch.diff to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct AutoGenConfigArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Write the snippet to this file instead of stdout.
    #[arg(long)]
    output: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule key or name (e.g., "indent-hash", "Style/IndentHash"). Default: every rule.
    rule: Option<String>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            let code = e
                .downcast_ref::<EditError>()
                .map(EditError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Fix(args) => cmd_fix(args),
        Command::AutoGenConfig(args) => cmd_auto_gen_config(args),
        Command::Explain(args) => cmd_explain(args),
    }
}

/// Merged configuration plus the sources it selects.
struct Session {
    inspector: Inspector,
    sources: Vec<LoadedSource>,
}

impl Session {
    fn open(input: &InputArgs) -> anyhow::Result<Self> {
        let file_config = config::load_or_default(&input.root, input.config.as_deref())
            .context("load hashindent.toml config")?;
        let merged: MergedConfig =
            ConfigMerger::new(file_config).merge(input.style, &input.paths)?;
        debug!(
            "merged config: enabled={}, style={}, include={:?}, exclude={:?}",
            merged.enabled, merged.style, merged.include, merged.exclude
        );

        let sources = load_sources(&input.root, &merged.include, &merged.exclude)
            .with_context(|| format!("load sources under {}", input.root))?;
        let inspector = Inspector::new(InspectorConfig {
            enabled: merged.enabled,
            style: merged.style,
        });
        Ok(Self { inspector, sources })
    }

    fn report(&self) -> IndentReport {
        let started_at = Utc::now();
        let mut report = self.inspector.inspect(&self.sources, tool_info());
        report.run.started_at = Some(started_at);
        report.run.ended_at = Some(Utc::now());
        report
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let session = Session::open(&args.input)?;
    let report = session.report();

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&session.sources, &report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        ),
    }

    Ok(if report.summary.offenses > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn render_text(sources: &[LoadedSource], report: &IndentReport) -> String {
    let by_path: HashMap<&str, &SourceFile> = sources
        .iter()
        .filter_map(|l| l.source.as_ref().ok().map(|s| (l.display_path.as_str(), s)))
        .collect();

    let mut out = String::new();
    for file in &report.files {
        let Some(source) = by_path.get(file.path.as_str()) else {
            continue;
        };
        for offense in &file.offenses {
            let line = source.line_text(offense.line).unwrap_or_default();
            out.push_str(&render_offense_text(&file.path, offense, line));
        }
    }
    for failure in &report.inputs_failed {
        out.push_str(&format!("{}: not inspected: {}\n", failure.path, failure.reason));
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&render_summary(&report.summary));
    out.push('\n');
    out
}

fn cmd_fix(args: FixArgs) -> anyhow::Result<ExitCode> {
    let session = Session::open(&args.input)?;
    let mut report = session.report();
    let offending: BTreeSet<&str> = report.files.iter().map(|f| f.path.as_str()).collect();

    let mut fixes = Vec::new();
    let mut corrected = 0;
    let mut remaining = 0;
    for loaded in &session.sources {
        let Ok(source) = &loaded.source else {
            continue;
        };
        if !offending.contains(loaded.display_path.as_str()) {
            continue;
        }
        let result = correct_until_stable(source.text(), MAX_CORRECTION_PASSES, |text| {
            session.inspector.inspect_source(&SourceFile::new(text))
        });
        debug!(
            path = %loaded.display_path,
            passes = result.passes,
            applied = result.applied,
            remaining = result.remaining,
            "corrected in memory"
        );
        remaining += result.remaining;
        if result.corrections.is_empty() {
            continue;
        }
        corrected += result.corrections.len() as u64;
        fixes.push(FileFix {
            path: loaded.path.clone(),
            display_path: loaded.display_path.clone(),
            batch: CorrectionBatch::from_corrections(source.text(), result.corrections),
        });
    }

    let run = apply_fixes(
        &fixes,
        &ApplyOptions {
            dry_run: args.dry_run,
        },
    )?;

    if args.dry_run {
        print!("{}", run.patch);
    } else {
        report.summary.corrected = corrected;
        for file in run.files.iter().filter(|f| f.written) {
            println!("corrected {}", file.display_path);
        }
        println!("{}", render_summary(&report.summary));
    }

    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
        write_json(&out_dir.join("report.json"), &report)?;
        fs::write(out_dir.join("report.md"), render_report_md(&report))?;
        fs::write(out_dir.join("patch.diff"), &run.patch)?;
        info!("wrote fix artifacts to {}", out_dir);
    }

    let unresolved = remaining + run.skipped();
    info!(
        applied = run.applied(),
        unresolved,
        dry_run = args.dry_run,
        "fix finished"
    );
    Ok(if unresolved > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_auto_gen_config(args: AutoGenConfigArgs) -> anyhow::Result<ExitCode> {
    let session = Session::open(&args.input)?;
    let report = session.report();
    let yaml = render_todo_yaml(report.suggested_config, report.summary.offenses)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &yaml).with_context(|| format!("write {}", path))?;
            info!("wrote config to {}", path);
        }
        None => print!("{yaml}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ReportToolInfo {
    ReportToolInfo {
        name: "hashindent".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    use explain::{RULE_REGISTRY, list_rule_keys, lookup_rule, message_templates, rule_meta};

    let entries: Vec<_> = match &args.rule {
        Some(query) => {
            let Some(entry) = lookup_rule(query) else {
                anyhow::bail!(
                    "Unknown rule: '{}'\n\nAvailable rules: {}",
                    query,
                    list_rule_keys().join(", ")
                );
            };
            vec![entry]
        }
        None => RULE_REGISTRY.iter().collect(),
    };

    match args.format {
        OutputFormat::Text => {
            for entry in entries {
                let meta = rule_meta(entry);
                println!(
                    "================================================================================"
                );
                println!("RULE: {}", entry.rule);
                println!(
                    "================================================================================"
                );
                println!();
                println!("Key:           {}", entry.key);
                println!("Title:         {}", entry.title);
                println!("Default style: {}", EnforcedStyle::default());
                println!(
                    "Autocorrect:   {}",
                    if meta.is_some_and(|m| m.autocorrect) {
                        "yes"
                    } else {
                        "no"
                    }
                );
                println!();

                println!("DESCRIPTION");
                println!(
                    "--------------------------------------------------------------------------------"
                );
                if let Some(meta) = meta {
                    println!("{}.", meta.description);
                    println!();
                }
                println!("{}", entry.details);
                println!();

                for style in entry.styles {
                    println!("STYLE: {}", style.style);
                    println!(
                        "--------------------------------------------------------------------------------"
                    );
                    println!("{}", style.meaning);
                    println!();
                    println!("Good:");
                    println!();
                    println!("{}", indent(style.good, 4));
                    println!();
                    println!("Bad:");
                    println!();
                    println!("{}", indent(style.bad, 4));
                    println!();
                }

                println!("MESSAGES");
                println!(
                    "--------------------------------------------------------------------------------"
                );
                for message in message_templates() {
                    println!("  - {message}");
                }
                println!();
            }
        }
        OutputFormat::Json => {
            let rules: Vec<_> = entries
                .into_iter()
                .map(|entry| {
                    let meta = rule_meta(entry);
                    serde_json::json!({
                        "key": entry.key,
                        "rule": entry.rule,
                        "title": entry.title,
                        "description": meta.map(|m| m.description),
                        "autocorrect": meta.is_some_and(|m| m.autocorrect),
                        "default_style": EnforcedStyle::default(),
                        "styles": entry
                            .styles
                            .iter()
                            .map(|s| serde_json::json!({
                                "style": s.style,
                                "meaning": s.meaning,
                                "good": s.good,
                                "bad": s.bad,
                            }))
                            .collect::<Vec<_>>(),
                        "messages": message_templates(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
