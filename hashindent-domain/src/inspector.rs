use crate::rule::{Rule, builtin_rules};
use crate::suggest::{fold_suggestions, reconcile_with_accepted};
use hashindent_syntax::{LoadedSource, SourceFile, scan_hashes};
use hashindent_types::offense::Offense;
use hashindent_types::patch::ConfigPatch;
use hashindent_types::report::{
    FileReport, IndentReport, InputFailure, ReportConfig, ReportOffense, ReportToolInfo,
};
use hashindent_types::style::EnforcedStyle;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectorConfig {
    pub enabled: bool,
    pub style: EnforcedStyle,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: EnforcedStyle::default(),
        }
    }
}

/// What one pass over a source found.
#[derive(Debug, Default)]
struct Survey {
    offenses: Vec<Offense>,
    /// Styles that offense-free hashes depend on.
    relied_on: Vec<EnforcedStyle>,
}

/// Runs rules over every hash literal of a source file.
pub struct Inspector {
    config: InspectorConfig,
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new(InspectorConfig::default())
    }
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            config,
            rules: builtin_rules(config.style),
        }
    }

    pub fn with_rules(config: InspectorConfig, rules: Vec<Box<dyn Rule>>) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> InspectorConfig {
        self.config
    }

    /// Offenses in `source`, ordered by position. Empty when the rule is disabled.
    pub fn inspect_source(&self, source: &SourceFile) -> Vec<Offense> {
        self.survey(source).offenses
    }

    fn survey(&self, source: &SourceFile) -> Survey {
        if !self.config.enabled {
            return Survey::default();
        }

        let hashes = scan_hashes(source);
        let mut offenses = Vec::new();
        let mut relied_on = Vec::new();
        for hash in &hashes {
            for rule in &self.rules {
                let found = rule.inspect(source, hash);
                if found.is_empty() {
                    relied_on.extend(rule.relied_on_style(source, hash));
                }
                offenses.extend(found);
            }
        }
        relied_on.dedup();

        // Deterministic ordering.
        offenses.sort_by(|a, b| {
            (a.location.start, a.location.end, &a.rule).cmp(&(
                b.location.start,
                b.location.end,
                &b.rule,
            ))
        });
        offenses.dedup();

        debug!(
            hashes = hashes.len(),
            offenses = offenses.len(),
            "inspected source"
        );
        Survey {
            offenses,
            relied_on,
        }
    }

    pub fn suggested_config(&self, offense: &Offense) -> ConfigPatch {
        self.rules
            .iter()
            .find(|rule| rule.meta().name == offense.rule)
            .map(|rule| rule.suggested_config(offense))
            .unwrap_or(ConfigPatch::Disable)
    }

    /// Inspects every loaded source and builds a report.
    ///
    /// Run timestamps are left to the caller.
    pub fn inspect(&self, sources: &[LoadedSource], tool: ReportToolInfo) -> IndentReport {
        let mut report = IndentReport::new(
            tool,
            ReportConfig {
                enabled: self.config.enabled,
                enforced_style: self.config.style,
            },
        );

        let mut suggestions = Vec::new();
        let mut relied_on = Vec::new();
        for loaded in sources {
            let source = match &loaded.source {
                Ok(source) => source,
                Err(err) => {
                    report.inputs_failed.push(InputFailure {
                        path: loaded.display_path.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            report.summary.files_inspected += 1;
            let Survey {
                offenses,
                relied_on: styles,
            } = self.survey(source);
            relied_on.extend(styles);
            if offenses.is_empty() {
                continue;
            }

            let reported: Vec<ReportOffense> = offenses
                .iter()
                .map(|offense| {
                    let patch = self.suggested_config(offense);
                    suggestions.push(patch);
                    ReportOffense::new(offense, patch)
                })
                .collect();
            report.summary.offenses += reported.len() as u64;
            report.files.push(FileReport {
                path: loaded.display_path.clone(),
                offenses: reported,
            });
        }

        report.suggested_config =
            reconcile_with_accepted(fold_suggestions(suggestions), &relied_on);
        info!(
            files = report.summary.files_inspected,
            offenses = report.summary.offenses,
            failed = report.inputs_failed.len(),
            "inspection finished"
        );
        report
    }
}
