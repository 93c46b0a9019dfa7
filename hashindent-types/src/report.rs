use crate::offense::Offense;
use crate::patch::ConfigPatch;
use crate::style::EnforcedStyle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndentReport {
    pub schema: String,
    pub tool: ReportToolInfo,
    pub run: ReportRunInfo,
    pub config: ReportConfig,

    #[serde(default)]
    pub files: Vec<FileReport>,

    pub summary: ReportSummary,

    /// Single config change that would silence every offense in this run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_config: Option<ConfigPatch>,

    /// Inputs that could not be read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs_failed: Vec<InputFailure>,
}

impl IndentReport {
    pub fn new(tool: ReportToolInfo, config: ReportConfig) -> Self {
        Self {
            schema: crate::schema::HASHINDENT_REPORT_V1.to_string(),
            tool,
            run: ReportRunInfo::default(),
            config,
            files: vec![],
            summary: ReportSummary::default(),
            suggested_config: None,
            inputs_failed: vec![],
        }
    }

    pub fn status(&self) -> ReportStatus {
        if !self.config.enabled {
            ReportStatus::Skip
        } else if self.summary.offenses > 0 {
            ReportStatus::Fail
        } else {
            ReportStatus::Pass
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub enabled: bool,
    pub enforced_style: EnforcedStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,

    #[serde(default)]
    pub offenses: Vec<ReportOffense>,
}

/// Offense as written to disk: 1-based line and column plus the suggested config change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOffense {
    pub rule: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub highlight: String,
    pub context: crate::context::HashContext,
    pub suggested_config: ConfigPatch,
}

impl ReportOffense {
    pub fn new(offense: &Offense, suggested_config: ConfigPatch) -> Self {
        Self {
            rule: offense.rule.clone(),
            line: offense.location.line,
            column: offense.location.column + 1,
            message: offense.message.clone(),
            highlight: offense.highlight.clone(),
            context: offense.indent.context,
            suggested_config,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub files_inspected: u64,
    pub offenses: u64,

    #[serde(default)]
    pub corrected: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFailure {
    pub path: String,
    pub reason: String,
}
