//! Configuration file loading for hashindent.
//!
//! Discovers and loads `hashindent.toml` from the project root, or reads the file given with
//! `--config`. Merges file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use hashindent_types::style::EnforcedStyle;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "hashindent.toml";

/// Top-level configuration from hashindent.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashindentConfig {
    /// Settings of the indent-hash rule, keyed by the rule name.
    #[serde(rename = "Style/IndentHash")]
    pub rule: RuleConfig,

    /// Which files to inspect.
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(rename = "Enabled")]
    pub enabled: bool,

    /// Kept as text so an unknown value can be reported with the supported styles.
    #[serde(rename = "EnforcedStyle")]
    pub enforced_style: Option<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enforced_style: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Files, directories or glob patterns, relative to the project root.
    pub include: Vec<String>,

    /// Glob patterns matched against paths relative to the project root.
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.rb".to_string()],
            exclude: vec![],
        }
    }
}

/// Discover the hashindent.toml config file.
///
/// Returns `None` if the project root has no config file.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a hashindent.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<HashindentConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<HashindentConfig> {
    let config: HashindentConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Loads `explicit` if given (it must exist), otherwise the discovered file, otherwise defaults.
pub fn load_or_default(
    root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<HashindentConfig> {
    match explicit.map(Utf8Path::to_path_buf).or_else(|| discover_config(root)) {
        Some(path) => load_config(&path),
        None => Ok(HashindentConfig::default()),
    }
}

/// Configuration after CLI arguments were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub enabled: bool,
    pub style: EnforcedStyle,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: HashindentConfig,
}

impl ConfigMerger {
    pub fn new(config: HashindentConfig) -> Self {
        Self { config }
    }

    /// CLI `style` overrides `EnforcedStyle`; non-empty CLI `paths` replace `include`.
    /// Excludes from the file always apply.
    pub fn merge(
        self,
        cli_style: Option<EnforcedStyle>,
        cli_paths: &[String],
    ) -> anyhow::Result<MergedConfig> {
        let file_style = self
            .config
            .rule
            .enforced_style
            .as_deref()
            .map(str::parse::<EnforcedStyle>)
            .transpose()
            .context("invalid Style/IndentHash configuration")?;

        let include = if cli_paths.is_empty() {
            self.config.files.include
        } else {
            cli_paths.to_vec()
        };

        Ok(MergedConfig {
            enabled: self.config.rule.enabled,
            style: cli_style.or(file_style).unwrap_or_default(),
            include,
            exclude: self.config.files.exclude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
["Style/IndentHash"]
Enabled = true
EnforcedStyle = "consistent"

[files]
include = ["app/**/*.rb", "lib"]
exclude = ["vendor/**"]
"#;

        let config = parse_config(contents).unwrap();
        assert!(config.rule.enabled);
        assert_eq!(config.rule.enforced_style.as_deref(), Some("consistent"));
        assert_eq!(config.files.include, vec!["app/**/*.rb", "lib"]);
        assert_eq!(config.files.exclude, vec!["vendor/**"]);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.rule.enabled);
        assert!(config.rule.enforced_style.is_none());
        assert_eq!(config.files.include, vec!["**/*.rb"]);
        assert!(config.files.exclude.is_empty());

        let merged = ConfigMerger::new(config).merge(None, &[]).unwrap();
        assert_eq!(merged.style, EnforcedStyle::SpecialInsideParentheses);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let contents = r#"
["Style/IndentHash"]
EnforcedStyl = "consistent"
"#;
        assert!(parse_config(contents).is_err());
    }

    #[test]
    fn test_unknown_style_names_supported_styles() {
        let config = parse_config("[\"Style/IndentHash\"]\nEnforcedStyle = \"aligned\"\n").unwrap();
        let err = ConfigMerger::new(config).merge(None, &[]).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("aligned"));
        assert!(msg.contains("special_inside_parentheses"));
        assert!(msg.contains("consistent"));
    }

    #[test]
    fn test_cli_style_overrides_file() {
        let config = parse_config("[\"Style/IndentHash\"]\nEnforcedStyle = \"consistent\"\n").unwrap();
        let merged = ConfigMerger::new(config)
            .merge(Some(EnforcedStyle::SpecialInsideParentheses), &[])
            .unwrap();
        assert_eq!(merged.style, EnforcedStyle::SpecialInsideParentheses);
    }

    #[test]
    fn test_cli_paths_replace_include_but_keep_exclude() {
        let config = parse_config("[files]\ninclude = [\"lib\"]\nexclude = [\"lib/gen/**\"]\n").unwrap();
        let merged = ConfigMerger::new(config)
            .merge(None, &["app.rb".to_string()])
            .unwrap();
        assert_eq!(merged.include, vec!["app.rb"]);
        assert_eq!(merged.exclude, vec!["lib/gen/**"]);
    }

    #[test]
    fn test_disabled_rule() {
        let config = parse_config("[\"Style/IndentHash\"]\nEnabled = false\n").unwrap();
        let merged = ConfigMerger::new(config).merge(None, &[]).unwrap();
        assert!(!merged.enabled);
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let missing = root.join("other.toml");
        assert!(load_or_default(&root, Some(&missing)).is_err());

        let cfg = load_or_default(&root, None).expect("load default");
        assert!(cfg.rule.enabled);
    }
}
