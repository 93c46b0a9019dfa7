use crate::style::EnforcedStyle;
use serde::{Deserialize, Serialize};

/// A configuration change that silences an offense without touching code.
///
/// Serialized with the configuration's own key spelling:
/// `{"EnforcedStyle": "consistent"}` or `{"Enabled": false}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPatch", into = "RawPatch")]
pub enum ConfigPatch {
    EnforcedStyle(EnforcedStyle),
    Disable,
}

impl ConfigPatch {
    pub fn key(&self) -> &'static str {
        match self {
            ConfigPatch::EnforcedStyle(_) => "EnforcedStyle",
            ConfigPatch::Disable => "Enabled",
        }
    }

    pub fn value(&self) -> serde_json::Value {
        match self {
            ConfigPatch::EnforcedStyle(style) => serde_json::Value::from(style.as_str()),
            ConfigPatch::Disable => serde_json::Value::Bool(false),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatch {
    #[serde(
        rename = "EnforcedStyle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    enforced_style: Option<EnforcedStyle>,

    #[serde(rename = "Enabled", default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
}

impl From<ConfigPatch> for RawPatch {
    fn from(patch: ConfigPatch) -> Self {
        match patch {
            ConfigPatch::EnforcedStyle(style) => RawPatch {
                enforced_style: Some(style),
                enabled: None,
            },
            ConfigPatch::Disable => RawPatch {
                enforced_style: None,
                enabled: Some(false),
            },
        }
    }
}

impl TryFrom<RawPatch> for ConfigPatch {
    type Error = String;

    fn try_from(raw: RawPatch) -> Result<Self, Self::Error> {
        match (raw.enforced_style, raw.enabled) {
            (Some(style), None) => Ok(ConfigPatch::EnforcedStyle(style)),
            (None, Some(false)) => Ok(ConfigPatch::Disable),
            _ => Err("expected exactly one of EnforcedStyle or Enabled: false".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_config_keys() {
        let style = serde_json::to_value(ConfigPatch::EnforcedStyle(EnforcedStyle::Consistent))
            .expect("serialize");
        assert_eq!(style, serde_json::json!({ "EnforcedStyle": "consistent" }));

        let disable = serde_json::to_value(ConfigPatch::Disable).expect("serialize");
        assert_eq!(disable, serde_json::json!({ "Enabled": false }));
    }

    #[test]
    fn rejects_ambiguous_patches() {
        let both = serde_json::json!({ "EnforcedStyle": "consistent", "Enabled": false });
        assert!(serde_json::from_value::<ConfigPatch>(both).is_err());

        let enabled = serde_json::json!({ "Enabled": true });
        assert!(serde_json::from_value::<ConfigPatch>(enabled).is_err());
    }

    #[test]
    fn key_and_value_match_serialized_form() {
        let patch = ConfigPatch::EnforcedStyle(EnforcedStyle::SpecialInsideParentheses);
        assert_eq!(patch.key(), "EnforcedStyle");
        assert_eq!(patch.value(), serde_json::json!("special_inside_parentheses"));
        assert_eq!(ConfigPatch::Disable.value(), serde_json::json!(false));
    }
}
