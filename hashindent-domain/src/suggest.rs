//! Configuration changes that would silence offenses without touching code.

use hashindent_types::offense::Offense;
use hashindent_types::patch::ConfigPatch;
use hashindent_types::style::EnforcedStyle;

/// The config-only remedy for one offense.
///
/// When the styles disagree for this hash and the first pair already sits where the other style
/// expects it, switching style is enough. Otherwise the only remedy is disabling the rule.
pub fn suggested_config(offense: &Offense) -> ConfigPatch {
    let facts = &offense.indent;
    if facts.context.styles_disagree() && facts.actual == facts.expected_under_other_style() {
        ConfigPatch::EnforcedStyle(facts.style.other())
    } else {
        ConfigPatch::Disable
    }
}

/// Folds per-offense suggestions into one patch for a whole run.
///
/// Agreeing style switches survive. Any disagreement, or any offense that only disabling fixes,
/// yields `Enabled: false`. No offenses means no patch.
pub fn fold_suggestions<I>(patches: I) -> Option<ConfigPatch>
where
    I: IntoIterator<Item = ConfigPatch>,
{
    patches.into_iter().fold(None, |acc, patch| match acc {
        None => Some(patch),
        Some(prev) if prev == patch => Some(prev),
        Some(_) => Some(ConfigPatch::Disable),
    })
}

/// Drops a style switch that would flag a hash which passes today.
///
/// `relied_on` lists the styles that offense-free hashes of the run depend on. A switch away from
/// any of them becomes `Enabled: false`.
pub fn reconcile_with_accepted(
    folded: Option<ConfigPatch>,
    relied_on: &[EnforcedStyle],
) -> Option<ConfigPatch> {
    match folded {
        Some(ConfigPatch::EnforcedStyle(style)) if relied_on.iter().any(|s| *s != style) => {
            Some(ConfigPatch::Disable)
        }
        other => other,
    }
}
