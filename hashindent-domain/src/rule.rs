use crate::check::{Verdict, check};
use crate::suggest::suggested_config;
use hashindent_syntax::{HashLiteral, SourceFile};
use hashindent_types::RULE_NAME;
use hashindent_types::offense::Offense;
use hashindent_types::patch::ConfigPatch;
use hashindent_types::style::EnforcedStyle;

/// Static description of a rule, used by `explain` and reports.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_styles: &'static [EnforcedStyle],
    pub autocorrect: bool,
}

pub trait Rule {
    fn meta(&self) -> RuleMeta;

    /// Offenses for one hash literal. Nothing is remembered between calls.
    fn inspect(&self, source: &SourceFile, hash: &HashLiteral) -> Vec<Offense>;

    fn suggested_config(&self, offense: &Offense) -> ConfigPatch;

    /// The style a hash without offenses depends on, if a config switch would flag it.
    fn relied_on_style(
        &self,
        _source: &SourceFile,
        _hash: &HashLiteral,
    ) -> Option<EnforcedStyle> {
        None
    }
}

/// Checks the indentation of the first pair in a multi-line hash literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentHash {
    style: EnforcedStyle,
}

impl IndentHash {
    const DESCRIPTION: &'static str =
        "Checks the indentation of the first pair in a multi-line hash literal";

    pub fn new(style: EnforcedStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> EnforcedStyle {
        self.style
    }
}

impl Rule for IndentHash {
    fn meta(&self) -> RuleMeta {
        RuleMeta {
            name: RULE_NAME,
            description: Self::DESCRIPTION,
            supported_styles: &EnforcedStyle::ALL,
            autocorrect: true,
        }
    }

    fn inspect(&self, source: &SourceFile, hash: &HashLiteral) -> Vec<Offense> {
        check(source, hash, self.style).into_offense().into_iter().collect()
    }

    fn suggested_config(&self, offense: &Offense) -> ConfigPatch {
        suggested_config(offense)
    }

    fn relied_on_style(&self, source: &SourceFile, hash: &HashLiteral) -> Option<EnforcedStyle> {
        match check(source, hash, self.style) {
            Verdict::Accepted { relies_on } => relies_on,
            Verdict::Exempt(_) | Verdict::Offense(_) => None,
        }
    }
}

pub fn builtin_rules(style: EnforcedStyle) -> Vec<Box<dyn Rule>> {
    vec![Box::new(IndentHash::new(style))]
}

pub fn builtin_rule_metas() -> Vec<RuleMeta> {
    builtin_rules(EnforcedStyle::default())
        .iter()
        .map(|rule| rule.meta())
        .collect()
}
