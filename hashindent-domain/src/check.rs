use crate::base::{Anchors, Reference, resolve};
use crate::classify::classify;
use hashindent_syntax::{HashLiteral, SourceFile};
use hashindent_types::offense::{IndentFacts, Location, Offense};
use hashindent_types::style::EnforcedStyle;
use hashindent_types::{INDENTATION_WIDTH, RULE_NAME};

/// Why a hash literal was not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    Braceless,
    Empty,
    SingleLine,
    FirstPairOnBraceLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Exempt(Exemption),
    /// The first pair is where `style` expects it.
    Accepted {
        /// Set when switching to the other style would flag this hash.
        relies_on: Option<EnforcedStyle>,
    },
    Offense(Offense),
}

impl Verdict {
    pub fn into_offense(self) -> Option<Offense> {
        match self {
            Verdict::Offense(offense) => Some(offense),
            Verdict::Exempt(_) | Verdict::Accepted { .. } => None,
        }
    }
}

pub fn message(reference: Reference) -> String {
    format!(
        "Use {INDENTATION_WIDTH} spaces for indentation in a hash, relative to {}.",
        reference.description()
    )
}

/// Checks the indentation of the first pair of `hash`.
pub fn check(source: &SourceFile, hash: &HashLiteral, style: EnforcedStyle) -> Verdict {
    let Some(braces) = hash.braces else {
        return Verdict::Exempt(Exemption::Braceless);
    };
    let Some(first) = hash.first_pair() else {
        return Verdict::Exempt(Exemption::Empty);
    };
    if hash.is_single_line() {
        return Verdict::Exempt(Exemption::SingleLine);
    }
    if first.line == braces.open.line {
        return Verdict::Exempt(Exemption::FirstPairOnBraceLine);
    }

    let context = classify(hash);
    let anchors = Anchors::of(source, hash);
    let base = resolve(context, style, &anchors);
    let other = resolve(context, style.other(), &anchors);
    let actual = source.indentation(first.line).unwrap_or(first.column);

    if actual == base.column + INDENTATION_WIDTH {
        let relies_on = (context.styles_disagree() && actual != other.column + INDENTATION_WIDTH)
            .then_some(style);
        return Verdict::Accepted { relies_on };
    }

    let highlight = source
        .text()
        .get(first.start..first.end)
        .unwrap_or_default()
        .trim_matches([' ', '\t'])
        .to_string();

    Verdict::Offense(Offense {
        rule: RULE_NAME.to_string(),
        location: Location {
            line: first.line,
            column: first.column,
            start: first.start,
            end: first.end,
        },
        message: message(base.reference),
        highlight,
        indent: IndentFacts {
            context,
            style,
            base: base.column,
            other_base: other.column,
            actual,
            line_start: source.line_start(first.line).unwrap_or(first.start),
        },
    })
}
