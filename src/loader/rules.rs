//! The rule-file directive grammar.
//!
//! | Form                        | Directive                 |
//! |-----------------------------|---------------------------|
//! | `! label`                   | checkpoint                |
//! | `SOURCE / TARGET / CONTEXT` | rule                      |
//! | `NAME = [a b c]`            | category declaration      |
//! | `NAME = text`               | environment declaration   |
//!
//! Forms are tried in that order. Anything else is a `Config` error.

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::to_error_source;
use crate::loader::significant_lines;
use crate::rules::{RuleSet, RuleSetBuilder};
use crate::{err_ctx, ShiftError};

static RULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*/\s*(.*?)\s*/\s*(.*)$").expect("rule line pattern is valid")
});
static CATEGORY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)\s*=\s*\[(.*?)\]\s*$").expect("category line pattern is valid")
});
static ENVIRONMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*=\s*(.*)$").expect("environment line pattern is valid"));

/// One parsed rule-file line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Checkpoint(Option<&'a str>),
    Rule {
        source: &'a str,
        target: &'a str,
        context: &'a str,
    },
    Category {
        name: &'a str,
        members: &'a str,
    },
    Environment {
        name: &'a str,
        expansion: &'a str,
    },
}

/// Classifies a comment-free, trimmed line. `None` when no form matches.
pub fn parse_directive(line: &str) -> Option<Directive<'_>> {
    if let Some(rest) = line.strip_prefix('!') {
        let label = rest.trim();
        return Some(Directive::Checkpoint((!label.is_empty()).then_some(label)));
    }
    if let Some(caps) = RULE_LINE.captures(line) {
        let (_, [source, target, context]) = caps.extract();
        return Some(Directive::Rule {
            source: source.trim(),
            target,
            context: context.trim(),
        });
    }
    if let Some(caps) = CATEGORY_LINE.captures(line) {
        let (_, [name, members]) = caps.extract();
        let name = name.trim();
        return (!name.is_empty()).then_some(Directive::Category {
            name,
            members: members.trim(),
        });
    }
    if let Some(caps) = ENVIRONMENT_LINE.captures(line) {
        let (_, [name, expansion]) = caps.extract();
        let name = name.trim();
        return (!name.is_empty()).then_some(Directive::Environment {
            name,
            expansion: expansion.trim(),
        });
    }
    None
}

/// Loads a rule file held in memory under the generic name `rules`.
pub fn load_rules(text: &str) -> Result<RuleSet, ShiftError> {
    load_rules_named("rules", text)
}

/// Loads a rule file, naming it `name` in diagnostics.
///
/// Declarations take effect for the rules that follow them. The first bad line
/// aborts loading; no partial rule set is returned.
pub fn load_rules_named(name: &str, text: &str) -> Result<RuleSet, ShiftError> {
    let src = to_error_source(name, text);
    let mut builder = RuleSetBuilder::new();

    for line in significant_lines(text) {
        let Some(directive) = parse_directive(line.text) else {
            return Err(err_ctx!(
                Config,
                format!("line {}: unrecognized directive", line.number),
                &src,
                line.span,
                "expected `SOURCE / TARGET / CONTEXT`, `NAME = [members]`, `NAME = text` or `!`"
            ));
        };
        debug!("line {}: {:?}", line.number, directive);
        let outcome = match directive {
            Directive::Checkpoint(label) => {
                builder.checkpoint(label.map(str::to_string));
                Ok(())
            }
            Directive::Rule {
                source,
                target,
                context,
            } => builder.rule(source, target, context),
            Directive::Category { name, members } => builder.declare_category(name, members),
            Directive::Environment { name, expansion } => {
                builder.declare_environment(name, expansion);
                Ok(())
            }
        };
        outcome.map_err(|e| e.at(&src, line.span))?;
    }

    let tables = builder.tables();
    info!(
        "{}: {} categor(ies), {} environment(s)",
        name,
        tables.categories.len(),
        tables.environments.len()
    );
    let rules = builder.build();
    info!(
        "{}: {} step(s), {} transforming",
        name,
        rules.len(),
        rules.transform_count()
    );
    Ok(rules)
}
