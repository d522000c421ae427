//! Pattern compilation: from `source / target / context` text to pipeline steps.
//!
//! ## Error Handling
//!
//! Every failure here is a `Config` error built with `err_msg!`. The compiler
//! never sees file positions; [`crate::loader`] attaches the offending line
//! with [`ShiftError::at`].

use log::debug;

use crate::rules::{CompiledRule, RuleSet, RuleStep, SimultaneousGroup, Transform};
use crate::tables::category::Piece;
use crate::tables::{Category, Tables};
use crate::{err_msg, ShiftError};

/// Written as a source, marks epenthesis; written as a target, marks deletion.
pub const EMPTY_MARKER: &str = "_";

/// Separates alternatives inside one rule field.
pub const ALTERNATIVE_SEPARATOR: char = ',';

// =============================
// Pattern compiler
// =============================

/// Compiles rule text against a snapshot of the declaration tables.
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler<'t> {
    tables: &'t Tables,
}

impl<'t> PatternCompiler<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self { tables }
    }

    /// Compiles one full rule line.
    ///
    /// Each `source` alternative is crossed with each `context` alternative; every
    /// such pair becomes one step whose groups are the `target` alternatives.
    pub fn compile_line(
        &self,
        source: &str,
        target: &str,
        context: &str,
    ) -> Result<Vec<RuleStep>, ShiftError> {
        let sources = alternatives(source);
        let targets = alternatives(target);
        let contexts = alternatives(context);

        let mut steps = Vec::with_capacity(sources.len() * contexts.len());
        for src in &sources {
            for ctx in &contexts {
                let groups = targets
                    .iter()
                    .map(|tgt| self.compile_group(src, tgt, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                let origin = format!("{} / {} / {}", src, targets.join(", "), ctx);
                debug!(
                    "compiled `{}` into {} group(s), {} rule(s)",
                    origin,
                    groups.len(),
                    groups.iter().map(SimultaneousGroup::len).sum::<usize>()
                );
                steps.push(RuleStep::Transform(Transform::new(origin, groups)));
            }
        }
        Ok(steps)
    }

    /// Compiles a single-alternative rule, pairing categories member by member.
    ///
    /// When the target names a category, the source must name one with as many
    /// members; the result holds one rule per member index.
    pub fn compile_group(
        &self,
        source: &str,
        target: &str,
        context: &str,
    ) -> Result<SimultaneousGroup, ShiftError> {
        let categories = &self.tables.categories;
        let Some(to_cat) = categories.lookup_single_category(target)? else {
            return Ok(SimultaneousGroup::new(vec![
                self.compile_rule(source, target, context)?
            ]));
        };
        let from_cat = match categories.lookup_single_category(source)? {
            Some(cat) if cat.len() == to_cat.len() => cat,
            other => return Err(mismatch(other.as_ref(), &to_cat)),
        };

        let rules = from_cat
            .members()
            .iter()
            .zip(to_cat.members())
            .map(|(from, to)| {
                self.compile_rule(
                    &source.replace(from_cat.name(), from),
                    &target.replace(to_cat.name(), to),
                    context,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SimultaneousGroup::new(rules))
    }

    /// Compiles one rule with no category pairing.
    pub fn compile_rule(
        &self,
        source: &str,
        target: &str,
        context: &str,
    ) -> Result<CompiledRule, ShiftError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(err_msg!(Config, "rule has an empty source")
                .with_help("write _ as the source to insert a segment"));
        }
        let source = if source == EMPTY_MARKER {
            String::new()
        } else {
            self.tables.categories.expand(source)?
        };

        let target = target.trim();
        let target = if target == EMPTY_MARKER { "" } else { target };

        let (left, right) = self.compile_context(context)?;
        CompiledRule::new(source, target.to_string(), left, right)
    }

    /// Expands environments, then categories, and splits at the placeholder.
    fn compile_context(&self, context: &str) -> Result<(String, String), ShiftError> {
        let context = match context.trim() {
            "" => EMPTY_MARKER,
            trimmed => trimmed,
        };
        let expanded = self.tables.environments.expand(context);
        let pieces = self.tables.categories.expand_pieces(&expanded)?;

        let placeholders = pieces
            .iter()
            .filter(|p| matches!(p, Piece::Placeholder))
            .count();
        if placeholders != 1 {
            return Err(err_msg!(
                Config,
                "context \"{}\" must contain exactly one _ (found {})",
                context,
                placeholders
            )
            .with_help("mark the position of the changing segment with a single _"));
        }

        let mut left = String::new();
        let mut right = String::new();
        let mut seen = false;
        for piece in pieces {
            match piece {
                Piece::Placeholder => seen = true,
                Piece::Pattern(p) if seen => right.push_str(&p),
                Piece::Pattern(p) => left.push_str(&p),
            }
        }
        Ok((left, right))
    }
}

fn alternatives(field: &str) -> Vec<&str> {
    field.split(ALTERNATIVE_SEPARATOR).map(str::trim).collect()
}

fn mismatch(from: Option<&Category>, to: &Category) -> ShiftError {
    let from_name = from.map_or("(no category)", Category::name);
    let err = err_msg!(Config, "cannot match category {} to {}", from_name, to.name());
    match from {
        Some(from) => err.with_help(format!(
            "{} has {} member(s) but {} has {}",
            from.name(),
            from.len(),
            to.name(),
            to.len()
        )),
        None => err.with_help("a category target needs a category source to pair members with"),
    }
}

// =============================
// Rule set construction
// =============================

/// Accumulates declarations and rules, then freezes them into a [`RuleSet`].
///
/// Rules are compiled as they are added, against the declarations seen so far.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    tables: Tables,
    steps: Vec<RuleStep>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn declare_category(&mut self, name: &str, expansion: &str) -> Result<(), ShiftError> {
        self.tables.categories.declare(name, expansion)
    }

    pub fn declare_environment(&mut self, name: &str, expansion: &str) {
        self.tables.environments.declare(name, expansion);
    }

    pub fn checkpoint(&mut self, label: Option<String>) {
        self.steps.push(RuleStep::Checkpoint(label));
    }

    /// Compiles a rule line and appends its steps.
    pub fn rule(&mut self, source: &str, target: &str, context: &str) -> Result<(), ShiftError> {
        let steps = PatternCompiler::new(&self.tables).compile_line(source, target, context)?;
        self.steps.extend(steps);
        Ok(())
    }

    pub fn build(self) -> RuleSet {
        RuleSet::new(self.steps)
    }
}
