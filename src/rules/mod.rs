//! # Rules and the Rule Set
//!
//! A rule file compiles to an ordered pipeline of [`RuleStep`]s. A step is
//! either a checkpoint, which only records the current forms, or a
//! [`Transform`], which rewrites them.
//!
//! ## Simultaneity
//!
//! One source line can stand for many rules. `PLOSIVE / VOICED / _` is really
//! `p > b`, `t > d` and `k > g`, and those must not feed each other: the `b`
//! written by the first must never be seen by a later member. A
//! [`SimultaneousGroup`] therefore finds the matches of all its rules against
//! the same input and splices them into one output.
//!
//! Comma-separated targets (`a / e, i / _`) are alternatives instead: each one
//! is its own group, every group reads the same input, and a word that matches
//! branches into one candidate per alternative.

use std::collections::BTreeSet;
use std::fmt;

pub mod compiled;
pub mod compiler;

pub use compiled::CompiledRule;
pub use compiler::{PatternCompiler, RuleSetBuilder};

/// Rules applied together against one snapshot, producing one output.
#[derive(Debug, Clone)]
pub struct SimultaneousGroup {
    rules: Vec<CompiledRule>,
}

impl SimultaneousGroup {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule to the same `word` and merges the results.
    pub fn apply(&self, word: &str) -> String {
        match self.rules.as_slice() {
            [only] => only.apply(word),
            rules => {
                let edits = rules.iter().flat_map(|r| r.edits(word)).collect();
                compiled::splice(word, edits)
            }
        }
    }
}

/// One transforming pipeline step: a set of alternative simultaneous groups.
#[derive(Debug, Clone)]
pub struct Transform {
    origin: String,
    groups: Vec<SimultaneousGroup>,
}

impl Transform {
    pub fn new(origin: impl Into<String>, groups: Vec<SimultaneousGroup>) -> Self {
        Self {
            origin: origin.into(),
            groups,
        }
    }

    /// The rule text this step was compiled from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn groups(&self) -> &[SimultaneousGroup] {
        &self.groups
    }

    /// Every candidate through every group; the results are unioned.
    pub fn apply(&self, candidates: &BTreeSet<String>) -> BTreeSet<String> {
        candidates
            .iter()
            .flat_map(|word| self.groups.iter().map(move |g| g.apply(word)))
            .collect()
    }
}

/// A pipeline step.
#[derive(Debug, Clone)]
pub enum RuleStep {
    /// Record the current forms as a stage. The label is the text after `!`.
    Checkpoint(Option<String>),
    Transform(Transform),
}

impl fmt::Display for RuleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStep::Checkpoint(Some(label)) => write!(f, "! {label}"),
            RuleStep::Checkpoint(None) => write!(f, "!"),
            RuleStep::Transform(t) => {
                write!(f, "{}", t.origin)?;
                for group in &t.groups {
                    let rules: Vec<String> = group.rules.iter().map(|r| r.to_string()).collect();
                    write!(f, "\n    {{{}}}", rules.join("; "))?;
                }
                Ok(())
            }
        }
    }
}

/// The compiled, read-only pipeline.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    steps: Vec<RuleStep>,
}

impl RuleSet {
    pub fn new(steps: Vec<RuleStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[RuleStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of transforming (non-checkpoint) steps.
    pub fn transform_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, RuleStep::Transform(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(source: &str, target: &str, left: &str, right: &str) -> CompiledRule {
        CompiledRule::new(source.into(), target.into(), left.into(), right.into()).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn group_members_do_not_feed_each_other() {
        // a > b and b > c at once: the new b must not become c.
        let group = SimultaneousGroup::new(vec![rule("a", "b", "", ""), rule("b", "c", "", "")]);
        assert_eq!(group.apply("ab"), "bc");
    }

    #[test]
    fn group_result_ignores_member_order() {
        let a = rule("p", "b", "", "");
        let b = rule("t", "d", "", "");
        let c = rule("pt", "X", "", "");
        let one = SimultaneousGroup::new(vec![a.clone(), b.clone(), c.clone()]);
        let two = SimultaneousGroup::new(vec![c, b, a]);
        assert_eq!(one.apply("apta"), two.apply("apta"));
        assert_eq!(one.apply("apta"), "aXa");
    }

    #[test]
    fn alternatives_branch_candidates() {
        let transform = Transform::new(
            "a / e, i / _",
            vec![
                SimultaneousGroup::new(vec![rule("a", "e", "", "")]),
                SimultaneousGroup::new(vec![rule("a", "i", "", "")]),
            ],
        );
        assert_eq!(transform.apply(&set(&["pa", "to"])), set(&["pe", "pi", "to"]));
    }

    #[test]
    fn duplicate_outputs_collapse() {
        let transform = Transform::new(
            "e, i / a / _",
            vec![SimultaneousGroup::new(vec![rule("(?:e|i)", "a", "", "")])],
        );
        assert_eq!(transform.apply(&set(&["pe", "pi"])), set(&["pa"]));
    }

    #[test]
    fn transform_count_skips_checkpoints() {
        let rules = RuleSet::new(vec![
            RuleStep::Checkpoint(None),
            RuleStep::Transform(Transform::new("x", vec![])),
        ]);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.transform_count(), 1);
    }
}
