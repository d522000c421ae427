//! # The Staged Applier
//!
//! Threads a word's candidate forms through the rule pipeline and records
//! snapshots ("stages") along the way:
//!
//! 1. the input, `{spelling}`, before any rule runs;
//! 2. one stage per checkpoint (and, with [`StageGranularity::EveryStep`],
//!    one per transforming step);
//! 3. the output, after the last step.
//!
//! Each transforming step reads the whole candidate set and replaces it. Words
//! share nothing with each other, so every word can be derived on its own.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use serde::{Serialize, Serializer};

use crate::rules::{RuleSet, RuleStep};

mod word;

pub use word::Word;

/// Which points of the pipeline produce a stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StageGranularity {
    /// Input, every checkpoint, and output.
    #[default]
    Checkpoints,
    /// Additionally, after every transforming step.
    EveryStep,
}

/// Where in the pipeline a stage was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageLabel {
    Input,
    Checkpoint(Option<String>),
    /// After the transforming step at this 1-based pipeline position.
    Step(usize),
    Output,
}

impl fmt::Display for StageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageLabel::Input => write!(f, "input"),
            StageLabel::Checkpoint(Some(label)) => write!(f, "{label}"),
            StageLabel::Checkpoint(None) => write!(f, "checkpoint"),
            StageLabel::Step(n) => write!(f, "step {n}"),
            StageLabel::Output => write!(f, "output"),
        }
    }
}

impl Serialize for StageLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A labelled snapshot of a word's candidate forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub label: StageLabel,
    pub forms: BTreeSet<String>,
}

impl Stage {
    pub fn new(label: StageLabel, forms: BTreeSet<String>) -> Self {
        Self { label, forms }
    }
}

/// The ordered stages of one word's derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Derivation {
    stages: Vec<Stage>,
}

impl Derivation {
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The final surface forms.
    pub fn output(&self) -> Option<&BTreeSet<String>> {
        self.stages.last().map(|s| &s.forms)
    }
}

/// Drives words through a rule set.
#[derive(Debug, Clone, Copy)]
pub struct StagedApplier<'r> {
    rules: &'r RuleSet,
    granularity: StageGranularity,
}

impl<'r> StagedApplier<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            granularity: StageGranularity::default(),
        }
    }

    pub fn with_granularity(mut self, granularity: StageGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Derives one word from its spelling, leaving the final forms in `word`.
    pub fn derive(&self, word: &mut Word) -> Derivation {
        word.reset();
        let mut stages = vec![Stage::new(StageLabel::Input, word.candidates().clone())];

        for (index, step) in self.rules.steps().iter().enumerate() {
            match step {
                RuleStep::Checkpoint(label) => {
                    stages.push(Stage::new(
                        StageLabel::Checkpoint(label.clone()),
                        word.candidates().clone(),
                    ));
                }
                RuleStep::Transform(transform) => {
                    let next = transform.apply(word.candidates());
                    if &next != word.candidates() {
                        debug!(
                            "{}: `{}` gives {:?}",
                            word.spelling(),
                            transform.origin(),
                            next
                        );
                    }
                    word.set_candidates(next);
                    if self.granularity == StageGranularity::EveryStep {
                        stages.push(Stage::new(
                            StageLabel::Step(index + 1),
                            word.candidates().clone(),
                        ));
                    }
                }
            }
        }

        stages.push(Stage::new(StageLabel::Output, word.candidates().clone()));
        Derivation { stages }
    }

    /// Derives every word, in order.
    pub fn derive_all(&self, words: &mut [Word]) -> Vec<Derivation> {
        words.iter_mut().map(|w| self.derive(w)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_rules;

    fn forms(derivation: &Derivation) -> Vec<Vec<&str>> {
        derivation
            .stages()
            .iter()
            .map(|s| s.forms.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn first_stage_is_the_spelling() {
        let rules = load_rules("a / e / _\n").unwrap();
        let mut word = Word::new("pat", "foot");
        let derivation = StagedApplier::new(&rules).derive(&mut word);
        assert_eq!(forms(&derivation)[0], vec!["pat"]);
        assert_eq!(derivation.stages()[0].label, StageLabel::Input);
    }

    #[test]
    fn checkpoints_control_the_stages() {
        let rules = load_rules("a / e / _\n! mid\ne / i / _\n").unwrap();
        let mut word = Word::new("pat", "");
        let derivation = StagedApplier::new(&rules).derive(&mut word);
        assert_eq!(forms(&derivation), vec![vec!["pat"], vec!["pet"], vec!["pit"]]);
        assert_eq!(
            derivation.stages()[1].label,
            StageLabel::Checkpoint(Some("mid".to_string()))
        );
        assert_eq!(word.candidates(), &BTreeSet::from(["pit".to_string()]));
    }

    #[test]
    fn every_step_granularity_records_each_transform() {
        let rules = load_rules("a / e / _\ne / i / _\n").unwrap();
        let mut word = Word::new("pat", "");
        let derivation = StagedApplier::new(&rules)
            .with_granularity(StageGranularity::EveryStep)
            .derive(&mut word);
        assert_eq!(
            forms(&derivation),
            vec![vec!["pat"], vec!["pet"], vec!["pit"], vec!["pit"]]
        );
        assert_eq!(derivation.stages()[2].label, StageLabel::Step(2));
    }

    #[test]
    fn branching_rules_grow_the_candidate_set() {
        let rules = load_rules("a / e, o / _\n").unwrap();
        let mut word = Word::new("pat", "");
        let derivation = StagedApplier::new(&rules).derive(&mut word);
        assert_eq!(forms(&derivation)[1], vec!["pet", "pot"]);
    }

    #[test]
    fn derivation_starts_over_each_time() {
        let rules = load_rules("a / e / _\n").unwrap();
        let applier = StagedApplier::new(&rules);
        let mut word = Word::new("pat", "");
        applier.derive(&mut word);
        let again = applier.derive(&mut word);
        assert_eq!(forms(&again), vec![vec!["pat"], vec!["pet"]]);
    }

    #[test]
    fn empty_rule_set_yields_input_and_output() {
        let rules = RuleSet::default();
        let mut words = vec![Word::new("a", ""), Word::new("b", "")];
        let derivations = StagedApplier::new(&rules).derive_all(&mut words);
        assert_eq!(derivations.len(), 2);
        assert_eq!(forms(&derivations[1]), vec![vec!["b"], vec!["b"]]);
    }

    #[test]
    fn labels_serialize_as_text() {
        let json = serde_json::to_string(&Stage::new(
            StageLabel::Checkpoint(None),
            BTreeSet::from(["x".to_string()]),
        ))
        .unwrap();
        assert_eq!(json, r#"{"label":"checkpoint","forms":["x"]}"#);
    }
}
