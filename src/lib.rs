//! # soundshift
//!
//! A sound-change applier. A rule file of ordered phonological rewrite rules
//! is compiled once into an immutable pipeline; each word of a wordlist is then
//! threaded through it, and the forms it has at the start, at every checkpoint
//! and at the end are reported as stages.
//!
//! ```rust
//! use soundshift::{load_rules, StagedApplier, Word};
//!
//! let rules = load_rules("PLOSIVE = [p t k]\nVOICED = [b d g]\nPLOSIVE / VOICED / #_\n").unwrap();
//! let mut word = Word::new("pat", "foot");
//! let derivation = StagedApplier::new(&rules).derive(&mut word);
//! assert_eq!(derivation.output().unwrap().iter().next().unwrap(), "bat");
//! ```

pub use crate::diagnostics::{ErrorContext, ShiftError, Span};
pub use crate::engine::{Derivation, Stage, StageGranularity, StageLabel, StagedApplier, Word};
pub use crate::loader::{load_rules, load_rules_named, load_words};
pub use crate::rules::{RuleSet, RuleStep};

pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod loader;
pub mod rules;
pub mod tables;
