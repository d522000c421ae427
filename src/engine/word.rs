use std::collections::BTreeSet;

use serde::Serialize;

/// A word, its gloss, and the surface forms it currently has.
///
/// The gloss is carried for display only; no rule ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    spelling: String,
    gloss: String,
    #[serde(skip)]
    candidates: BTreeSet<String>,
}

impl Word {
    pub fn new(spelling: impl Into<String>, gloss: impl Into<String>) -> Self {
        let spelling = spelling.into();
        let candidates = BTreeSet::from([spelling.clone()]);
        Self {
            spelling,
            gloss: gloss.into(),
            candidates,
        }
    }

    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn gloss(&self) -> &str {
        &self.gloss
    }

    pub fn candidates(&self) -> &BTreeSet<String> {
        &self.candidates
    }

    pub(crate) fn set_candidates(&mut self, candidates: BTreeSet<String>) {
        self.candidates = candidates;
    }

    /// Puts the word back to its original spelling.
    pub(crate) fn reset(&mut self) {
        self.candidates = BTreeSet::from([self.spelling.clone()]);
    }
}
