//! Environments: named macros that expand to literal context text.
//!
//! Expansion is a single pass. An expansion that itself mentions another
//! environment's name is left as written.

use crate::tables::segments::{self, Segment};

#[derive(Debug, Clone, Default)]
pub struct EnvironmentTable {
    entries: Vec<(String, String)>,
}

impl EnvironmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`; redeclaring replaces the expansion and keeps the table position.
    pub fn declare(&mut self, name: &str, expansion: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = expansion.to_string(),
            None => self.entries.push((name.to_string(), expansion.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every occurrence of every declared name, in table order.
    pub fn expand(&self, phrase: &str) -> String {
        let mut segs = segments::unclaimed(phrase);
        for (name, expansion) in &self.entries {
            segs = segments::claim(segs, name, &expansion.as_str());
        }
        segs.into_iter()
            .map(|seg| match seg {
                Segment::Text(text) => text,
                Segment::Claimed(expansion) => expansion,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_every_occurrence() {
        let mut envs = EnvironmentTable::new();
        envs.declare("INTER", "V_V");
        assert_eq!(envs.expand("INTER"), "V_V");
        assert_eq!(envs.expand("#_ INTER"), "#_ V_V");
    }

    #[test]
    fn expansion_is_single_pass() {
        let mut envs = EnvironmentTable::new();
        envs.declare("OUTER", "INNER_");
        envs.declare("INNER", "a");
        assert_eq!(envs.expand("OUTER"), "INNER_");
        assert_eq!(envs.expand("INNER OUTER"), "a INNER_");
    }

    #[test]
    fn redeclaration_replaces_expansion() {
        let mut envs = EnvironmentTable::new();
        envs.declare("E", "a_");
        envs.declare("E", "_b");
        assert_eq!(envs.len(), 1);
        assert_eq!(envs.get("E"), Some("_b"));
        assert_eq!(envs.expand("E"), "_b");
    }

    #[test]
    fn unknown_text_passes_through() {
        let envs = EnvironmentTable::new();
        assert_eq!(envs.expand("a_b"), "a_b");
        assert_eq!(envs.expand(""), "");
    }
}
