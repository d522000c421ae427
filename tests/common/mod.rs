//! # Fixture Harness
//!
//! Each directory under `tests/fixtures/` holding a `rules.txt` is one case:
//! its `words.txt` is derived through the rules and the plain-text rendering
//! must equal `expected.txt` line for line.

use std::fs;
use std::path::{Path, PathBuf};

use soundshift::cli::output::{render_text, RenderOptions};
use soundshift::{err_msg, load_rules_named, load_words, ShiftError, StagedApplier};
use walkdir::WalkDir;

/// One fixture directory.
#[derive(Debug, Clone)]
pub struct FixtureCase {
    pub name: String,
    pub rules: String,
    pub words: String,
    pub expected: Vec<String>,
}

impl FixtureCase {
    /// Runs the case and returns the rendered lines.
    pub fn run(&self) -> Result<Vec<String>, ShiftError> {
        let rules = load_rules_named(&self.name, &self.rules)?;
        let mut words = load_words(&self.words);
        let derivations = StagedApplier::new(&rules).derive_all(&mut words);
        let opts = RenderOptions::default();
        Ok(words
            .iter()
            .zip(&derivations)
            .map(|(word, derivation)| render_text(word, derivation, &opts))
            .collect())
    }
}

/// Discovers every fixture case below `dir`, sorted by name.
pub fn load_fixture_cases(dir: &Path) -> Result<Vec<FixtureCase>, ShiftError> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || entry.file_name() != "rules.txt" {
            continue;
        }
        let Some(case_dir) = entry.path().parent() else {
            continue;
        };
        let name = case_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let expected = read(case_dir.join("expected.txt"))?;
        cases.push(FixtureCase {
            rules: read(entry.path().to_path_buf())?,
            words: read(case_dir.join("words.txt"))?,
            expected: expected.lines().map(str::to_string).collect(),
            name,
        });
    }
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

fn read(path: PathBuf) -> Result<String, ShiftError> {
    fs::read_to_string(&path)
        .map_err(|e| err_msg!(Resource, "cannot read fixture file {}", path.display()).caused_by(e))
}
