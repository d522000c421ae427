//! Handles all user-facing output for the CLI.
//!
//! Derivations are written either as text, one line per word with stages
//! joined by arrows, or as JSON. Pipelines (for `check`) are written one step
//! per line. Every writer takes a `WriteColor` so tests can render into a
//! plain buffer.

use std::collections::BTreeSet;
use std::io;

use serde::Serialize;
use termcolor::{Color, ColorSpec, NoColor, WriteColor};

use crate::engine::{Derivation, Word};
use crate::rules::{RuleSet, RuleStep};

/// Presentation settings for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_gloss: bool,
    /// Between stages.
    pub stage_separator: String,
    /// Between candidates of one stage.
    pub candidate_separator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_gloss: false,
            stage_separator: " -> ".to_string(),
            candidate_separator: ", ".to_string(),
        }
    }
}

/// One word's entry in JSON output.
#[derive(Debug, Serialize)]
pub struct WordReport<'a> {
    pub spelling: &'a str,
    pub gloss: &'a str,
    pub stages: &'a Derivation,
}

// ============================================================================
// TEXT OUTPUT
// ============================================================================

/// Stands in for a form that every rule has deleted.
pub const EMPTY_FORM: &str = "∅";

/// A stage's forms: bare when there is one, braced when there are several.
pub fn render_forms(forms: &BTreeSet<String>, opts: &RenderOptions) -> String {
    let shown: Vec<&str> = forms
        .iter()
        .map(|f| if f.is_empty() { EMPTY_FORM } else { f.as_str() })
        .collect();
    match shown.as_slice() {
        [one] => one.to_string(),
        many => format!("{{{}}}", many.join(opts.candidate_separator.as_str())),
    }
}

/// Writes one word's derivation as a single line.
pub fn write_derivation<W: WriteColor>(
    out: &mut W,
    word: &Word,
    derivation: &Derivation,
    opts: &RenderOptions,
) -> io::Result<()> {
    let last = derivation.len().saturating_sub(1);
    for (i, stage) in derivation.stages().iter().enumerate() {
        if i > 0 {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "{}", opts.stage_separator)?;
            out.reset()?;
        }
        if i == last {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        }
        write!(out, "{}", render_forms(&stage.forms, opts))?;
        out.reset()?;
    }
    if opts.show_gloss && !word.gloss().is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "  \"{}\"", word.gloss())?;
        out.reset()?;
    }
    writeln!(out)
}

/// Renders one derivation without colour.
pub fn render_text(word: &Word, derivation: &Derivation, opts: &RenderOptions) -> String {
    let mut buffer = NoColor::new(Vec::new());
    // Writing into a Vec cannot fail.
    let _ = write_derivation(&mut buffer, word, derivation, opts);
    String::from_utf8_lossy(&buffer.into_inner())
        .trim_end_matches('\n')
        .to_string()
}

// ============================================================================
// JSON OUTPUT
// ============================================================================

pub fn render_json(words: &[Word], derivations: &[Derivation]) -> serde_json::Result<String> {
    let reports: Vec<WordReport> = words
        .iter()
        .zip(derivations)
        .map(|(word, derivation)| WordReport {
            spelling: word.spelling(),
            gloss: word.gloss(),
            stages: derivation,
        })
        .collect();
    serde_json::to_string_pretty(&reports)
}

// ============================================================================
// PIPELINE OUTPUT
// ============================================================================

/// Writes a compiled pipeline, one numbered step per line.
pub fn write_pipeline<W: WriteColor>(out: &mut W, rules: &RuleSet) -> io::Result<()> {
    for (i, step) in rules.steps().iter().enumerate() {
        let color = match step {
            RuleStep::Checkpoint(_) => Color::Yellow,
            RuleStep::Transform(_) => Color::Blue,
        };
        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{:>3}:", i + 1)?;
        out.reset()?;
        writeln!(out, " {step}")?;
    }
    writeln!(
        out,
        "{} step(s), {} transforming",
        rules.len(),
        rules.transform_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StagedApplier;
    use crate::loader::load_rules;

    fn derive(rules: &str, spelling: &str, gloss: &str) -> (Word, Derivation) {
        let rules = load_rules(rules).unwrap();
        let mut word = Word::new(spelling, gloss);
        let derivation = StagedApplier::new(&rules).derive(&mut word);
        (word, derivation)
    }

    #[test]
    fn stages_are_joined_with_arrows() {
        let (word, derivation) = derive("a / e / _\n!\ne / i / _\n", "pat", "");
        let text = render_text(&word, &derivation, &RenderOptions::default());
        assert_eq!(text, "pat -> pet -> pit");
    }

    #[test]
    fn several_candidates_are_braced() {
        let (word, derivation) = derive("a / e, o / _\n", "pat", "");
        let text = render_text(&word, &derivation, &RenderOptions::default());
        assert_eq!(text, "pat -> {pet, pot}");
    }

    #[test]
    fn fully_deleted_word_stays_visible() {
        let (word, derivation) = derive("a / _ / _\n", "a", "");
        let text = render_text(&word, &derivation, &RenderOptions::default());
        assert_eq!(text, "a -> ∅");
        let (word, derivation) = derive("a / _, b / _\n", "a", "");
        let text = render_text(&word, &derivation, &RenderOptions::default());
        assert_eq!(text, "a -> {∅, b}");
    }

    #[test]
    fn gloss_is_shown_on_request() {
        let (word, derivation) = derive("a / e / _\n", "pat", "foot");
        let opts = RenderOptions {
            show_gloss: true,
            ..RenderOptions::default()
        };
        assert_eq!(render_text(&word, &derivation, &opts), "pat -> pet  \"foot\"");
        let plain = render_text(&word, &derivation, &RenderOptions::default());
        assert_eq!(plain, "pat -> pet");
    }

    #[test]
    fn json_lists_labelled_stages() {
        let (word, derivation) = derive("a / e / _\n! mid\n", "pat", "foot");
        let json = render_json(&[word], &[derivation]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["spelling"], "pat");
        assert_eq!(value[0]["gloss"], "foot");
        assert_eq!(value[0]["stages"][1]["label"], "mid");
        assert_eq!(value[0]["stages"][2]["forms"][0], "pet");
    }

    #[test]
    fn pipeline_lists_every_step() {
        let rules = load_rules("V = [a e]\nV / o / _#\n! end\n").unwrap();
        let mut buffer = NoColor::new(Vec::new());
        write_pipeline(&mut buffer, &rules).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("  1: V / o / _#"));
        assert!(text.contains("  2: ! end"));
        assert!(text.contains("2 step(s), 1 transforming"));
    }
}
