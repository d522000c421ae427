//! The lowest-level rewrite unit: one source, one target, one context.
//!
//! A compiled rule consumes the `source` segment wherever `left` matches
//! immediately before it and `right` matches immediately after it. Neither
//! context side is consumed. Matching is done position by position, so the
//! look-behind can be any pattern the tables can expand, not just a fixed-width
//! one.

use std::fmt;

use regex::Regex;
use regex_automata::{meta, util::captures::Captures, Anchored, Input};

use crate::{err_msg, ShiftError};

/// One replacement found in a word: `word[start..end]` becomes `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit<'r> {
    pub start: usize,
    pub end: usize,
    pub replacement: &'r str,
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    source: String,
    target: String,
    context: String,
    left: Option<Regex>,
    matcher: meta::Regex,
}

impl CompiledRule {
    /// Builds a rule from already-expanded patterns.
    ///
    /// An empty `source` is epenthesis; an empty `target` is deletion.
    pub(crate) fn new(
        source: String,
        target: String,
        left: String,
        right: String,
    ) -> Result<Self, ShiftError> {
        let context = format!("{left}_{right}");
        let left = if left.is_empty() {
            None
        } else {
            let pattern = format!("(?:{left})$");
            Some(Regex::new(&pattern).map_err(|e| {
                err_msg!(Config, "invalid left context \"{}\"", left)
                    .with_help("check that every ( in the context has a matching )")
                    .caused_by(e)
            })?)
        };
        let pattern = format!("({source})(?:{right})");
        let matcher = meta::Regex::new(&pattern).map_err(|e| {
            err_msg!(Config, "invalid rule pattern \"{}\"", pattern)
                .with_help("check that every ( in the source and context has a matching )")
                .caused_by(e)
        })?;
        Ok(Self {
            source,
            target,
            context,
            left,
            matcher,
        })
    }

    /// The expanded source pattern (empty for epenthesis).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The literal replacement (empty for deletion).
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The expanded context, with `_` marking the segment.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn is_epenthesis(&self) -> bool {
        self.source.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        self.target.is_empty()
    }

    /// Replaces every non-overlapping match in one left-to-right pass.
    pub fn apply(&self, word: &str) -> String {
        splice(word, self.edits(word))
    }

    /// All matches in `word`, found against the unmodified word.
    pub(crate) fn edits(&self, word: &str) -> Vec<Edit<'_>> {
        let mut edits = Vec::new();
        let mut caps = self.matcher.create_captures();
        let mut resume = 0;
        let boundaries = word
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(word.len()));
        for pos in boundaries {
            if pos < resume {
                continue;
            }
            if let Some(end) = self.match_at(word, pos, &mut caps) {
                edits.push(Edit {
                    start: pos,
                    end,
                    replacement: &self.target,
                });
                resume = end;
            }
        }
        edits
    }

    fn match_at(&self, word: &str, pos: usize, caps: &mut Captures) -> Option<usize> {
        if let Some(left) = &self.left {
            if !left.is_match(&word[..pos]) {
                return None;
            }
        }
        let input = Input::new(word).range(pos..).anchored(Anchored::Yes);
        self.matcher.search_captures(&input, caps);
        caps.get_group(1).map(|span| span.end)
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.is_epenthesis() { "_" } else { &self.source };
        let target = if self.is_deletion() { "_" } else { &self.target };
        write!(f, "{} > {} / {}", source, target, self.context)
    }
}

/// Applies a set of edits found against the same `word`.
///
/// Edits are ordered by position, longest first, then by replacement text, and
/// an edit that starts where a kept edit starts or inside it is dropped. The
/// outcome does not depend on the order the edits were collected in.
pub(crate) fn splice(word: &str, mut edits: Vec<Edit<'_>>) -> String {
    edits.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
            .then(a.replacement.cmp(b.replacement))
    });
    let mut out = String::with_capacity(word.len());
    let mut last = 0;
    let mut last_start = None;
    for edit in edits {
        if edit.start < last || last_start == Some(edit.start) {
            continue;
        }
        out.push_str(&word[last..edit.start]);
        out.push_str(edit.replacement);
        last = edit.end;
        last_start = Some(edit.start);
    }
    out.push_str(&word[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(source: &str, target: &str, left: &str, right: &str) -> CompiledRule {
        CompiledRule::new(
            source.to_string(),
            target.to_string(),
            left.to_string(),
            right.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn unconditional_replacement_is_global() {
        assert_eq!(rule("t", "d", "", "").apply("tatot"), "dadod");
    }

    #[test]
    fn context_is_not_consumed() {
        let r = rule("t", "d", "(?:a|o)", "(?:a|o)");
        assert_eq!(r.apply("tato"), "tado");
        assert_eq!(r.apply("atatat"), "adadat");
    }

    #[test]
    fn look_behind_may_vary_in_width() {
        let r = rule("t", "d", "(?:a|ee)", "");
        assert_eq!(r.apply("eetat"), "eedad");
    }

    #[test]
    fn anchors_bind_to_the_whole_word() {
        let initial = rule("p", "b", "^", "");
        assert_eq!(initial.apply("papa"), "bapa");
        let final_ = rule("a", "e", "", "$");
        assert_eq!(final_.apply("papa"), "pape");
    }

    #[test]
    fn deletion_removes_the_segment() {
        let r = rule("h", "", "", "$");
        assert!(r.is_deletion());
        assert_eq!(r.apply("bahah"), "baha");
    }

    #[test]
    fn epenthesis_inserts_without_consuming() {
        let r = rule("", "e", "s", "t");
        assert!(r.is_epenthesis());
        assert_eq!(r.apply("stasta"), "setaseta");
        let final_ = rule("", "a", "", "$");
        assert_eq!(final_.apply("tak"), "taka");
    }

    #[test]
    fn source_alternation_backtracks_into_right_context() {
        let r = rule("(?:ab|a)", "X", "", "b");
        assert_eq!(r.apply("abb"), "Xb");
        assert_eq!(r.apply("ab"), "Xb");
    }

    #[test]
    fn multibyte_words_are_handled() {
        let r = rule("ś", "s", "", "");
        assert_eq!(r.apply("śaś"), "sas");
    }

    #[test]
    fn display_uses_underscores_for_empty_sides() {
        assert_eq!(rule("", "e", "s", "").to_string(), "_ > e / s_");
        assert_eq!(rule("h", "", "", "$").to_string(), "h > _ / _$");
    }

    #[test]
    fn unbalanced_context_is_a_config_error() {
        let err = CompiledRule::new("a".into(), "b".into(), "(?:x".into(), String::new())
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn splice_is_order_independent() {
        let word = "abc";
        let a = Edit { start: 0, end: 1, replacement: "x" };
        let b = Edit { start: 0, end: 2, replacement: "y" };
        let c = Edit { start: 2, end: 2, replacement: "z" };
        let forward = splice(word, vec![a.clone(), b.clone(), c.clone()]);
        let backward = splice(word, vec![c, b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward, "yzc");
    }
}
