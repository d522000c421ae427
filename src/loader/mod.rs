//! # Loading Rule Files and Wordlists
//!
//! Both file kinds are line oriented. `--` starts a comment that runs to the
//! end of the line, and blank lines are ignored. What is left of each line is
//! handed on together with its line number and byte span, so a rule that fails
//! to compile can be reported against the exact text that produced it.

use crate::diagnostics::Span;

pub mod rules;
pub mod words;

pub use rules::{load_rules, load_rules_named, parse_directive, Directive};
pub use words::{load_words, parse_word_line};

/// Starts a comment running to the end of the line.
pub const COMMENT_MARKER: &str = "--";

/// One non-empty, non-comment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of `text` inside the whole file.
    pub span: Span,
    /// The line with comments and surrounding whitespace removed.
    pub text: &'a str,
}

/// The significant lines of a file, in order.
pub fn significant_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .enumerate()
        .filter_map(move |(index, raw)| {
            let start = offset;
            offset += raw.len();
            let code = match raw.find(COMMENT_MARKER) {
                Some(at) => &raw[..at],
                None => raw,
            };
            let trimmed = code.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lead = code.len() - code.trim_start().len();
            let begin = start + lead;
            Some(SourceLine {
                number: index + 1,
                span: Span::new(begin, begin + trimmed.len()),
                text: trimmed,
            })
        })
}
