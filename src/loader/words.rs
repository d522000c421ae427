//! The wordlist grammar: a spelling, optionally followed by a `"gloss"`.
//!
//! Wordlists are read permissively. A missing or malformed gloss is never an
//! error; the word simply gets an empty gloss.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::Word;
use crate::loader::significant_lines;

static WORD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\S+)(?:\s+"([^"\s]*)")?"#).expect("word line pattern is valid")
});

/// Parses one comment-free, trimmed wordlist line.
pub fn parse_word_line(line: &str) -> Word {
    let Some(caps) = WORD_LINE.captures(line) else {
        return Word::new(line.trim(), "");
    };
    let whole = caps.get(0).map_or(0, |m| m.end());
    if whole < line.len() {
        warn!("ignoring trailing text in wordlist line `{}`", line);
    }
    let spelling = caps.get(1).map_or("", |m| m.as_str());
    let gloss = caps.get(2).map_or("", |m| m.as_str());
    Word::new(spelling, gloss)
}

/// Every word of a wordlist, in file order.
pub fn load_words(text: &str) -> Vec<Word> {
    significant_lines(text)
        .map(|line| parse_word_line(line.text))
        .collect()
}
