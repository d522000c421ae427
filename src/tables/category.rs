//! Categories: named, ordered sets of literal alternatives.
//!
//! A category is declared once (`PLOSIVE = [p t k]`) or written inline as a
//! nonce (`[p t k]`), and is resolved late, when a rule is compiled. Member
//! order matters: it is the positional correspondence a rule like
//! `PLOSIVE / VOICED / _` uses to pair `p` with `b`, `t` with `d` and so on.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tables::segments::{self, Segment};
use crate::{err_msg, ShiftError};

static NONCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("nonce category pattern is valid"));

/// A named category and its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    members: Vec<String>,
}

impl Category {
    /// Builds a category from explicit members. A category must have at least one member.
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Result<Self, ShiftError> {
        let name = name.into();
        if members.is_empty() {
            return Err(err_msg!(Config, "category {} has no members", name)
                .with_help("list the members separated by spaces, e.g. [p t k]"));
        }
        Ok(Self { name, members })
    }

    /// Builds a category whose members are the whitespace-separated tokens of `expansion`.
    pub fn from_expansion(name: impl Into<String>, expansion: &str) -> Result<Self, ShiftError> {
        Self::new(
            name,
            expansion.split_whitespace().map(str::to_string).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True for inline `[...]` categories.
    pub fn is_nonce(&self) -> bool {
        self.name.starts_with('[')
    }

    /// The disjunctive pattern: every member non-capturing-grouped, then alternated.
    pub fn to_pattern(&self) -> String {
        let alternatives: Vec<String> = self
            .members
            .iter()
            .map(|m| format!("(?:{})", regex::escape(m)))
            .collect();
        format!("(?:{})", alternatives.join("|"))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = [{}]", self.name, self.members.join(" "))
    }
}

/// A fragment of an expanded phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    /// Pattern text, already translated to regex syntax.
    Pattern(String),
    /// The `_` segment placeholder of a rule context.
    Placeholder,
}

/// The table of declared categories, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with the whitespace-split tokens of `expansion`.
    ///
    /// Redeclaring a name replaces its members but keeps its place in the table.
    pub fn declare(&mut self, name: &str, expansion: &str) -> Result<(), ShiftError> {
        let category = Category::from_expansion(name, expansion)?;
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every `[...]` group in `phrase`, as an anonymous category named by its own text.
    pub fn nonce_categories(&self, phrase: &str) -> Result<Vec<Category>, ShiftError> {
        let mut nonces: Vec<Category> = Vec::new();
        for caps in NONCE.captures_iter(phrase) {
            let name = &caps[0];
            if nonces.iter().any(|n| n.name == name) {
                continue;
            }
            nonces.push(Category::from_expansion(name, &caps[1])?);
        }
        Ok(nonces)
    }

    /// Expands anchors, optional groups and categories into a regex pattern.
    ///
    /// The result never contains a capturing group. Literal text is escaped.
    pub fn expand(&self, phrase: &str) -> Result<String, ShiftError> {
        let pieces = self.expand_pieces(phrase)?;
        Ok(pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Pattern(p) => p,
                Piece::Placeholder => "_".to_string(),
            })
            .collect())
    }

    /// The single category named in `phrase`, if any.
    ///
    /// Every declared name occurring anywhere in the phrase counts, even inside
    /// another name, and so does every nonce group. Fails when more than one
    /// distinct category is found.
    pub fn lookup_single_category(&self, phrase: &str) -> Result<Option<Category>, ShiftError> {
        let mut found: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| phrase.contains(c.name.as_str()))
            .cloned()
            .collect();
        for nonce in self.nonce_categories(phrase)? {
            if !found.iter().any(|f| f.name == nonce.name) {
                found.push(nonce);
            }
        }
        if found.len() > 1 {
            let names: Vec<&str> = found.iter().map(Category::name).collect();
            return Err(
                err_msg!(Config, "too many categories in phrase \"{}\"", phrase)
                    .with_help(format!(
                        "found {}; give categories names that do not contain each other",
                        names.join(", ")
                    )),
            );
        }
        Ok(found.pop())
    }

    /// Nonce groups first, then declared names from the most recent declaration back.
    fn claim_categories<'p, 'c>(
        &'c self,
        phrase: &'p str,
        nonces: &'c [Category],
    ) -> Vec<Segment<'p, &'c Category>> {
        let mut segs = segments::unclaimed(phrase);
        for cat in nonces.iter().chain(self.categories.iter().rev()) {
            segs = segments::claim(segs, &cat.name, &cat);
        }
        segs
    }

    pub(crate) fn expand_pieces(&self, phrase: &str) -> Result<Vec<Piece>, ShiftError> {
        let nonces = self.nonce_categories(phrase)?;
        let segs = self.claim_categories(phrase, &nonces);
        let last = phrase.len().saturating_sub(1);

        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut offset = 0;
        for seg in segs {
            match seg {
                Segment::Claimed(cat) => {
                    current.push_str(&cat.to_pattern());
                    offset += cat.name.len();
                }
                Segment::Text(text) => {
                    for (i, ch) in text.char_indices() {
                        let at = offset + i;
                        match ch {
                            '#' if at == 0 => current.push('^'),
                            '#' if at == last => current.push('$'),
                            '(' => current.push_str("(?:"),
                            ')' => current.push_str(")?"),
                            '_' => {
                                pieces.push(Piece::Pattern(std::mem::take(&mut current)));
                                pieces.push(Piece::Placeholder);
                            }
                            other => current.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
                        }
                    }
                    offset += text.len();
                }
            }
        }
        pieces.push(Piece::Pattern(current));
        Ok(pieces)
    }
}
