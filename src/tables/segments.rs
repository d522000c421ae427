//! Span-claiming substitution over a phrase.
//!
//! Both tables replace names inside a phrase with something else. Doing that
//! with repeated `str::replace` lets a later name match inside text an earlier
//! replacement produced. Instead, each name *claims* its occurrences in the
//! still-unclaimed text of the original phrase; claimed text is never scanned
//! again.

/// A piece of a phrase: either untouched text or a claimed occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a, T> {
    Text(&'a str),
    Claimed(T),
}

/// Wraps a whole phrase as a single unclaimed segment.
pub(crate) fn unclaimed<T>(phrase: &str) -> Vec<Segment<'_, T>> {
    if phrase.is_empty() {
        Vec::new()
    } else {
        vec![Segment::Text(phrase)]
    }
}

/// Claims every non-overlapping occurrence of `needle` in the unclaimed text.
pub(crate) fn claim<'a, T: Clone>(
    segments: Vec<Segment<'a, T>>,
    needle: &str,
    value: &T,
) -> Vec<Segment<'a, T>> {
    if needle.is_empty() {
        return segments;
    }
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        let text = match segment {
            Segment::Text(text) => text,
            claimed => {
                out.push(claimed);
                continue;
            }
        };
        let mut last = 0;
        for (at, found) in text.match_indices(needle) {
            if at > last {
                out.push(Segment::Text(&text[last..at]));
            }
            out.push(Segment::Claimed(value.clone()));
            last = at + found.len();
        }
        if last < text.len() {
            out.push(Segment::Text(&text[last..]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_split_text_around_occurrences() {
        let segs = claim(unclaimed("VCV"), "V", &1);
        assert_eq!(
            segs,
            vec![Segment::Claimed(1), Segment::Text("C"), Segment::Claimed(1)]
        );
    }

    #[test]
    fn claimed_text_is_not_rescanned() {
        let segs = claim(unclaimed("AB"), "B", &"first");
        let segs = claim(segs, "AB", &"second");
        assert_eq!(segs, vec![Segment::Text("A"), Segment::Claimed("first")]);
    }

    #[test]
    fn empty_needle_claims_nothing() {
        let segs = claim(unclaimed("abc"), "", &0);
        assert_eq!(segs, vec![Segment::Text("abc")]);
    }
}
