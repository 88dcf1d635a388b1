//! Math-aware text segmentation
//!
//! Splits a text run into alternating plain-text and math segments so that
//! `$...$`, `$$...$$` and `$$$...$$$` spans can be carried through
//! translation verbatim. Concatenating the segments always reproduces the
//! input exactly.

use regex::{Match, Matches, Regex};
use std::sync::LazyLock;

/// One to three dollars, the shortest possible body (newlines included),
/// then one to three dollars.
static MATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\${1,3}.*?\${1,3}").expect("valid math regex"));

/// A contiguous piece of a text node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Ordinary text, a translation candidate
    Plain(&'t str),
    /// A dollar-delimited math span, never translated
    Math(&'t str),
}

impl<'t> Segment<'t> {
    pub fn as_str(&self) -> &'t str {
        match self {
            Segment::Plain(s) | Segment::Math(s) => s,
        }
    }

    pub fn is_math(&self) -> bool {
        matches!(self, Segment::Math(_))
    }
}

/// Lazy iterator over the segments of one string
///
/// Created by [`segment_math`].
pub struct MathSegments<'t> {
    text: &'t str,
    matches: Matches<'static, 't>,
    /// Math match found while emitting the gap in front of it
    pending: Option<Match<'t>>,
    pos: usize,
    emitted_any: bool,
    exhausted: bool,
}

impl<'t> Iterator for MathSegments<'t> {
    type Item = Segment<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(m) = self.pending.take() {
            self.pos = m.end();
            return Some(Segment::Math(m.as_str()));
        }
        if self.exhausted {
            return None;
        }

        match self.matches.next() {
            Some(m) if m.start() > self.pos => {
                let gap = &self.text[self.pos..m.start()];
                self.pending = Some(m);
                self.emitted_any = true;
                Some(Segment::Plain(gap))
            }
            Some(m) => {
                self.pos = m.end();
                self.emitted_any = true;
                Some(Segment::Math(m.as_str()))
            }
            None => {
                self.exhausted = true;
                if self.pos < self.text.len() || !self.emitted_any {
                    self.emitted_any = true;
                    Some(Segment::Plain(&self.text[self.pos..]))
                } else {
                    None
                }
            }
        }
    }
}

/// Segment `text` into plain and math pieces
///
/// Unbalanced or malformed dollar markers are left inside plain segments;
/// this never fails. An empty input yields a single empty plain segment.
///
/// # Example
///
/// ```ignore
/// let segments: Vec<_> = segment_math("area $a*b$ units").collect();
/// assert_eq!(
///     segments,
///     vec![Segment::Plain("area "), Segment::Math("$a*b$"), Segment::Plain(" units")]
/// );
/// ```
pub fn segment_math(text: &str) -> MathSegments<'_> {
    MathSegments {
        text,
        matches: MATH_RE.find_iter(text),
        pending: None,
        pos: 0,
        emitted_any: false,
        exhausted: false,
    }
}
