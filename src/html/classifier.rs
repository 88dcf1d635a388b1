//! Translatability decisions for text nodes and segments
//!
//! Skipping prose is cheap, translating code or a formula corrupts the
//! statement, so every rule here errs toward leaving text alone.

use crate::html::document::{ElementView, TextNodeHandle};
use crate::html::segmenter::Segment;

/// Tags whose text content is never prose
pub const SKIP_TAGS: &[&str] = &[
    "code", "kbd", "math", "noscript", "pre", "script", "style", "textarea",
];

/// Class names of structural and metadata blocks in a problem statement
pub const SKIP_CLASSES: &[&str] = &[
    "header",
    "title",
    "time-limit",
    "memory-limit",
    "input-file",
    "output-file",
];

/// Class set on elements already rendered by MathJax
pub const MATH_WIDGET_CLASS: &str = "MathJax";

/// Characters that dominate formulas written without delimiters
const MATHISH_CHARS: &[char] = &['$', '\\', '{', '}', '_', '^', '=', '<', '>', '|'];

/// Why a text node was left untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The text has no parent element
    NoParent,
    /// The parent element is one of [`SKIP_TAGS`]
    SkipTag(String),
    /// The parent element is a rendered math widget
    MathWidget,
    /// Some ancestor carries one of [`SKIP_CLASSES`]
    SkipClass(String),
    /// Nothing but whitespace
    Blank,
}

/// Decide whether a text node is a translation candidate
///
/// Returns `None` when the node should be segmented and translated, or the
/// first rule that rejected it.
pub fn node_skip_reason<N: TextNodeHandle>(node: &N) -> Option<SkipReason> {
    let Some(parent) = node.parent_element() else {
        return Some(SkipReason::NoParent);
    };

    let tag = parent.tag_name();
    if SKIP_TAGS.contains(&tag.as_str()) {
        return Some(SkipReason::SkipTag(tag));
    }

    if parent.has_class(MATH_WIDGET_CLASS) {
        return Some(SkipReason::MathWidget);
    }

    if let Some(class) = ancestor_skip_class(parent) {
        return Some(SkipReason::SkipClass(class));
    }

    if node.value().trim().is_empty() {
        return Some(SkipReason::Blank);
    }

    None
}

pub fn should_translate_node<N: TextNodeHandle>(node: &N) -> bool {
    node_skip_reason(node).is_none()
}

/// Walk from `start` to the top of the tree looking for a skip class
///
/// Elements with unrelated classes do not stop the walk.
fn ancestor_skip_class<E: ElementView>(start: E) -> Option<String> {
    let mut current = Some(start);
    while let Some(element) = current {
        if let Some(class) = element
            .classes()
            .into_iter()
            .find(|class| SKIP_CLASSES.contains(&class.as_str()))
        {
            return Some(class);
        }
        current = element.parent_element();
    }
    None
}

/// Any alphabetic character counts as natural-language signal
///
/// "Alphabetic" here and in [`looks_formula_heavy`] is the Unicode
/// `Alphabetic` property as tested by [`char::is_alphabetic`]. It admits
/// letter numbers such as `Ⅻ` and some combining marks, which Python's
/// `str.isalpha` (general categories `L*` only) rejects.
pub fn has_natural_language(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// More math symbols than letters: an undelimited formula like `x^2 = y`
///
/// Letters are counted with [`char::is_alphabetic`].
pub fn looks_formula_heavy(text: &str) -> bool {
    let alpha_count = text.chars().filter(|c| c.is_alphabetic()).count();
    let mathish_count = text.chars().filter(|c| MATHISH_CHARS.contains(c)).count();
    mathish_count > alpha_count
}

/// Decide whether a segment should be sent to the translator
pub fn should_translate_segment(segment: &Segment<'_>) -> bool {
    match segment {
        Segment::Math(_) => false,
        Segment::Plain(text) => {
            !text.trim().is_empty() && has_natural_language(text) && !looks_formula_heavy(text)
        }
    }
}
