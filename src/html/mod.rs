//! Selective translation of HTML documents
//!
//! The pipeline, leaves first:
//!
//! 1. **Segmenter** - splits text into plain and `$`-delimited math segments
//! 2. **Classifier** - decides which nodes and segments may be translated
//! 3. **Cache** - one engine call per distinct segment per document
//! 4. **Rewriter** - walks the text nodes and replaces them in place
pub mod cache;
pub mod classifier;
pub mod document;
pub mod rewriter;
pub mod segmenter;


pub use cache::TranslationCache;
pub use classifier::{
    MATH_WIDGET_CLASS, SKIP_CLASSES, SKIP_TAGS, SkipReason, has_natural_language,
    looks_formula_heavy, node_skip_reason, should_translate_node, should_translate_segment,
};
pub use document::{ElementView, HtmlDocument, HtmlElement, HtmlText, HtmlTree, TextNodeHandle};
pub use rewriter::{RewriteStats, translate_html, translate_text_preserving_math, translate_tree};
pub use segmenter::{MathSegments, Segment, segment_math};
