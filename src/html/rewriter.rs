//! Document walker and rewriter
//!
//! Visits every text node once in document order, keeps the ones the
//! classifier rejects, and replaces the rest with their translation while
//! leaving math spans and non-prose segments exactly as they were.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use statement_mt::html::translate_html;
//! use statement_mt::mt::{LanguagePair, MockTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mock = MockTranslator::with_mappings("fr", &[("Hello ", "Bonjour ")]);
//!     let translator = Translator::resolve(Arc::new(mock), &LanguagePair::new("en", "fr")).await?;
//!     let html = translate_html("<p>Hello <code>x</code></p>", &translator).await?;
//!     assert_eq!(html, "<p>Bonjour <code>x</code></p>");
//!     Ok(())
//! }
//! ```

use crate::html::cache::TranslationCache;
use crate::html::classifier::{node_skip_reason, should_translate_segment};
use crate::html::document::{HtmlDocument, HtmlTree, TextNodeHandle};
use crate::html::segmenter::segment_math;
use crate::mt::{MtError, MtResult, Translator};

/// Counters for one rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Text nodes visited
    pub text_nodes: usize,
    /// Text nodes rejected by the node gate
    pub skipped_nodes: usize,
    /// Text nodes whose value changed
    pub rewritten_nodes: usize,
    /// Segments sent to the engine
    pub engine_calls: usize,
    /// Segments answered from the cache
    pub cache_hits: usize,
}

/// Translate a complete HTML document
///
/// Parses `html`, rewrites every eligible text node and serializes the
/// result. The whole operation fails on the first engine error; no partially
/// translated document is ever returned.
///
/// # Errors
///
/// * `MtError::EmptyInput` - If `html` is empty or whitespace-only
/// * Any error raised by the translator
pub async fn translate_html(html: &str, translator: &Translator) -> MtResult<String> {
    if html.trim().is_empty() {
        return Err(MtError::EmptyInput);
    }

    let document = HtmlDocument::parse(html)?;
    let mut cache = TranslationCache::new();
    let stats = translate_tree(&document, translator, &mut cache).await?;

    tracing::info!(
        provider = translator.provider_name(),
        pair = %translator.pair(),
        text_nodes = stats.text_nodes,
        skipped = stats.skipped_nodes,
        rewritten = stats.rewritten_nodes,
        engine_calls = stats.engine_calls,
        cache_hits = stats.cache_hits,
        "translated document"
    );

    document.serialize()
}

/// Rewrite all eligible text nodes of `tree` in place
///
/// Text nodes are collected up front; rewriting only changes node values,
/// never the shape of the tree.
pub async fn translate_tree<T: HtmlTree>(
    tree: &T,
    translator: &Translator,
    cache: &mut TranslationCache,
) -> MtResult<RewriteStats> {
    let mut stats = RewriteStats::default();
    let (hits_before, misses_before) = (cache.hits(), cache.misses());

    for node in tree.text_nodes() {
        stats.text_nodes += 1;

        if let Some(reason) = node_skip_reason(&node) {
            tracing::debug!(?reason, "skipping text node");
            stats.skipped_nodes += 1;
            continue;
        }

        let original = node.value();
        let translated = translate_text_preserving_math(&original, translator, cache).await?;
        if translated != original {
            node.replace_value(&translated);
            stats.rewritten_nodes += 1;
        }
    }

    stats.cache_hits = cache.hits() - hits_before;
    stats.engine_calls = cache.misses() - misses_before;
    Ok(stats)
}

/// Translate one text run, keeping math and non-prose segments verbatim
///
/// Segments are rejoined in their original order, so a run without any
/// eligible segment comes back unchanged.
pub async fn translate_text_preserving_math(
    text: &str,
    translator: &Translator,
    cache: &mut TranslationCache,
) -> MtResult<String> {
    let mut out = String::with_capacity(text.len());

    for segment in segment_math(text) {
        if should_translate_segment(&segment) {
            out.push_str(&cache.get_or_translate(segment.as_str(), translator).await?);
        } else {
            tracing::debug!(segment = segment.as_str(), "keeping segment verbatim");
            out.push_str(segment.as_str());
        }
    }

    Ok(out)
}
