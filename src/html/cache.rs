//! Per-run memoization of engine calls

use crate::mt::{MtResult, Translator};
use std::collections::HashMap;

/// Translations already produced during one document run
///
/// Keys are the exact source segments: no trimming, no case folding. A new
/// cache is created for every document, nothing is persisted.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<String, String>,
    hits: usize,
    misses: usize,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached translation of `segment`, asking `translator` only
    /// the first time the exact string is seen
    ///
    /// Engine errors are returned as-is and nothing is cached for the
    /// failing segment.
    pub async fn get_or_translate(
        &mut self,
        segment: &str,
        translator: &Translator,
    ) -> MtResult<String> {
        if let Some(translated) = self.entries.get(segment) {
            self.hits += 1;
            tracing::debug!(segment, "translation cache hit");
            return Ok(translated.clone());
        }

        tracing::debug!(segment, "translation cache miss");
        let translated = translator.translate(segment).await?;
        self.misses += 1;
        self.entries.insert(segment.to_string(), translated.clone());
        Ok(translated)
    }

    pub fn get(&self, segment: &str) -> Option<&str> {
        self.entries.get(segment).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that reached the engine successfully
    pub fn misses(&self) -> usize {
        self.misses
    }
}
