//! Mock Machine Translator for testing
//!
//! This module provides a deterministic, network-free translator for testing
//! the HTML pipeline without a running translation engine.
//!
//! # Example
//!
//! ```ignore
//! use statement_mt::mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "en", "fr").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, normalize_locale};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target_locale) → translation; unknown text is returned unchanged
    Mappings(HashMap<(String, String), String>),

    /// Simulate engine errors
    Error(String),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
///
/// Clones share the same call counter, so a clone handed to the pipeline can
/// be inspected afterwards through the original.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Pairs this mock claims to support; `None` means every pair
    available_pairs: Option<Vec<(String, String)>>,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new MockTranslator with the given mode
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            available_pairs: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build a `Mappings` mock for a single target language
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mock = MockTranslator::with_mappings("fr", &[("Hello ", "Bonjour ")]);
    /// ```
    pub fn with_mappings(target_locale: &str, pairs: &[(&str, &str)]) -> Self {
        let map = pairs
            .iter()
            .map(|(from, to)| {
                (
                    (from.to_string(), target_locale.to_string()),
                    to.to_string(),
                )
            })
            .collect();
        Self::new(MockMode::Mappings(map))
    }

    /// Restrict the language pairs this mock reports as installed
    pub fn with_available_pairs(mut self, pairs: &[(&str, &str)]) -> Self {
        self.available_pairs = Some(
            pairs
                .iter()
                .map(|(s, t)| (normalize_locale(s), normalize_locale(t)))
                .collect(),
        );
        self
    }

    /// Number of `translate` calls made so far, across all clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, _source: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map.get(&key).cloned().unwrap_or_else(|| text.to_string()))
            }
            MockMode::Error(msg) => Err(MtError::EngineFailure(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_translation(text, source_locale, target_locale)
    }

    async fn supports_pair(&self, source_locale: &str, target_locale: &str) -> MtResult<bool> {
        let Some(pairs) = &self.available_pairs else {
            return Ok(true);
        };
        let wanted = (normalize_locale(source_locale), normalize_locale(target_locale));
        Ok(pairs.contains(&wanted))
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Suffix Mode Tests ==========

    #[tokio::test]
    async fn test_suffix_single_translation() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = mock.translate("hello", "en", "fr").await.unwrap();
        assert_eq!(result, "hello_fr");
    }

    #[tokio::test]
    async fn test_suffix_different_targets() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.translate("hello", "en", "fr").await.unwrap(), "hello_fr");
        assert_eq!(mock.translate("hello", "en", "zh").await.unwrap(), "hello_zh");
    }

    // ========== Mapping Mode Tests ==========

    #[tokio::test]
    async fn test_mapping_single_translation() {
        let mock = MockTranslator::with_mappings("fr", &[("hello", "bonjour")]);
        let result = mock.translate("hello", "en", "fr").await.unwrap();
        assert_eq!(result, "bonjour");
    }

    #[tokio::test]
    async fn test_mapping_unknown_text_unchanged() {
        let mock = MockTranslator::with_mappings("fr", &[("hello", "bonjour")]);
        let result = mock.translate("unknown", "en", "fr").await.unwrap();
        assert_eq!(result, "unknown");
    }

    #[tokio::test]
    async fn test_mapping_is_keyed_by_target() {
        let mock = MockTranslator::with_mappings("fr", &[("hello", "bonjour")]);
        let result = mock.translate("hello", "en", "de").await.unwrap();
        assert_eq!(result, "hello");
    }

    // ========== Error Mode Tests ==========

    #[tokio::test]
    async fn test_error_mode_returns_error() {
        let mock = MockTranslator::new(MockMode::Error("engine unavailable".to_string()));
        let result = mock.translate("hello", "en", "fr").await;
        match result {
            Err(MtError::EngineFailure(msg)) => assert_eq!(msg, "engine unavailable"),
            _ => panic!("Expected EngineFailure"),
        }
    }

    // ========== NoOp Mode Tests ==========

    #[tokio::test]
    async fn test_noop_returns_unchanged() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let result = mock.translate("Hello world", "en", "fr").await.unwrap();
        assert_eq!(result, "Hello world");
    }

    // ========== Pair Availability Tests ==========

    #[tokio::test]
    async fn test_supports_every_pair_by_default() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert!(mock.supports_pair("en", "zh").await.unwrap());
        assert!(mock.supports_pair("ja", "ko").await.unwrap());
    }

    #[tokio::test]
    async fn test_restricted_pairs() {
        let mock = MockTranslator::new(MockMode::Suffix).with_available_pairs(&[("en", "zh")]);
        assert!(mock.supports_pair("en", "zh").await.unwrap());
        assert!(mock.supports_pair("en-US", "zh-Hans").await.unwrap());
        assert!(!mock.supports_pair("zh", "en").await.unwrap());
    }

    // ========== Call Counting Tests ==========

    #[tokio::test]
    async fn test_call_count_shared_between_clones() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let clone = mock.clone();
        clone.translate("a", "en", "fr").await.unwrap();
        clone.translate("b", "en", "fr").await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_provider_name() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.provider_name(), "Mock Translator");
    }
}
