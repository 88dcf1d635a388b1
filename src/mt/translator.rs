//! Machine translation trait and the resolved translator handle
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the HTML pipeline never depends on a specific engine (LibreTranslate,
//! mock, ...). A provider is bound to one language pair through
//! [`Translator::resolve`], which is the only way the pipeline obtains a
//! translator.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use statement_mt::mt::{LanguagePair, LibreTranslateProvider, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(LibreTranslateProvider::from_env()?);
//!     let translator = Translator::resolve(provider, &LanguagePair::default()).await?;
//!     println!("{}", translator.translate("Hello, world!").await?);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;
use icu_locale::Locale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Generic trait for machine translation providers
///
/// Implementations of this trait handle the actual translation work,
/// whether through an HTTP engine (LibreTranslate) or deterministic logic (Mock).
///
/// All methods are async to support I/O-bound operations like network requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en")
    /// * `target_locale` - Target language code (e.g., "zh")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If the engine fails or cannot be reached
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Check whether this provider can translate between the two locales
    ///
    /// A provider that cannot be queried at all returns an error; a provider
    /// that answers but lacks the pair returns `Ok(false)`.
    async fn supports_pair(&self, source_locale: &str, target_locale: &str) -> MtResult<bool>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Source language used when none is given
pub const DEFAULT_SOURCE_LOCALE: &str = "en";

/// Target language used when none is given
pub const DEFAULT_TARGET_LOCALE: &str = "zh";

/// Source and target language codes for one translation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_LOCALE, DEFAULT_TARGET_LOCALE)
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// A provider bound to a single, verified language pair
///
/// Obtained once per translate invocation through [`Translator::resolve`] and
/// dropped when the invocation ends.
#[derive(Clone)]
pub struct Translator {
    provider: Arc<dyn MachineTranslator>,
    pair: LanguagePair,
}

impl Translator {
    /// Resolve a translator for `pair` on `provider`
    ///
    /// # Errors
    ///
    /// * `MtError::InvalidLocale` - If either code is malformed
    /// * `MtError::TranslatorUnavailable` - If the provider lacks the pair
    /// * Any transport error raised while querying the provider
    pub async fn resolve(
        provider: Arc<dyn MachineTranslator>,
        pair: &LanguagePair,
    ) -> MtResult<Self> {
        validate_locale(&pair.source)?;
        validate_locale(&pair.target)?;

        if !provider.supports_pair(&pair.source, &pair.target).await? {
            return Err(MtError::TranslatorUnavailable(pair.to_string()));
        }

        tracing::debug!(
            provider = provider.provider_name(),
            pair = %pair,
            "resolved translator"
        );

        Ok(Self {
            provider,
            pair: pair.clone(),
        })
    }

    /// Translate one piece of plain text with the resolved pair
    pub async fn translate(&self, text: &str) -> MtResult<String> {
        self.provider
            .translate(text, &self.pair.source, &self.pair.target)
            .await
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("provider", &self.provider.provider_name())
            .field("pair", &self.pair)
            .finish()
    }
}

/// Normalize a locale code to its base language subtag
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `EN` → `en`
///
/// Codes that do not parse as a locale fall back to the text before the
/// first hyphen, lowercased.
pub fn normalize_locale(locale: &str) -> String {
    match locale.parse::<Locale>() {
        Ok(parsed) => parsed.id.language.as_str().to_string(),
        Err(_) => locale.split('-').next().unwrap_or(locale).to_lowercase(),
    }
}

/// Validate that a locale code is a well-formed language tag
///
/// # Returns
///
/// * `Ok(())` - If the locale is valid
/// * `Err(MtError::InvalidLocale)` - If the locale is empty or malformed
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.trim().is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    locale.parse::<Locale>().map(|_| ()).map_err(|e| {
        MtError::InvalidLocale(format!("Invalid locale code '{}': {}", locale, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::mock::{MockMode, MockTranslator};

    // ========== Locale Tests ==========

    #[test]
    fn test_normalize_locale_with_region() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("fr-FR"), "fr");
    }

    #[test]
    fn test_normalize_locale_with_script() {
        assert_eq!(normalize_locale("zh-Hans"), "zh");
        assert_eq!(normalize_locale("sr-Latn"), "sr");
    }

    #[test]
    fn test_normalize_locale_case_insensitive() {
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale("EN-US"), "en");
    }

    #[test]
    fn test_validate_locale_valid_codes() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("zh").is_ok());
        assert!(validate_locale("zh-Hans").is_ok());
        assert!(validate_locale("en-US").is_ok());
    }

    #[test]
    fn test_validate_locale_invalid_codes() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("   ").is_err());
        assert!(validate_locale("en@invalid").is_err());
        assert!(validate_locale("fr#bad").is_err());
    }

    // ========== Language Pair Tests ==========

    #[test]
    fn test_default_pair_is_english_to_chinese() {
        let pair = LanguagePair::default();
        assert_eq!(pair.source, "en");
        assert_eq!(pair.target, "zh");
        assert_eq!(pair.to_string(), "en -> zh");
    }

    // ========== Resolution Tests ==========

    #[tokio::test]
    async fn test_resolve_supported_pair() {
        let provider = Arc::new(MockTranslator::new(MockMode::Suffix));
        let translator = Translator::resolve(provider, &LanguagePair::new("en", "fr"))
            .await
            .unwrap();
        assert_eq!(translator.pair().target, "fr");
        assert_eq!(translator.translate("hello").await.unwrap(), "hello_fr");
    }

    #[tokio::test]
    async fn test_resolve_unavailable_pair() {
        let provider = Arc::new(
            MockTranslator::new(MockMode::Suffix).with_available_pairs(&[("en", "de")]),
        );
        let result = Translator::resolve(provider, &LanguagePair::new("en", "zh")).await;
        match result {
            Err(MtError::TranslatorUnavailable(pair)) => assert_eq!(pair, "en -> zh"),
            other => panic!("Expected TranslatorUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_locale() {
        let provider = Arc::new(MockTranslator::new(MockMode::Suffix));
        let result = Translator::resolve(provider, &LanguagePair::new("en", "zh#")).await;
        assert!(matches!(result, Err(MtError::InvalidLocale(_))));
    }

    #[tokio::test]
    async fn test_debug_shows_provider_name() {
        let provider = Arc::new(MockTranslator::new(MockMode::NoOp));
        let translator = Translator::resolve(provider, &LanguagePair::default())
            .await
            .unwrap();
        let debug_str = format!("{:?}", translator);
        assert!(debug_str.contains("Mock Translator"));
    }
}
