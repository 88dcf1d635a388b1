/// Machine Translation Module
///
/// This module is the seam between the HTML pipeline and whatever engine
/// performs the actual translation.
///
/// # Overview
///
/// 1. **MT Trait & Providers** - `MachineTranslator` with a LibreTranslate
///    implementation and a deterministic mock
/// 2. **Translator handle** - a provider bound to one verified language pair
/// 3. **Errors** - the failure taxonomy shared with the HTML pipeline
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use statement_mt::mt::{LanguagePair, MockMode, MockTranslator, Translator};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = Arc::new(MockTranslator::new(MockMode::Suffix));
///     let translator = Translator::resolve(provider, &LanguagePair::new("en", "fr")).await?;
///     assert_eq!(translator.translate("hello").await?, "hello_fr");
///     Ok(())
/// }
/// ```
pub mod error;
pub mod libretranslate;
pub mod mock;
pub mod translator;

pub use error::{MtError, MtResult};
pub use libretranslate::{DEFAULT_LIBRETRANSLATE_URL, LibreTranslateProvider};
pub use mock::{MockMode, MockTranslator};
pub use translator::{
    DEFAULT_SOURCE_LOCALE, DEFAULT_TARGET_LOCALE, LanguagePair, MachineTranslator, Translator,
    normalize_locale, validate_locale,
};
