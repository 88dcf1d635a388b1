//! Selective machine translation for HTML problem statements
//!
//! Translates the prose of a rendered statement while leaving source code,
//! layout metadata and `$`-delimited math exactly as they were.
//!
//! ```ignore
//! use std::sync::Arc;
//! use statement_mt::{LanguagePair, LibreTranslateProvider, Translator, translate_html};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(LibreTranslateProvider::from_env()?);
//!     let translator = Translator::resolve(provider, &LanguagePair::default()).await?;
//!     let html = translate_html("<p>Print $a+b$.</p>", &translator).await?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```

pub mod html;
pub mod mt;

// Re-export the types most callers need
pub use html::{HtmlDocument, RewriteStats, TranslationCache, translate_html, translate_tree};
pub use mt::{
    LanguagePair, LibreTranslateProvider, MachineTranslator, MockMode, MockTranslator, MtError,
    MtResult, Translator,
};
