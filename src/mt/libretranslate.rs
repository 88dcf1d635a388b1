//! LibreTranslate provider for machine translation
//!
//! LibreTranslate is a self-hosted HTTP server running Argos Translate
//! models. Which language pairs are available depends on the models
//! installed on that server, so the pair check queries `/languages` instead
//! of assuming a fixed list.
//!
//! # Configuration
//!
//! The provider reads `LIBRETRANSLATE_URL` (default `http://127.0.0.1:5000`)
//! and the optional `LIBRETRANSLATE_API_KEY` from the environment.
//!
//! # Example
//!
//! ```ignore
//! use statement_mt::mt::{MachineTranslator, LibreTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = LibreTranslateProvider::from_env()?;
//!     if provider.supports_pair("en", "zh").await? {
//!         let result = provider.translate("Hello, world!", "en", "zh").await?;
//!         println!("{}", result);
//!     }
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Default endpoint of a locally running LibreTranslate server
pub const DEFAULT_LIBRETRANSLATE_URL: &str = "http://127.0.0.1:5000";

/// One entry of the `/languages` response
#[derive(Debug, Clone, Deserialize)]
struct LanguageEntry {
    code: String,
    #[serde(default)]
    targets: Vec<String>,
}

/// LibreTranslate HTTP provider
#[derive(Clone)]
pub struct LibreTranslateProvider {
    /// Optional API key, required only by servers started with `--api-keys`
    api_key: Option<String>,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL of the server, without trailing slash
    base_url: String,
}

impl LibreTranslateProvider {
    /// Maximum characters per request accepted by default server settings
    const MAX_CHARS_PER_STRING: usize = 5_000;

    /// Create a provider for the server at `base_url`
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If the URL is empty or HTTP client creation fails
    pub fn new(base_url: &str, api_key: Option<String>) -> MtResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(MtError::ConfigError(
                "LibreTranslate URL cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Create a provider from `LIBRETRANSLATE_URL` and `LIBRETRANSLATE_API_KEY`
    pub fn from_env() -> MtResult<Self> {
        let base_url = std::env::var("LIBRETRANSLATE_URL")
            .unwrap_or_else(|_| DEFAULT_LIBRETRANSLATE_URL.to_string());
        let api_key = std::env::var("LIBRETRANSLATE_API_KEY").ok();
        Self::new(&base_url, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-success response into an error
    ///
    /// LibreTranslate reports failures as `{"error": "..."}`; the raw body is
    /// used when that field is missing.
    async fn error_from_response(response: reqwest::Response) -> MtError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"].as_str().map(|s| s.to_string()))
            .unwrap_or(body);

        if status.is_client_error() {
            MtError::ConfigError(format!("Engine rejected request ({}): {}", status, message))
        } else {
            MtError::EngineFailure(format!("Engine server error ({}): {}", status, message))
        }
    }

    /// Fetch the installed languages and their translation targets
    async fn languages(&self) -> MtResult<Vec<LanguageEntry>> {
        let url = format!("{}/languages", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response.json::<Vec<LanguageEntry>>().await.map_err(|e| {
            MtError::EngineFailure(format!("Failed to parse languages response: {}", e))
        })
    }
}

impl std::fmt::Debug for LibreTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslateProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Check a `/languages` listing for a source → target pair
fn pair_listed(languages: &[LanguageEntry], source_locale: &str, target_locale: &str) -> bool {
    let source = normalize_locale(source_locale);
    let target = normalize_locale(target_locale);
    languages
        .iter()
        .filter(|lang| normalize_locale(&lang.code) == source)
        .any(|lang| lang.targets.iter().any(|t| normalize_locale(t) == target))
}

#[async_trait]
impl MachineTranslator for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        if text.chars().count() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::EngineFailure(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        let mut body = json!({
            "q": text,
            "source": normalize_locale(source_locale),
            "target": normalize_locale(target_locale),
            "format": "text"
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        let url = format!("{}/translate", self.base_url);
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::EngineFailure(format!("Failed to parse engine response: {}", e))
        })?;

        json["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                MtError::EngineFailure(
                    "Invalid engine response: missing 'translatedText' field".to_string(),
                )
            })
    }

    async fn supports_pair(&self, source_locale: &str, target_locale: &str) -> MtResult<bool> {
        let languages = self.languages().await?;
        Ok(pair_listed(&languages, source_locale, target_locale))
    }

    fn provider_name(&self) -> &str {
        "LibreTranslate"
    }
}
