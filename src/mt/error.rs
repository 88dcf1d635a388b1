/// Error types for statement translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// No translator can be resolved for the requested language pair
    TranslatorUnavailable(String),
    /// The supplied document is empty or whitespace-only
    EmptyInput,
    /// The translation engine failed while translating a segment
    EngineFailure(String),
    /// The translation engine could not be reached
    NetworkError(String),
    /// Engine configuration was rejected (missing URL, bad API key, ...)
    ConfigError(String),
    /// A language code could not be parsed
    InvalidLocale(String),
    /// The HTML rewriter rejected the document
    MarkupError(String),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::TranslatorUnavailable(pair) => {
                write!(f, "Translation support is not installed for {}", pair)
            }
            MtError::EmptyInput => write!(f, "No HTML content was received for translation"),
            MtError::EngineFailure(msg) => write!(f, "Translation engine error: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::MarkupError(msg) => write!(f, "HTML rewriting error: {}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_names_the_pair() {
        let err = MtError::TranslatorUnavailable("en -> zh".to_string());
        assert_eq!(
            err.to_string(),
            "Translation support is not installed for en -> zh"
        );
    }

    #[test]
    fn test_empty_input_message() {
        assert!(MtError::EmptyInput.to_string().contains("No HTML content"));
    }

    #[test]
    fn test_engine_failure_keeps_engine_message() {
        let err = MtError::EngineFailure("model crashed".to_string());
        assert!(err.to_string().ends_with("model crashed"));
    }
}
