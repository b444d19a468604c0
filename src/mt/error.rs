/// Error types for the translation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Invalid or missing configuration (API key, locale list, paths)
    ConfigError(String),
    /// Transport-level failure talking to the translation API
    NetworkError(String),
    /// The API answered, but the answer could not be used
    TranslationError(String),
    /// A placeholder pattern failed to match or compile
    PlaceholderError(String),
    /// Filesystem error while reading sources or writing targets
    IoError(String),
    /// A resource file is not valid JSON
    JsonError(String),
    /// General error with context
    Other(String),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::PlaceholderError(msg) => write!(f, "Placeholder error: {}", msg),
            MtError::IoError(msg) => write!(f, "I/O error: {}", msg),
            MtError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            MtError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MtError::TranslationError(format!("Failed to decode API response: {}", err))
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

impl From<std::io::Error> for MtError {
    fn from(err: std::io::Error) -> Self {
        MtError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for MtError {
    fn from(err: serde_json::Error) -> Self {
        MtError::JsonError(err.to_string())
    }
}

impl From<fancy_regex::Error> for MtError {
    fn from(err: fancy_regex::Error) -> Self {
        MtError::PlaceholderError(err.to_string())
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            MtError::ConfigError("missing key".to_string()).to_string(),
            "Configuration error: missing key"
        );
        assert_eq!(MtError::Other("plain".to_string()).to_string(), "plain");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match MtError::from(io) {
            MtError::IoError(msg) => assert!(msg.contains("gone")),
            other => panic!("Expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        assert!(matches!(MtError::from(err), MtError::JsonError(_)));
    }
}
