//! Machine Translation trait and locale utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the string translator can talk to a chat-completion API, a mock, or any
//! other backend without knowing which one it has.
//!
//! # Example
//!
//! ```ignore
//! use i18n_llm_translate::mt::{ChatCompletionProvider, Locale, MachineTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ChatCompletionProvider::new(settings)?;
//!     let zh = Locale::parse("zh")?;
//!     let result = provider.translate("Settings", &zh).await?;
//!     println!("{}", result); // "设置"
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations receive text whose placeholders have already been masked
/// and return the raw model output. Cleaning and validating that output is
/// the caller's job.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single masked string into the target locale
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The raw translated content (may be empty)
    /// * `Err(MtError)` - If the request or response handling fails
    async fn translate(&self, text: &str, target: &Locale) -> MtResult<String>;

    /// Get the name of this translation provider, for logging
    fn provider_name(&self) -> &str;
}

/// A target language: code plus the human-readable name sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub code: String,
    pub display_name: String,
}

/// Display names for codes given without an explicit `=Name`
const KNOWN_LOCALES: &[(&str, &str)] = &[
    ("zh", "Chinese Simplified"),
    ("zh-CN", "Chinese Simplified"),
    ("zh-TW", "Chinese Traditional"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
];

impl Locale {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> MtResult<Self> {
        let code = code.into();
        validate_locale(&code)?;
        Ok(Self {
            code,
            display_name: display_name.into(),
        })
    }

    /// Parse a locale entry of the form `code=Display Name` or a bare `code`
    ///
    /// Bare codes are looked up in a small table of well-known languages.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let zh = Locale::parse("zh")?;
    /// assert_eq!(zh.display_name, "Chinese Simplified");
    /// let pt = Locale::parse("pt-BR=Brazilian Portuguese")?;
    /// assert_eq!(pt.code, "pt-BR");
    /// ```
    pub fn parse(entry: &str) -> MtResult<Self> {
        let entry = entry.trim();
        match entry.split_once('=') {
            Some((code, name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(MtError::ConfigError(format!(
                        "Locale '{}' has an empty display name",
                        code.trim()
                    )));
                }
                Self::new(code.trim(), name)
            }
            None => {
                let name = KNOWN_LOCALES
                    .iter()
                    .find(|(code, _)| code.eq_ignore_ascii_case(entry))
                    .map(|(_, name)| *name)
                    .ok_or_else(|| {
                        MtError::ConfigError(format!(
                            "Unknown locale '{}'; use the form code=Display Name",
                            entry
                        ))
                    })?;
                Self::new(entry, name)
            }
        }
    }

    /// Parse a comma-separated list of locale entries
    pub fn parse_list(list: &str) -> MtResult<Vec<Self>> {
        let locales = list
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(Self::parse)
            .collect::<MtResult<Vec<_>>>()?;

        if locales.is_empty() {
            return Err(MtError::ConfigError(
                "At least one target locale is required".to_string(),
            ));
        }
        Ok(locales)
    }

    /// Base language without region or script (`zh-TW` → `zh`)
    pub fn language(&self) -> String {
        normalize_locale(&self.code)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code, self.display_name)
    }
}

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `en` → `en` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale.split('-').next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Locale codes end up in directory names, so only alphanumeric characters,
/// hyphens, and underscores are accepted.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::ConfigError("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::ConfigError(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
