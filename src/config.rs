//! Run configuration
//!
//! Everything the pipeline needs from the outside world is collected here
//! once, in `main`, and handed to the orchestrator. Nothing below this point
//! reads environment variables.

use crate::merge::Pacing;
use crate::mt::chat_completion::{ChatCompletionProvider, ChatCompletionSettings};
use crate::mt::error::{MtError, MtResult};
use crate::mt::mock::{MockMode, MockTranslator};
use crate::mt::translator::{Locale, MachineTranslator};
use crate::translation_log::TranslationLog;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_SOURCE_DIR: &str = "./locales/en";
pub const DEFAULT_TARGET_BASE_DIR: &str = "./locales";
pub const DEFAULT_LOCALES: &str = "zh=Chinese Simplified";
pub const DEFAULT_LOG_FILE: &str = "translation-log.txt";

/// Which backend answers translation requests
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    ChatCompletion(ChatCompletionSettings),
    /// Offline dry run: appends the locale code to every string
    Mock,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the English `*.json` resource files
    pub source_dir: PathBuf,
    /// Output root; each locale gets `<target_base_dir>/<code>/`
    pub target_base_dir: PathBuf,
    pub locales: Vec<Locale>,
    pub log_file: Option<PathBuf>,
    pub pacing: Pacing,
    pub provider: ProviderConfig,
}

impl Config {
    /// Check the settings that can be checked before any file is touched
    pub fn validate(&self) -> MtResult<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(MtError::ConfigError(
                "Source directory must not be empty".to_string(),
            ));
        }
        if self.target_base_dir.as_os_str().is_empty() {
            return Err(MtError::ConfigError(
                "Target base directory must not be empty".to_string(),
            ));
        }
        if self.locales.is_empty() {
            return Err(MtError::ConfigError(
                "At least one target locale is required".to_string(),
            ));
        }
        if let ProviderConfig::ChatCompletion(settings) = &self.provider {
            if settings.api_key.trim().is_empty() {
                return Err(MtError::ConfigError(
                    "An API key is required (set DEEPSEEK_API_KEY or pass --api-key)".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn translation_log(&self) -> TranslationLog {
        match &self.log_file {
            Some(path) => TranslationLog::new(path),
            None => TranslationLog::disabled(),
        }
    }

    pub fn build_translator(&self) -> MtResult<Arc<dyn MachineTranslator>> {
        match &self.provider {
            ProviderConfig::ChatCompletion(settings) => {
                Ok(Arc::new(ChatCompletionProvider::new(settings.clone())?))
            }
            ProviderConfig::Mock => Ok(Arc::new(MockTranslator::new(MockMode::Suffix))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: ProviderConfig) -> Config {
        Config {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            target_base_dir: PathBuf::from(DEFAULT_TARGET_BASE_DIR),
            locales: Locale::parse_list(DEFAULT_LOCALES).unwrap(),
            log_file: None,
            pacing: Pacing::default(),
            provider,
        }
    }

    #[test]
    fn test_default_locales() {
        let locales = Locale::parse_list(DEFAULT_LOCALES).unwrap();
        assert_eq!(locales, vec![Locale::new("zh", "Chinese Simplified").unwrap()]);
    }

    #[test]
    fn test_validate_mock() {
        assert!(config(ProviderConfig::Mock).validate().is_ok());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let cfg = config(ProviderConfig::ChatCompletion(ChatCompletionSettings::new(
            String::new(),
        )));
        match cfg.validate() {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("API key")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_locales() {
        let mut cfg = config(ProviderConfig::Mock);
        cfg.locales.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_requires_source_dir() {
        let mut cfg = config(ProviderConfig::Mock);
        cfg.source_dir = PathBuf::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_build_translator() {
        let mock = config(ProviderConfig::Mock).build_translator().unwrap();
        assert_eq!(mock.provider_name(), "Mock Translator");

        let remote = config(ProviderConfig::ChatCompletion(ChatCompletionSettings::new(
            "key".to_string(),
        )))
        .build_translator()
        .unwrap();
        assert_eq!(remote.provider_name(), "Chat Completion");
    }

    #[test]
    fn test_translation_log_toggle() {
        let mut cfg = config(ProviderConfig::Mock);
        assert!(cfg.translation_log().path().is_none());
        cfg.log_file = Some(PathBuf::from(DEFAULT_LOG_FILE));
        assert!(cfg.translation_log().path().is_some());
    }
}
