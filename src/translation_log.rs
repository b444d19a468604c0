//! Append-only plain-text record of every translation attempt
//!
//! Each entry is written as:
//!
//! ```text
//! Key: welcome
//! Original: Welcome back
//! Translated: 欢迎回来
//! ----------------------------------------
//! ```
//!
//! The file is opened in append mode, written and closed for every entry, so
//! no handle is held across translation calls.

use crate::mt::error::MtResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "----------------------------------------";

/// One attempt: what was sent and what was kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub key: String,
    pub original: String,
    pub translated: String,
}

impl TranslationEntry {
    /// Build an entry keyed by the last segment of a dotted context path
    pub fn new(context: &str, original: &str, translated: &str) -> Self {
        Self {
            key: key_from_context(context).to_string(),
            original: original.to_string(),
            translated: translated.to_string(),
        }
    }

    fn render(&self) -> String {
        format!(
            "Key: {}\nOriginal: {}\nTranslated: {}\n{}\n",
            self.key, self.original, self.translated, SEPARATOR
        )
    }
}

/// `"billing.plan.title"` → `"title"`
pub fn key_from_context(context: &str) -> &str {
    context.rsplit('.').next().unwrap_or(context)
}

/// Destination for translation entries; a disabled log drops them
#[derive(Debug, Clone, Default)]
pub struct TranslationLog {
    path: Option<PathBuf>,
}

impl TranslationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn append(&self, entry: &TranslationEntry) -> MtResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.render().as_bytes())?;
        Ok(())
    }
}
