//! Translation of a single UI string
//!
//! `StringTranslator::translate_one` wraps one provider call with everything
//! around it: the translatability check, placeholder masking, cleanup of the
//! model's answer, rejection of unusable answers, and restoration. It never
//! fails; whatever goes wrong, the caller gets the original text back and the
//! attempt is written to the translation log.

use crate::mt::error::{MtError, MtResult};
use crate::mt::placeholder::{contains_token, is_translatable, protect};
use crate::mt::translator::{Locale, MachineTranslator};
use crate::translation_log::{TranslationEntry, TranslationLog};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

static ANSWER_PREFIX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?i)^(翻译:|译文:|Translation:|翻译结果:|结果:)")
        .expect("valid prefix pattern")
});

static PARENTHETICAL: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"（[^）]*）|\([^)]*\)").expect("valid paren pattern"));

static LINE_BREAKS: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\n+").expect("valid line break pattern"));

/// Clean up a raw model answer
///
/// Drops a leading "Translation:"-style label, parenthetical notes in either
/// full-width or half-width parentheses, and joins lines with single spaces.
///
/// # Example
/// ```ignore
/// assert_eq!(sanitize_response("译文: 保存（Save）\n"), "保存");
/// ```
pub fn sanitize_response(raw: &str) -> String {
    let text = raw.trim();
    let text = ANSWER_PREFIX.replace(text, "");
    let text = PARENTHETICAL.replace_all(text.trim(), "");
    let text = LINE_BREAKS.replace_all(text.trim(), " ");
    text.trim().to_string()
}

/// Translates one string at a time into a fixed target locale
#[derive(Clone)]
pub struct StringTranslator {
    translator: Arc<dyn MachineTranslator>,
    locale: Locale,
    log: TranslationLog,
}

impl StringTranslator {
    pub fn new(translator: Arc<dyn MachineTranslator>, locale: Locale, log: TranslationLog) -> Self {
        Self {
            translator,
            locale,
            log,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Translate `text`, falling back to `text` itself on any failure
    ///
    /// `context` is the dotted key path of the string; its last segment is
    /// used as the key in the translation log.
    pub async fn translate_one(&self, text: &str, context: &str) -> String {
        if !is_translatable(text) {
            debug!(key = context, "Nothing to translate, keeping as-is");
            return text.to_string();
        }

        let result = match self.attempt(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    key = context,
                    locale = %self.locale.code,
                    provider = self.translator.provider_name(),
                    "Keeping original text: {}",
                    e
                );
                text.to_string()
            }
        };

        self.record(context, text, &result);
        result
    }

    async fn attempt(&self, text: &str) -> MtResult<String> {
        let protected = protect(text)?;
        let raw = self.translator.translate(&protected.masked, &self.locale).await?;

        let cleaned = sanitize_response(&raw);
        if cleaned.is_empty() {
            return Err(MtError::TranslationError(
                "Model returned an empty translation".to_string(),
            ));
        }
        if cleaned == text {
            return Err(MtError::TranslationError(
                "Model returned the source text unchanged".to_string(),
            ));
        }
        if contains_token(&cleaned) {
            return Err(MtError::TranslationError(format!(
                "Placeholder token left in translation: {}",
                cleaned
            )));
        }

        Ok(protected.restore(&cleaned))
    }

    fn record(&self, context: &str, original: &str, translated: &str) {
        let entry = TranslationEntry::new(context, original, translated);
        if let Err(e) = self.log.append(&entry) {
            warn!("Failed to write translation log: {}", e);
        }
    }
}

impl std::fmt::Debug for StringTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringTranslator")
            .field("provider", &self.translator.provider_name())
            .field("locale", &self.locale)
            .field("log", &self.log)
            .finish()
    }
}
