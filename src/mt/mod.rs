/// Machine Translation Module
///
/// This module turns one English UI string into its translation through a
/// language-model API, without letting the model touch template variables or
/// component tags.
///
/// # Overview
///
/// 1. **Placeholder Codec** - Masks `{{variables}}` and `<Tags>` as `__VAR0__` / `__TAG1__` tokens
/// 2. **MT Trait & Providers** - Generic trait with a chat-completion implementation and a mock
/// 3. **String Translator** - Masks, calls the provider, cleans and validates the answer, restores
///
/// # Example
///
/// ```ignore
/// use i18n_llm_translate::mt::{ChatCompletionProvider, ChatCompletionSettings, Locale, StringTranslator};
/// use i18n_llm_translate::translation_log::TranslationLog;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = ChatCompletionProvider::new(ChatCompletionSettings::new(api_key))?;
///     let translator = StringTranslator::new(
///         Arc::new(provider),
///         Locale::parse("zh")?,
///         TranslationLog::disabled(),
///     );
///
///     let result = translator.translate_one("Hello {{name}}", "greeting").await;
///     println!("{}", result);
///     Ok(())
/// }
/// ```
pub mod chat_completion;
pub mod error;
pub mod mock;
pub mod placeholder;
pub mod string_translator;
pub mod translator;


pub use chat_completion::{ChatCompletionProvider, ChatCompletionSettings};
pub use error::{MtError, MtResult};
pub use mock::{MockMode, MockTranslator};
pub use placeholder::{PlaceholderRecord, ProtectedText, is_translatable, protect, restore};
pub use string_translator::{StringTranslator, sanitize_response};
pub use translator::{Locale, MachineTranslator, normalize_locale, validate_locale};
