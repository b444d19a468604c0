/// Placeholder protection for template variables and markup tags
///
/// Before a UI string is sent to the model, every `{{variable}}` reference and
/// every capitalized component tag (`<Icon />`, `<Bold>text</Bold>`) is swapped
/// for a synthetic token the model is told to leave alone. After the model
/// answers, the tokens are swapped back.
///
/// Token formats: `__VAR{n}__` for variables, `__TAG{n}__` for tags. One
/// counter is shared by all passes of a single `protect` call, so every token
/// in a masked string is unique.
///
/// The paired-tag pattern needs a backreference (`</\1>`), which the `regex`
/// crate does not support, so these passes run on `fancy_regex`.
use crate::mt::error::MtResult;
use std::sync::LazyLock;

/// Prefix of variable tokens; its presence in model output means a token leaked
pub const VAR_TOKEN_PREFIX: &str = "__VAR";
/// Prefix of tag tokens
pub const TAG_TOKEN_PREFIX: &str = "__TAG";

static VARIABLE: LazyLock<fancy_regex::Regex> =
    LazyLock::new(|| fancy_regex::Regex::new(r"\{\{([^}]+)\}\}").expect("valid variable pattern"));

static SELF_CLOSING_TAG: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r"<([A-Z][a-zA-Z]*)\s*/>").expect("valid self-closing tag pattern")
});

static PAIRED_TAG: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r"<([A-Z][a-zA-Z]*)>.*?</\1>").expect("valid paired tag pattern")
});

// Any variable or any tag at all, used only for the translatability check.
static STRIPPABLE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\{\{[^}]+\}\}|<[^>]+>").expect("valid strip pattern"));

/// One protected span: the token that replaced it and the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRecord {
    pub token: String,
    pub original: String,
}

/// Text with its protected spans masked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    pub masked: String,
    pub records: Vec<PlaceholderRecord>,
}

impl ProtectedText {
    pub fn restore(&self, translated: &str) -> String {
        restore(translated, &self.records)
    }
}

/// Check whether a string has anything left to translate
///
/// A string made only of variables, tags, and whitespace (`"{{name}}"`,
/// `"<Icon />"`) is returned as-is without calling the model.
///
/// # Example
/// ```ignore
/// assert!(!is_translatable("{{count}} <Icon />"));
/// assert!(is_translatable("{{count}} items"));
/// ```
pub fn is_translatable(text: &str) -> bool {
    !STRIPPABLE.replace_all(text, "").trim().is_empty()
}

/// Mask variables, self-closing tags, then paired tags, in that order
///
/// # Example
/// ```ignore
/// let protected = protect("Hi {{name}}, see <Link>docs</Link>")?;
/// assert_eq!(protected.masked, "Hi __VAR0__, see __TAG1__");
/// ```
pub fn protect(text: &str) -> MtResult<ProtectedText> {
    let mut records = Vec::new();
    let mut counter = 0;

    let masked = mask_pass(&VARIABLE, text, VAR_TOKEN_PREFIX, &mut counter, &mut records)?;
    let masked = mask_pass(
        &SELF_CLOSING_TAG,
        &masked,
        TAG_TOKEN_PREFIX,
        &mut counter,
        &mut records,
    )?;
    let masked = mask_pass(&PAIRED_TAG, &masked, TAG_TOKEN_PREFIX, &mut counter, &mut records)?;

    Ok(ProtectedText { masked, records })
}

/// Put the original spans back in place of their tokens
///
/// Each token is replaced once. Records are applied newest first because a
/// paired tag captured in the last pass may enclose tokens from earlier ones.
pub fn restore(masked: &str, records: &[PlaceholderRecord]) -> String {
    records.iter().rev().fold(masked.to_string(), |text, record| {
        text.replacen(&record.token, &record.original, 1)
    })
}

/// Whether text still carries a synthetic token
pub fn contains_token(text: &str) -> bool {
    text.contains(VAR_TOKEN_PREFIX) || text.contains(TAG_TOKEN_PREFIX)
}

fn mask_pass(
    pattern: &fancy_regex::Regex,
    text: &str,
    prefix: &str,
    counter: &mut usize,
    records: &mut Vec<PlaceholderRecord>,
) -> MtResult<String> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for found in pattern.find_iter(text) {
        let found = found?;
        let token = format!("{}{}__", prefix, counter);
        *counter += 1;

        result.push_str(&text[last..found.start()]);
        result.push_str(&token);
        records.push(PlaceholderRecord {
            token,
            original: found.as_str().to_string(),
        });
        last = found.end();
    }
    result.push_str(&text[last..]);

    Ok(result)
}
