//! Incremental merge of a source resource tree with a previous translation
//!
//! The source tree decides the shape of the output: every key and array slot
//! of the source appears in the result, and keys that only exist in the old
//! translation are dropped. The old translation only supplies cached values.
//!
//! Reuse rules:
//!
//! - A string under an object key is reused when the old tree has a truthy
//!   value for that key.
//! - A string in an array slot is reused when the old tree has a truthy value
//!   at the same index. Nested objects and arrays in a slot are merged against
//!   the old value at that index.
//! - A nested object or array is merged against its old counterpart only if
//!   the immediate child keys still line up. Otherwise the whole subtree is
//!   translated again from scratch.
//!
//! "Truthy" means what it means for the JSON files these trees come from:
//! `null`, `false`, `0` and `""` are empty, everything else is a value.

use crate::mt::string_translator::StringTranslator;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Fixed pause after each string sent to the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub delay: Duration,
}

impl Pacing {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

/// Counters for one merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Strings handed to the string translator
    pub translated: usize,
    /// Values copied from the previous translation
    pub reused: usize,
}

/// Walks a source tree and builds its translated counterpart
pub struct TreeMerger<'a> {
    translator: &'a StringTranslator,
    pacing: Pacing,
    translated: AtomicUsize,
    reused: AtomicUsize,
}

impl<'a> TreeMerger<'a> {
    pub fn new(translator: &'a StringTranslator, pacing: Pacing) -> Self {
        Self {
            translator,
            pacing,
            translated: AtomicUsize::new(0),
            reused: AtomicUsize::new(0),
        }
    }

    pub fn stats(&self) -> MergeStats {
        MergeStats {
            translated: self.translated.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
        }
    }

    /// Build the translated tree for `source`, reusing values from `existing`
    ///
    /// Neither input is modified.
    pub async fn merge(&self, source: &Value, existing: Option<&Value>) -> Value {
        self.merge_node(source, existing, "").await
    }

    async fn merge_node(&self, source: &Value, existing: Option<&Value>, prefix: &str) -> Value {
        match source {
            Value::Array(items) => self.merge_array(items, existing, prefix).await,
            Value::Object(map) => self.merge_object(map, existing, prefix).await,
            Value::String(text) => Value::String(self.translate(text, prefix).await),
            other => other.clone(),
        }
    }

    async fn merge_array(&self, items: &[Value], existing: Option<&Value>, prefix: &str) -> Value {
        let previous_items = existing.and_then(Value::as_array);
        let mut result = Vec::with_capacity(items.len());

        for (index, value) in items.iter().enumerate() {
            let previous = previous_items.and_then(|previous| previous.get(index));
            let path = format!("{}[{}]", prefix, index);

            let merged = match value {
                Value::String(text) => match previous.filter(|p| is_truthy(p)) {
                    Some(cached) => {
                        self.reused.fetch_add(1, Ordering::Relaxed);
                        cached.clone()
                    }
                    None => Value::String(self.translate(text, &path).await),
                },
                Value::Array(_) | Value::Object(_) => {
                    Box::pin(self.merge_node(value, previous, &path)).await
                }
                other => other.clone(),
            };
            result.push(merged);
        }

        Value::Array(result)
    }

    async fn merge_object(
        &self,
        map: &Map<String, Value>,
        existing: Option<&Value>,
        prefix: &str,
    ) -> Value {
        let previous_map = existing.and_then(Value::as_object);
        let mut result = Map::with_capacity(map.len());

        for (key, value) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            let previous = previous_map.and_then(|previous| previous.get(key));

            let merged = match value {
                Value::Array(_) | Value::Object(_) => {
                    if structure_changed(value, previous) {
                        debug!(path = %path, "Structure changed, translating all children");
                        Box::pin(self.merge_node(value, None, &path)).await
                    } else {
                        Box::pin(self.merge_node(value, previous, &path)).await
                    }
                }
                Value::String(text) => match previous.filter(|p| is_truthy(p)) {
                    Some(cached) => {
                        debug!(path = %path, "Using existing translation");
                        self.reused.fetch_add(1, Ordering::Relaxed);
                        cached.clone()
                    }
                    None => Value::String(self.translate(text, &path).await),
                },
                other => other.clone(),
            };
            result.insert(key.clone(), merged);
        }

        Value::Object(result)
    }

    async fn translate(&self, text: &str, path: &str) -> String {
        info!(path = %path, "Translating \"{}\"", text);
        let translated = self.translator.translate_one(text, path).await;
        self.translated.fetch_add(1, Ordering::Relaxed);
        self.pacing.wait().await;
        translated
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are empty
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Immediate child keys: object keys, or array indices as strings
fn child_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

fn child<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Whether a nested value has to be re-translated as a whole
///
/// True when there is no usable previous value, the previous value has no
/// children, the child counts differ, or any source child is missing or
/// empty in the previous value.
pub fn structure_changed(source: &Value, previous: Option<&Value>) -> bool {
    let Some(previous) = previous.filter(|p| is_truthy(p)) else {
        return true;
    };

    let previous_keys = child_keys(previous);
    if previous_keys.is_empty() {
        return true;
    }

    let source_keys = child_keys(source);
    source_keys.len() != previous_keys.len()
        || source_keys
            .iter()
            .any(|key| !child(previous, key).is_some_and(is_truthy))
}
