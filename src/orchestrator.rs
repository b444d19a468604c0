//! Per-file, per-locale driver
//!
//! For every target locale and every `*.json` file under the source
//! directory, the orchestrator loads the source tree and the previous
//! translation (if any), merges them, and writes the result to
//! `<target_base_dir>/<locale>/<relative path>`.
//!
//! A failing file is reported and skipped. Only an unreadable source
//! directory stops the run.

use crate::config::Config;
use crate::merge::TreeMerger;
use crate::mt::error::{MtError, MtResult};
use crate::mt::string_translator::StringTranslator;
use crate::mt::translator::{Locale, MachineTranslator};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of a full run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_written: usize,
    pub files_failed: usize,
}

pub struct FileOrchestrator {
    config: Config,
    translator: Arc<dyn MachineTranslator>,
}

impl FileOrchestrator {
    pub fn new(config: Config, translator: Arc<dyn MachineTranslator>) -> Self {
        Self { config, translator }
    }

    /// Translate every source file into every configured locale
    ///
    /// # Errors
    /// Returns an error only when the source directory cannot be listed.
    pub async fn run(&self) -> MtResult<RunSummary> {
        info!(
            source = %self.config.source_dir.display(),
            provider = self.translator.provider_name(),
            "Starting translation run"
        );

        let files = self.source_files()?;
        info!("Found {} files to translate", files.len());

        let log = self.config.translation_log();
        let mut summary = RunSummary::default();

        for locale in &self.config.locales {
            info!(locale = %locale, "Processing translations");
            let string_translator =
                StringTranslator::new(self.translator.clone(), locale.clone(), log.clone());

            for file in &files {
                match self.process_file(&string_translator, file).await {
                    Ok(target) => {
                        info!(
                            locale = %locale.code,
                            "Wrote {}",
                            target.display()
                        );
                        summary.files_written += 1;
                    }
                    Err(e) => {
                        warn!(
                            locale = %locale.code,
                            "Skipping {}: {}",
                            file.display(),
                            e
                        );
                        summary.files_failed += 1;
                    }
                }
            }
        }

        info!(
            written = summary.files_written,
            failed = summary.files_failed,
            "Translation run completed"
        );
        Ok(summary)
    }

    /// Translate one source file into the translator's locale
    ///
    /// Returns the path of the written target file.
    pub async fn process_file(
        &self,
        translator: &StringTranslator,
        source_path: &Path,
    ) -> MtResult<PathBuf> {
        info!(
            locale = %translator.locale().code,
            "Processing {}",
            source_path.display()
        );
        let source = read_json(source_path)?;
        let target_path = self.target_path(source_path, translator.locale())?;

        let existing = load_existing(&target_path);
        if existing.is_some() {
            debug!("Found existing translation {}", target_path.display());
        } else {
            debug!("No existing translation at {}", target_path.display());
        }

        let merger = TreeMerger::new(translator, self.config.pacing);
        let translated = merger.merge(&source, existing.as_ref()).await;
        let stats = merger.stats();
        debug!(
            translated = stats.translated,
            reused = stats.reused,
            "Merged {}",
            source_path.display()
        );

        if let Some(dir) = target_path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                MtError::IoError(format!(
                    "Failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let content = serde_json::to_string_pretty(&translated)?;
        fs::write(&target_path, content).map_err(|e| {
            MtError::IoError(format!(
                "Failed to write '{}': {}",
                target_path.display(),
                e
            ))
        })?;

        Ok(target_path)
    }

    /// Mirror a source path under the locale's output directory
    pub fn target_path(&self, source_path: &Path, locale: &Locale) -> MtResult<PathBuf> {
        let relative = source_path
            .strip_prefix(&self.config.source_dir)
            .map_err(|_| {
                MtError::Other(format!(
                    "'{}' is not inside the source directory '{}'",
                    source_path.display(),
                    self.config.source_dir.display()
                ))
            })?;

        Ok(self.locale_dir(locale).join(relative))
    }

    fn locale_dir(&self, locale: &Locale) -> PathBuf {
        self.config.target_base_dir.join(&locale.code)
    }

    /// All `*.json` files under the source directory, sorted by path
    ///
    /// Output directories of the configured locales are never descended into,
    /// so a source directory that contains them does not feed on itself.
    pub fn source_files(&self) -> MtResult<Vec<PathBuf>> {
        let source_dir = &self.config.source_dir;
        if !source_dir.is_dir() {
            return Err(MtError::IoError(format!(
                "Source directory not found: {}",
                source_dir.display()
            )));
        }
        fs::read_dir(source_dir).map(drop).map_err(|e| {
            MtError::IoError(format!(
                "Failed to read directory '{}': {}",
                source_dir.display(),
                e
            ))
        })?;

        let output_dirs: Vec<PathBuf> = self
            .config
            .locales
            .iter()
            .map(|locale| self.locale_dir(locale))
            .collect();

        let mut files = Vec::new();
        let walker = WalkDir::new(source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !output_dirs.iter().any(|dir| entry.path() == dir));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some("json")
            {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}

fn read_json(path: &Path) -> MtResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        MtError::IoError(format!("Failed to read file '{}': {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        MtError::JsonError(format!(
            "Failed to parse JSON from '{}': {}",
            path.display(),
            e
        ))
    })
}

/// A missing or unparsable previous translation counts as none at all
fn load_existing(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    match read_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring existing translation: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::merge::Pacing;
    use crate::mt::mock::{MockMode, MockTranslator};
    use crate::translation_log::TranslationLog;
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        source_dir: PathBuf,
        target_dir: PathBuf,
        log_file: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let source_dir = temp_dir.path().join("locales").join("en");
            let target_dir = temp_dir.path().join("locales");
            let log_file = temp_dir.path().join("translation-log.txt");
            fs::create_dir_all(&source_dir).unwrap();
            Self {
                _temp_dir: temp_dir,
                source_dir,
                target_dir,
                log_file,
            }
        }

        fn write_source(&self, relative: &str, value: &Value) {
            let path = self.source_dir.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        }

        fn write_raw(&self, path: &Path, content: &str) {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn read_target(&self, locale: &str, relative: &str) -> Value {
            let content =
                fs::read_to_string(self.target_dir.join(locale).join(relative)).unwrap();
            serde_json::from_str(&content).unwrap()
        }

        fn config(&self, locales: &str) -> Config {
            Config {
                source_dir: self.source_dir.clone(),
                target_base_dir: self.target_dir.clone(),
                locales: Locale::parse_list(locales).unwrap(),
                log_file: Some(self.log_file.clone()),
                pacing: Pacing::none(),
                provider: ProviderConfig::Mock,
            }
        }

        fn orchestrator(&self, locales: &str, mock: Arc<MockTranslator>) -> FileOrchestrator {
            FileOrchestrator::new(self.config(locales), mock)
        }
    }

    #[tokio::test]
    async fn test_run_writes_each_locale() {
        let fx = Fixture::new();
        fx.write_source("common.json", &json!({"save": "Save", "count": 2}));

        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let summary = fx.orchestrator("zh,ja", mock).run().await.unwrap();

        assert_eq!(summary, RunSummary { files_written: 2, files_failed: 0 });
        assert_eq!(fx.read_target("zh", "common.json"), json!({"save": "Save_zh", "count": 2}));
        assert_eq!(fx.read_target("ja", "common.json"), json!({"save": "Save_ja", "count": 2}));
    }

    #[tokio::test]
    async fn test_run_mirrors_nested_directories() {
        let fx = Fixture::new();
        fx.write_source("pages/billing/plan.json", &json!({"title": "Plan"}));
        fx.write_source("notes.txt", &json!("not a resource"));

        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let summary = fx.orchestrator("zh", mock).run().await.unwrap();

        assert_eq!(summary.files_written, 1);
        assert_eq!(
            fx.read_target("zh", "pages/billing/plan.json"),
            json!({"title": "Plan_zh"})
        );
    }

    #[tokio::test]
    async fn test_output_is_pretty_printed_utf8() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!({"nav": {"settings": "Settings"}}));

        let mock = Arc::new(MockTranslator::with_mappings([("Settings", "设置")]));
        fx.orchestrator("zh", mock).run().await.unwrap();

        let content = fs::read_to_string(fx.target_dir.join("zh").join("a.json")).unwrap();
        assert_eq!(content, "{\n  \"nav\": {\n    \"settings\": \"设置\"\n  }\n}");
    }

    #[tokio::test]
    async fn test_run_reuses_existing_translation() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!({"a": {"b": "hi"}, "c": "new"}));
        fx.write_raw(
            &fx.target_dir.join("zh").join("a.json"),
            r#"{"a": {"b": "你好"}, "stale": "旧"}"#,
        );

        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        fx.orchestrator("zh", mock.clone()).run().await.unwrap();

        assert_eq!(fx.read_target("zh", "a.json"), json!({"a": {"b": "你好"}, "c": "new_zh"}));
        assert_eq!(mock.requests(), vec!["new"]);
    }

    #[tokio::test]
    async fn test_second_run_makes_no_calls() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!({"title": "Title", "items": ["One", "Two"]}));

        let first = Arc::new(MockTranslator::new(MockMode::Suffix));
        fx.orchestrator("zh", first.clone()).run().await.unwrap();
        assert_eq!(first.call_count(), 3);
        let after_first = fx.read_target("zh", "a.json");

        let second = Arc::new(MockTranslator::new(MockMode::Suffix));
        fx.orchestrator("zh", second.clone()).run().await.unwrap();

        assert_eq!(second.call_count(), 0);
        assert_eq!(fx.read_target("zh", "a.json"), after_first);
    }

    #[tokio::test]
    async fn test_invalid_existing_translation_is_ignored() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!({"title": "Title"}));
        fx.write_raw(&fx.target_dir.join("zh").join("a.json"), "{ broken");

        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let summary = fx.orchestrator("zh", mock).run().await.unwrap();

        assert_eq!(summary.files_failed, 0);
        assert_eq!(fx.read_target("zh", "a.json"), json!({"title": "Title_zh"}));
    }

    #[tokio::test]
    async fn test_invalid_source_is_skipped() {
        let fx = Fixture::new();
        fx.write_raw(&fx.source_dir.join("bad.json"), "{ not json");
        fx.write_source("good.json", &json!({"ok": "OK"}));

        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let summary = fx.orchestrator("zh", mock).run().await.unwrap();

        assert_eq!(summary, RunSummary { files_written: 1, files_failed: 1 });
        assert!(!fx.target_dir.join("zh").join("bad.json").exists());
        assert_eq!(fx.read_target("zh", "good.json"), json!({"ok": "OK_zh"}));
    }

    #[tokio::test]
    async fn test_unwritable_target_is_skipped() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!({"x": "X"}));
        // A file where the locale directory should be.
        fx.write_raw(&fx.target_dir.join("zh"), "occupied");

        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let summary = fx.orchestrator("zh", mock).run().await.unwrap();

        assert_eq!(summary, RunSummary { files_written: 0, files_failed: 1 });
    }

    #[tokio::test]
    async fn test_missing_source_dir_is_fatal() {
        let fx = Fixture::new();
        let mut config = fx.config("zh");
        config.source_dir = fx.source_dir.join("missing");

        let orchestrator =
            FileOrchestrator::new(config, Arc::new(MockTranslator::new(MockMode::Suffix)));

        match orchestrator.run().await {
            Err(MtError::IoError(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected IoError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_calls_keep_source_text() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!({"save": "Save"}));

        let mock = Arc::new(MockTranslator::new(MockMode::Error("offline".to_string())));
        let summary = fx.orchestrator("zh", mock).run().await.unwrap();

        assert_eq!(summary.files_written, 1);
        assert_eq!(fx.read_target("zh", "a.json"), json!({"save": "Save"}));

        let log = fs::read_to_string(&fx.log_file).unwrap();
        assert!(log.contains("Original: Save\nTranslated: Save\n"));
    }

    #[test]
    fn test_source_files_skip_output_dirs() {
        let fx = Fixture::new();
        let mut config = fx.config("zh");
        config.source_dir = fx.target_dir.clone();
        fx.write_source("a.json", &json!({}));
        fx.write_raw(&fx.target_dir.join("zh").join("a.json"), "{}");

        let orchestrator =
            FileOrchestrator::new(config, Arc::new(MockTranslator::new(MockMode::Suffix)));
        let files = orchestrator.source_files().unwrap();

        assert_eq!(files, vec![fx.target_dir.join("en").join("a.json")]);
    }

    #[test]
    fn test_target_path() {
        let fx = Fixture::new();
        let orchestrator = fx.orchestrator("zh", Arc::new(MockTranslator::new(MockMode::Suffix)));
        let zh = Locale::parse("zh").unwrap();

        let target = orchestrator
            .target_path(&fx.source_dir.join("nested").join("a.json"), &zh)
            .unwrap();
        assert_eq!(target, fx.target_dir.join("zh").join("nested").join("a.json"));

        assert!(orchestrator.target_path(Path::new("/elsewhere/a.json"), &zh).is_err());
    }

    #[tokio::test]
    async fn test_process_file_returns_target() {
        let fx = Fixture::new();
        fx.write_source("a.json", &json!(["Yes", "No"]));
        let orchestrator = fx.orchestrator("zh", Arc::new(MockTranslator::new(MockMode::Suffix)));
        let translator = StringTranslator::new(
            Arc::new(MockTranslator::new(MockMode::Suffix)),
            Locale::parse("zh").unwrap(),
            TranslationLog::disabled(),
        );

        let target = orchestrator
            .process_file(&translator, &fx.source_dir.join("a.json"))
            .await
            .unwrap();

        assert_eq!(target, fx.target_dir.join("zh").join("a.json"));
        assert_eq!(fx.read_target("zh", "a.json"), json!(["Yes_zh", "No_zh"]));
    }
}
