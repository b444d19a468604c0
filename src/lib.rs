//! Incremental machine translation of JSON UI-string resources
//!
//! English resource files are walked key by key. Strings that already have a
//! translation in the locale's output file are kept; everything else is sent
//! to a language-model API with its template variables and component tags
//! masked, and the translated tree is written back per locale.

pub mod config;
pub mod merge;
pub mod mt;
pub mod orchestrator;
pub mod translation_log;

// Re-export the pipeline types for convenient access
pub use config::{Config, ProviderConfig};
pub use merge::{MergeStats, Pacing, TreeMerger};
pub use mt::{Locale, MachineTranslator, MtError, MtResult, StringTranslator};
pub use orchestrator::{FileOrchestrator, RunSummary};
pub use translation_log::{TranslationEntry, TranslationLog};
