use clap::Parser;
use i18n_llm_translate::config::{
    DEFAULT_LOCALES, DEFAULT_LOG_FILE, DEFAULT_SOURCE_DIR, DEFAULT_TARGET_BASE_DIR,
};
use i18n_llm_translate::mt::chat_completion::{DEFAULT_API_BASE, DEFAULT_MODEL};
use i18n_llm_translate::mt::{ChatCompletionSettings, Locale};
use i18n_llm_translate::{Config, FileOrchestrator, Pacing, ProviderConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// Translate English JSON UI resources into other locales with a language model
#[derive(Debug, Parser)]
#[command(name = "i18n-llm-translate", version)]
struct Args {
    /// Directory with the English *.json resource files
    #[arg(long, env = "SOURCE_DIR", default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Output root; files go to <target-base-dir>/<locale>/...
    #[arg(long, env = "TARGET_BASE_DIR", default_value = DEFAULT_TARGET_BASE_DIR)]
    target_base_dir: PathBuf,

    /// Comma-separated target locales, `code=Display Name` or a known bare code
    #[arg(long, env = "TARGET_LOCALES", default_value = DEFAULT_LOCALES)]
    locales: String,

    /// HTTPS proxy for API requests
    #[arg(long, env = "HTTPS_PROXY")]
    proxy: Option<String>,

    /// API key for the chat-completion endpoint
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "TRANSLATE_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Model name sent with every request
    #[arg(long, env = "TRANSLATE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Append-only log of every translation attempt
    #[arg(long, env = "TRANSLATION_LOG", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Pause after each translated string, in milliseconds
    #[arg(long, env = "TRANSLATE_DELAY_MS", default_value_t = 100)]
    delay_ms: u64,

    /// Use the offline mock translator instead of the API
    #[arg(long, short = 'm')]
    mock: bool,
}

impl Args {
    fn into_config(self) -> Result<Config, Box<dyn std::error::Error>> {
        let provider = if self.mock {
            ProviderConfig::Mock
        } else {
            let mut settings = ChatCompletionSettings::new(self.api_key.unwrap_or_default());
            settings.api_base = self.api_base;
            settings.model = self.model;
            settings.proxy = self.proxy;
            ProviderConfig::ChatCompletion(settings)
        };

        let config = Config {
            source_dir: self.source_dir,
            target_base_dir: self.target_base_dir,
            locales: Locale::parse_list(&self.locales)?,
            log_file: Some(self.log_file),
            pacing: Pacing::new(Duration::from_millis(self.delay_ms)),
            provider,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config().inspect_err(|e| {
        error!("✗ Invalid configuration: {}", e);
    })?;

    let locales: Vec<&str> = config.locales.iter().map(|l| l.code.as_str()).collect();
    info!("🌐 Target languages: {}", locales.join(", "));

    let translator = config.build_translator()?;
    let orchestrator = FileOrchestrator::new(config, translator);

    match orchestrator.run().await {
        Ok(summary) => {
            info!(
                "✓ Translation process completed: {} written, {} failed",
                summary.files_written, summary.files_failed
            );
            Ok(())
        }
        Err(e) => {
            error!("✗ Translation process failed: {}", e);
            Err(e.into())
        }
    }
}
