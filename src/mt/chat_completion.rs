//! Chat-completion API provider for machine translation
//!
//! This module talks to an OpenAI-compatible `/chat/completions` endpoint
//! (DeepSeek by default). Each call sends one system message carrying the
//! translation rules and one user message carrying the masked text.
//!
//! # Authentication
//!
//! The API key is passed in through [`ChatCompletionSettings`]; the provider
//! never reads the environment itself.
//!
//! # Example
//!
//! ```ignore
//! use i18n_llm_translate::mt::{ChatCompletionProvider, ChatCompletionSettings, Locale};
//!
//! let settings = ChatCompletionSettings::new("sk-...".to_string());
//! let provider = ChatCompletionProvider::new(settings)?;
//! let zh = Locale::parse("zh")?;
//! let raw = provider.translate("Settings", &zh).await?;
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{Locale, MachineTranslator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Connection settings for a chat-completion endpoint
#[derive(Clone)]
pub struct ChatCompletionSettings {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    /// Optional HTTPS proxy, e.g. `http://127.0.0.1:7890`
    pub proxy: Option<String>,
    pub timeout: Duration,
}

impl ChatCompletionSettings {
    pub fn new(api_key: String) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            proxy: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl std::fmt::Debug for ChatCompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionSettings")
            .field("api_base", &self.api_base)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    stream: bool,
    max_tokens: u32,
    stop: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// UI phrases shown to the model as style examples for Simplified Chinese
const ZH_EXAMPLES: &[(&str, &str)] = &[
    ("Subscription canceled", "订阅已取消"),
    (
        "Your subscription is scheduled to be canceled on {{- endDate }}.",
        "您的订阅将于 {{- endDate }} 取消",
    ),
    ("Thank you for subscribing", "感谢订阅"),
    ("All", "全部"),
    ("Details", "详情"),
    ("Settings", "设置"),
    ("Log", "日志"),
    ("Actions", "操作"),
    ("Status", "状态"),
    ("Active", "活跃"),
    ("Inactive", "未激活"),
    ("Loading...", "加载中..."),
    ("Error", "错误"),
    ("Success", "成功"),
    ("Warning", "警告"),
    ("Info", "信息"),
    ("Close", "关闭"),
    ("Save", "保存"),
    ("Cancel", "取消"),
    ("Delete", "删除"),
    ("Edit", "编辑"),
    ("View", "查看"),
    ("Next", "下一步"),
    ("Previous", "上一步"),
    ("Back", "返回"),
    ("Continue", "继续"),
    ("Finish", "完成"),
    ("Start", "开始"),
    ("Submit", "提交"),
    ("Reset", "重置"),
];

/// Build the fixed system instruction for one target language
pub fn system_prompt(target: &Locale) -> String {
    let mut prompt = format!(
        "You are a professional web UI translator. Translate English interface text into {}. Follow these rules:\n\n\
         1. Keep a concise, professional UI style\n\
         2. Keep technical terms and variables unchanged\n\
         3. Do not add any explanation or extra content\n\
         4. Keep punctuation consistent with the original\n\
         5. If you are unsure of the translation, return an empty string",
        target.display_name
    );

    if target.language() == "zh" && !target.code.eq_ignore_ascii_case("zh-TW") {
        prompt.push_str("\n\nCommon UI translation examples:\n");
        for (source, translated) in ZH_EXAMPLES {
            prompt.push_str(&format!("\"{}\" -> \"{}\"\n", source, translated));
        }
    }

    prompt
}

/// OpenAI-compatible chat-completion provider
#[derive(Clone)]
pub struct ChatCompletionProvider {
    settings: ChatCompletionSettings,
    client: reqwest::Client,
}

impl ChatCompletionProvider {
    const TEMPERATURE: f32 = 0.1;
    const TOP_P: f32 = 0.7;
    const MAX_TOKENS: u32 = 2000;

    /// Create a provider, routing through the configured proxy if any
    ///
    /// # Returns
    ///
    /// * `Err(MtError::ConfigError)` - If the API key is empty or the proxy URL is invalid
    /// * `Err(MtError::NetworkError)` - If the HTTP client cannot be built
    pub fn new(settings: ChatCompletionSettings) -> MtResult<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let mut builder = reqwest::Client::builder().timeout(settings.timeout);
        if let Some(proxy_url) = settings.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::https(proxy_url).map_err(|e| {
                MtError::ConfigError(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        )
    }

    /// Pull the first choice's content out of a response body
    fn extract_content(body: ChatResponse) -> MtResult<String> {
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                MtError::TranslationError(
                    "Invalid API response: missing 'choices[0].message.content'".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for ChatCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionProvider")
            .field("settings", &self.settings)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for ChatCompletionProvider {
    async fn translate(&self, text: &str, target: &Locale) -> MtResult<String> {
        let prompt = system_prompt(target);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: Self::TEMPERATURE,
            top_p: Self::TOP_P,
            stream: false,
            max_tokens: Self::MAX_TOKENS,
            stop: Vec::new(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("API client error ({}): {}", status, error_text))
            } else {
                MtError::TranslationError(format!("API server error ({}): {}", status, error_text))
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;

        Self::extract_content(body)
    }

    fn provider_name(&self) -> &str {
        "Chat Completion"
    }
}
