//! Text-generation backends: a local Ollama server or an OpenAI-compatible
//! chat completions API, picked once from configuration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::GenerationError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_SYSTEM_PROMPT: &str = "You are a helpful and encouraging chess coach.";

/// Anything that turns a prompt into coaching text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Complete `prompt` in at most `max_tokens` tokens. Any error means
    /// "no text available"; callers fall back to rule-based text.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError>;
}

/// Coaching backend settings.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// `ollama`, `openai`, or `none`/`off`/`rules` for rule-based text only
    pub backend: String,
    /// Rating the coaching text is pitched at
    pub player_elo: u32,
    pub ollama_host: String,
    pub ollama_model: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: "ollama".to_string(),
            player_elo: 1000,
            ollama_host: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            openai_api_key: String::new(),
            openai_model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

fn http_client(timeout_secs: u64) -> Result<Client, GenerationError> {
    Ok(Client::builder()
        .user_agent("ChessCoach/1.0")
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

fn non_empty(text: &str) -> Result<String, GenerationError> {
    let text = text.trim();
    if text.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

pub struct OllamaBackend {
    client: Client,
    host: String,
    model: String,
}

#[derive(Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

impl OllamaBackend {
    pub fn new(host: &str, model: &str, timeout_secs: u64) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.host);
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "num_predict": max_tokens },
        });
        debug!(url = %url, model = %self.model, max_tokens, "Ollama request");

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                GenerationError::Unavailable(format!(
                    "Ollama not reachable at {} ({e}); start it with `ollama serve` and `ollama pull {}`",
                    self.host, self.model
                ))
            })?
            .error_for_status()?;

        let body: OllamaResponse = resp.json().await?;
        non_empty(&body.response)
    }
}

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    model: String,
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
            url: OPENAI_CHAT_URL.to_string(),
        })
    }

    /// Point at another OpenAI-compatible endpoint.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": OPENAI_SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": max_tokens,
        });
        debug!(url = %self.url, model = %self.model, max_tokens, "OpenAI request");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(format!("OpenAI not reachable: {e}")))?
            .error_for_status()?;

        let body: ChatResponse = resp.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        non_empty(&content)
    }
}

/// The configured backend. `Disabled` never produces text.
pub enum Backend {
    Ollama(OllamaBackend),
    OpenAi(OpenAiBackend),
    Disabled,
}

impl Backend {
    /// `openai` needs an API key; without one the local Ollama server is used.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let choice = config.backend.trim().to_ascii_lowercase();
        let backend = match choice.as_str() {
            "none" | "off" | "rules" => Backend::Disabled,
            "openai" if !config.openai_api_key.is_empty() => Backend::OpenAi(OpenAiBackend::new(
                &config.openai_api_key,
                &config.openai_model,
                config.timeout_secs,
            )?),
            _ => Backend::Ollama(OllamaBackend::new(
                &config.ollama_host,
                &config.ollama_model,
                config.timeout_secs,
            )?),
        };
        info!(requested = %choice, backend = backend.name(), "Coaching backend selected");
        Ok(backend)
    }
}

#[async_trait]
impl TextGenerator for Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Ollama(b) => b.name(),
            Backend::OpenAi(b) => b.name(),
            Backend::Disabled => "disabled",
        }
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        match self {
            Backend::Ollama(b) => b.generate(prompt, max_tokens).await,
            Backend::OpenAi(b) => b.generate(prompt, max_tokens).await,
            Backend::Disabled => Err(GenerationError::Unavailable(
                "text generation disabled".into(),
            )),
        }
    }
}
