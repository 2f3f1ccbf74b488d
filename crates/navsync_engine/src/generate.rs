//! Text generation for link descriptions (Gemini or OpenAI-compatible).

use std::time::Duration;

use navsync_logging::{nav_debug, nav_info};
use serde::{Deserialize, Serialize};

use crate::types::map_reqwest_error;
use crate::{FailureKind, RemoteError};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

const GEMINI_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiProvider {
    #[default]
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    /// Empty means the provider's public endpoint.
    pub base_url: String,
    /// Empty means the provider's default model.
    pub model: String,
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn effective_base_url(&self) -> &str {
        let base = self.base_url.trim();
        if !base.is_empty() {
            return base.trim_end_matches('/');
        }
        match self.provider {
            AiProvider::Gemini => DEFAULT_GEMINI_URL,
            AiProvider::OpenAi => DEFAULT_OPENAI_URL,
        }
    }

    pub fn effective_model(&self) -> &str {
        let model = self.model.trim();
        if !model.is_empty() {
            return model;
        }
        match self.provider {
            AiProvider::Gemini => DEFAULT_GEMINI_MODEL,
            AiProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// The external text-generation collaborator.
#[async_trait::async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// False when credentials are missing; no call may be made then.
    fn is_configured(&self) -> bool;

    async fn generate(&self, title: &str, url: &str) -> Result<String, RemoteError>;
}

pub fn description_prompt(title: &str, url: &str) -> String {
    format!(
        "Write a short description (one sentence, at most 30 words) of the website below \
         for a bookmark list. Reply with the description only.\nTitle: {title}\nURL: {url}"
    )
}

// Gemini wire types.

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

// OpenAI wire types.

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct HttpDescriptionGenerator {
    config: AiConfig,
    client: reqwest::Client,
}

impl HttpDescriptionGenerator {
    pub fn new(config: AiConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|err| RemoteError::new(FailureKind::Network, err.to_string()))?;
        nav_info!(
            "Description generator: provider={:?} model={}",
            config.provider,
            config.effective_model()
        );
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    async fn generate_gemini(&self, prompt: String) -> Result<String, RemoteError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.effective_base_url(),
            self.config.effective_model()
        );
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(&url)
            .header(GEMINI_KEY_HEADER, self.config.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response: GeminiResponse = check_status(response)?
            .json()
            .await
            .map_err(map_reqwest_error)?;

        let text = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<String>();
        Ok(text)
    }

    async fn generate_openai(&self, prompt: String) -> Result<String, RemoteError> {
        let url = format!("{}/chat/completions", self.config.effective_base_url());
        let body = ChatCompletionRequest {
            model: self.config.effective_model(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: 0.3,
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response: ChatCompletionResponse = check_status(response)?
            .json()
            .await
            .map_err(map_reqwest_error)?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl DescriptionGenerator for HttpDescriptionGenerator {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn generate(&self, title: &str, url: &str) -> Result<String, RemoteError> {
        if !self.is_configured() {
            return Err(RemoteError::not_configured("ai api key"));
        }
        nav_debug!("Generating description for {}", url);
        let prompt = description_prompt(title, url);
        let raw = match self.config.provider {
            AiProvider::Gemini => self.generate_gemini(prompt).await?,
            AiProvider::OpenAi => self.generate_openai(prompt).await?,
        };
        let description = raw.trim().trim_matches('"').trim().to_string();
        if description.is_empty() {
            return Err(RemoteError::new(
                FailureKind::Generation,
                "empty completion",
            ));
        }
        Ok(description)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}
