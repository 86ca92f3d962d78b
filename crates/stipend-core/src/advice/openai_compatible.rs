//! OpenAI-compatible chat completions backend
//!
//! Works with api.openai.com and any server implementing
//! `POST /v1/chat/completions` (vLLM, LocalAI, llama-server, ...).

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdviceBackend, AdviceRequest};
use crate::config::AdviceConfig;
use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
    prompts: PromptLibrary,
}

impl OpenAICompatibleBackend {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let defaults = AdviceConfig::default();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            prompts: PromptLibrary::new(),
        }
    }

    /// Create from config; None when no API key is configured
    pub fn from_config(config: &AdviceConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?;
        let mut backend = Self::new(&config.host, &config.model, api_key);
        backend.max_tokens = config.max_tokens;
        backend.temperature = config.temperature;
        Some(backend)
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    fn build_messages(&self, request: &AdviceRequest) -> Result<Vec<ChatMessage>> {
        let prompt = self.prompts.load(PromptId::BudgetAdvisor)?;

        let owned = request.context.prompt_vars();
        let mut vars: HashMap<&str, &str> =
            owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        vars.insert("question", request.question.as_str());

        Ok(vec![
            ChatMessage {
                role: "system".to_string(),
                content: prompt.render_system(&vars),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt.render_user(&vars),
            },
        ])
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl AdviceBackend for OpenAICompatibleBackend {
    async fn complete(&self, request: &AdviceRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(request)?,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!(model = %self.model, host = %self.base_url, "Requesting advice completion");

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::AdviceUnavailable(format!(
                "advice endpoint returned {}: {}",
                status, text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::AdviceUnavailable("empty completion".into()))
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
