use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use reqwest::Client;
use tracing::{debug, error};

use crate::document::ContentDocument;
use crate::error::{Result, AppError};

pub const PROMPT_TEMPLATE: &str = "Provide a summary of the following content in ~300 words.
Content:
{text}
";

/// Substitutes the documents into the prompt template, separated by blank lines.
pub fn render_prompt(docs: &[ContentDocument]) -> String {
    let content = docs
        .iter()
        .map(|doc| doc.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    PROMPT_TEMPLATE.replacen("{text}", &content, 1)
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, docs: &[ContentDocument]) -> Result<String>;
}

/// Hands out a summarizer bound to an API key.
pub trait SummarizerProvider: Send + Sync {
    fn for_key(&self, api_key: &str) -> Arc<dyn Summarizer>;
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
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
    content: Option<String>,
}

/// OpenAI-compatible chat completion client.
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "user".into(),
                    content: prompt.into(),
                }
            ],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to reach LLM API");
                AppError::LlmError(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %message, "LLM API returned an error");
            return Err(AppError::LlmError(format!("{} - {}", status, message)));
        }

        let response: ChatResponse = res
            .json()
            .await
            .map_err(|e| AppError::LlmError(format!("Invalid response format from LLM: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(&self, docs: &[ContentDocument]) -> Result<String> {
        let prompt = render_prompt(docs);
        debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting summary");
        self.complete(&prompt).await
    }
}

/// One `LlmClient` per API key, built on first use and kept for the life of
/// the process.
pub struct LlmClientCache {
    base_url: String,
    model: String,
    clients: Mutex<HashMap<String, Arc<LlmClient>>>,
}

impl LlmClientCache {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, api_key: &str) -> Arc<LlmClient> {
        let mut clients = self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        clients
            .entry(api_key.to_string())
            .or_insert_with(|| {
                debug!(model = %self.model, "Building LLM client");
                Arc::new(LlmClient::new(api_key, &self.base_url, &self.model))
            })
            .clone()
    }
}

impl SummarizerProvider for LlmClientCache {
    fn for_key(&self, api_key: &str) -> Arc<dyn Summarizer> {
        self.get(api_key)
    }
}
