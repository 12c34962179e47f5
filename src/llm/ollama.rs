//! Ollama chat client for locally hosted models.
//!
//! Label judgments pass the answer schema in Ollama's `format` field, which
//! turns on grammar-constrained decoding.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{CleanupError, Result};
use crate::llm::choice::{answer_schema, extract_answer};
use crate::llm::types::Message;
use crate::llm::LlmClient;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Model tag (e.g., "llama3.2:3b", "qwen2.5:7b").
    pub model: String,
    pub timeout_secs: u64,
}

impl OllamaConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_MODEL)
    }
}

/// Ollama LLM client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CleanupError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }

    /// Non-streaming, zero-temperature request; `labels` become a `format` schema.
    fn build_request(&self, messages: &[Message], labels: Option<&[&str]>) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            format: labels.map(answer_schema),
            options: ChatOptions { temperature: 0.0 },
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(self.chat_url())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CleanupError::llm("Request to Ollama timed out.")
                } else if e.is_connect() {
                    CleanupError::llm(format!(
                        "Failed to connect to Ollama at {}. Is `ollama serve` running?",
                        self.config.base_url
                    ))
                } else {
                    CleanupError::llm(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CleanupError::llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(CleanupError::llm(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        message_content(&body)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.send(&self.build_request(messages, None)).await
    }

    async fn choose(&self, messages: &[Message], labels: &[&'static str]) -> Result<String> {
        let content = self.send(&self.build_request(messages, Some(labels))).await?;
        Ok(extract_answer(&content))
    }
}

fn message_content(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CleanupError::llm(format!("Failed to parse Ollama response: {}", e)))?;
    Ok(response.message.content)
}

// /api/chat wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}
