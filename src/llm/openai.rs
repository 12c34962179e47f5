//! OpenAI chat completions client.
//!
//! Works with api.openai.com and any server exposing the same endpoint
//! (vLLM, llama.cpp server). Label judgments are sent with a strict
//! `json_schema` response format so the reply is always one of the labels.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CleanupError, Result};
use crate::llm::choice::{answer_schema, extract_answer};
use crate::llm::types::Message;
use crate::llm::LlmClient;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Attempts per request when the failure is transient.
const MAX_ATTEMPTS: u32 = 3;

/// First backoff delay; doubles after every failed attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

/// Schema name reported to the API for label judgments.
const VERDICT_SCHEMA_NAME: &str = "verdict";

/// OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_BASE.to_string(),
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

/// A failed attempt and whether another one may succeed.
struct AttemptError {
    error: CleanupError,
    transient: bool,
}

impl AttemptError {
    fn permanent(error: CleanupError) -> Self {
        Self {
            error,
            transient: false,
        }
    }

    fn transient(error: CleanupError) -> Self {
        Self {
            error,
            transient: true,
        }
    }
}

/// OpenAI LLM client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    /// Creates a new OpenAI client with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CleanupError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Builds a deterministic request, constrained to `labels` when given.
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
            temperature: 0.0,
            response_format: labels.map(|labels| ResponseFormat {
                kind: "json_schema",
                json_schema: NamedSchema {
                    name: VERDICT_SCHEMA_NAME,
                    strict: true,
                    schema: answer_schema(labels),
                },
            }),
        }
    }

    /// Sends `request`, retrying transient failures with exponential backoff.
    async fn send(&self, request: &ChatRequest) -> Result<String> {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 1;

        loop {
            debug!("OpenAI request attempt {}/{}", attempt, MAX_ATTEMPTS);
            match self.try_once(request).await {
                Ok(content) => return Ok(content),
                Err(failure) if failure.transient && attempt < MAX_ATTEMPTS => {
                    warn!(
                        "OpenAI request failed (attempt {}): {}; retrying in {:?}",
                        attempt, failure.error, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn try_once(&self, request: &ChatRequest) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(request_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AttemptError::permanent(CleanupError::llm(format!(
                "Failed to read response: {}",
                e
            )))
        })?;

        if !status.is_success() {
            return Err(status_failure(status, &body));
        }

        first_choice(&body).map_err(AttemptError::permanent)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.send(&self.build_request(messages, None)).await
    }

    async fn choose(&self, messages: &[Message], labels: &[&'static str]) -> Result<String> {
        let content = self.send(&self.build_request(messages, Some(labels))).await?;
        Ok(extract_answer(&content))
    }
}

/// Classifies a non-2xx response. Rate limits and server errors are transient.
fn status_failure(status: StatusCode, body: &str) -> AttemptError {
    match status {
        StatusCode::UNAUTHORIZED => AttemptError::permanent(CleanupError::llm(
            "Authentication failed. Check your OPENAI_API_KEY.",
        )),
        StatusCode::TOO_MANY_REQUESTS => {
            AttemptError::transient(CleanupError::llm("Rate limited by the OpenAI API."))
        }
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|b| format!("OpenAI API error: {}", b.error.message))
                .unwrap_or_else(|_| format!("OpenAI API error ({}): {}", status, body));
            AttemptError {
                error: CleanupError::llm(message),
                transient: status.is_server_error(),
            }
        }
    }
}

/// Timeouts and refused connections are transient.
fn request_failure(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::transient(CleanupError::llm("Request timed out."))
    } else if e.is_connect() {
        AttemptError::transient(CleanupError::llm(
            "Failed to connect to the OpenAI API. Check your network.",
        ))
    } else {
        AttemptError::permanent(CleanupError::llm(format!("Request failed: {}", e)))
    }
}

/// Content of the first choice in a completion body.
fn first_choice(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CleanupError::llm(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| CleanupError::llm("No choices in OpenAI response"))
}

// Chat completions wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: NamedSchema,
}

#[derive(Debug, Serialize)]
struct NamedSchema {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
