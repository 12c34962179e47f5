//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::config::LlmConfig;
use crate::error::{CleanupError, Result};
use crate::llm::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::llm::{
    LlmClient, LlmProvider, MockLlmClient, OllamaClient, OllamaConfig, OpenAiClient, OpenAiConfig,
};

/// Default OpenAI model when neither config nor `OPENAI_MODEL` names one.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Creates an LLM client from the `[llm]` config section.
///
/// Model selection, in order: the config `model`, then the environment
/// (`OPENAI_MODEL` / `OLLAMA_MODEL`), then the provider default. The OpenAI
/// key always comes from `OPENAI_API_KEY`; the Ollama URL from the config
/// `base_url`, then `OLLAMA_URL`.
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    let provider: LlmProvider = config
        .provider
        .parse()
        .map_err(|e: String| CleanupError::config(e))?;

    match provider {
        LlmProvider::OpenAi => {
            let key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                CleanupError::llm("No API key configured. Set OPENAI_API_KEY.")
            })?;
            let model = config
                .model
                .clone()
                .or_else(|| std::env::var("OPENAI_MODEL").ok())
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

            let mut openai = OpenAiConfig::new(key, model).with_timeout(config.timeout_secs);
            if let Some(url) = &config.base_url {
                openai = openai.with_url(url.clone());
            }
            Ok(Box::new(OpenAiClient::new(openai)?))
        }
        LlmProvider::Ollama => {
            let model = config
                .model
                .clone()
                .or_else(|| std::env::var("OLLAMA_MODEL").ok())
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
            let url = config
                .base_url
                .clone()
                .or_else(|| std::env::var("OLLAMA_URL").ok())
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

            let ollama = OllamaConfig::new(model)
                .with_url(url)
                .with_timeout(config.timeout_secs);
            Ok(Box::new(OllamaClient::new(ollama)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
