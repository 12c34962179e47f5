//! LLM integration for the advisory checks.
//!
//! Provides the client trait, provider implementations and closed-label
//! classification on top of free-text completions.

pub mod choice;
pub mod factory;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod types;
pub mod verdict;

pub use factory::create_client;
pub use mock::{FailingLlmClient, MockLlmClient};
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{Message, Role};
pub use verdict::{classify, QueryFidelity, QuestionClarity, Verdict};

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages.
    ///
    /// Returns the complete response as a single string.
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Generates a completion that must be one of `labels`.
    ///
    /// Providers with constrained decoding restrict the output to the label
    /// set. The default sends a plain completion.
    async fn choose(&self, messages: &[Message], _labels: &[&'static str]) -> Result<String> {
        self.complete(messages).await
    }
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// OpenAI or any OpenAI-compatible chat completions server
    #[default]
    OpenAi,
    /// Local Ollama instance
    Ollama,
    /// Mock client for testing (no API key required)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
