//! Mock LLM clients for testing.
//!
//! Provides deterministic responses based on input patterns.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{CleanupError, Result};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Without custom responses it judges every question clear and every query
/// faithful. Clones share the request log.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// User inputs received so far.
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the input contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Returns every user input received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Generates a mock response based on the input.
    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        // Check custom responses first
        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if input_lower.contains("vague or not") {
            return "clear".to_string();
        }

        if input_lower.contains("semantically reflects") {
            return "yes it reflects".to_string();
        }

        "I don't understand the request.".to_string()
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let input = Self::extract_user_input(messages);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(input.clone());
        }
        Ok(self.mock_response(&input))
    }
}

/// LLM client whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        Err(CleanupError::llm(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults_to_clear() {
        let client = MockLlmClient::new();
        let messages = vec![Message::user(
            "determine if the given user question is vague or not: How many movies?",
        )];

        assert_eq!(client.complete(&messages).await.unwrap(), "clear");
    }

    #[tokio::test]
    async fn test_mock_defaults_to_reflects() {
        let client = MockLlmClient::new();
        let messages = vec![Message::user(
            "determine whether given Cypher query semantically reflects the intent",
        )];

        assert_eq!(client.complete(&messages).await.unwrap(), "yes it reflects");
    }

    #[tokio::test]
    async fn test_mock_returns_unknown_response() {
        let client = MockLlmClient::new();
        let messages = vec![Message::user("What is the meaning of life?")];

        let response = client.complete(&messages).await.unwrap();

        assert!(response.contains("don't understand"));
    }

    #[tokio::test]
    async fn test_mock_custom_response_is_case_insensitive() {
        let client = MockLlmClient::new().with_response("SHOW STUFF", "vague");
        let messages = vec![
            Message::system("ignored"),
            Message::user("determine if the given user question is vague or not: show stuff"),
        ];

        assert_eq!(client.complete(&messages).await.unwrap(), "vague");
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = FailingLlmClient::new("connection refused");
        let err = client.complete(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: connection refused");
    }
}
