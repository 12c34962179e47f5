//! Mock graph client for testing.
//!
//! Provides scripted responses for dry runs and tests, and records every
//! statement it receives.

use super::{GraphClient, Params, QueryResult, Row, FULL_SCHEMA_COLUMN, FULL_SCHEMA_QUERY};
use crate::error::{CleanupError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Result(QueryResult),
    Error { kind: String, message: String },
    Delay(Duration),
}

/// A mock graph client that returns predefined results.
///
/// Responses are matched by substring against the incoming statement; the
/// first matching script wins. Unmatched statements return an empty result.
/// Clones share the call log.
#[derive(Debug, Clone)]
pub struct MockGraphClient {
    database: String,
    scripts: Vec<(String, Scripted)>,
    latency: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGraphClient {
    /// Creates a new mock client for the named database.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            scripts: Vec::new(),
            latency: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns `result` for statements containing `pattern`.
    pub fn with_result(mut self, pattern: impl Into<String>, result: QueryResult) -> Self {
        self.scripts.push((pattern.into(), Scripted::Result(result)));
        self
    }

    /// Returns the given notifications (and no rows) for statements containing `pattern`.
    pub fn with_notifications(mut self, pattern: impl Into<String>, notifications: &[&str]) -> Self {
        let result = QueryResult {
            notifications: notifications.iter().map(|n| n.to_string()).collect(),
            ..QueryResult::default()
        };
        self.scripts.push((pattern.into(), Scripted::Result(result)));
        self
    }

    /// Fails statements containing `pattern` with a store error.
    pub fn with_error(
        mut self,
        pattern: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.scripts.push((
            pattern.into(),
            Scripted::Error {
                kind: kind.into(),
                message: message.into(),
            },
        ));
        self
    }

    /// Sleeps for `delay` before answering statements containing `pattern`.
    pub fn with_delay(mut self, pattern: impl Into<String>, delay: Duration) -> Self {
        self.scripts.push((pattern.into(), Scripted::Delay(delay)));
        self
    }

    /// Sleeps for `latency` before answering any statement.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answers the schema introspection query with `schema`.
    pub fn with_schema(self, schema: impl Into<String>) -> Self {
        let mut row = Row::new();
        row.insert(
            FULL_SCHEMA_COLUMN.to_string(),
            serde_json::Value::String(schema.into()),
        );
        self.with_result(FULL_SCHEMA_QUERY, QueryResult::with_rows(vec![row]))
    }

    /// Returns every statement received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Returns how many received statements contain `pattern`.
    pub fn call_count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|q| q.contains(pattern)).count()
    }
}

#[async_trait]
impl GraphClient for MockGraphClient {
    async fn run(&self, query: &str, _params: Option<&Params>) -> Result<QueryResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.to_string());
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let script = self
            .scripts
            .iter()
            .find(|(pattern, _)| query.contains(pattern.as_str()))
            .map(|(_, script)| script.clone());

        match script {
            Some(Scripted::Result(result)) => Ok(result),
            Some(Scripted::Error { kind, message }) => Err(CleanupError::query(kind, message)),
            Some(Scripted::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(QueryResult::new())
            }
            None => Ok(QueryResult::new()),
        }
    }

    fn database(&self) -> &str {
        &self.database
    }
}
