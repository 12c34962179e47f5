//! Query result types for the graph store.
//!
//! Defines the structures used to represent Cypher execution results and the
//! tagged outcome that replaces exception-style failure signalling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// A single result row: column name to value.
pub type Row = BTreeMap<String, serde_json::Value>;

/// Represents the result of executing a Cypher query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    /// Column names in result order.
    pub columns: Vec<String>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Plain-text notifications emitted by the store, in emission order.
    pub notifications: Vec<String>,

    /// Time taken to execute the query.
    #[serde(skip)]
    pub execution_time: Duration,
}

impl QueryResult {
    /// Creates a new empty query result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query result with the given rows; columns come from the first row.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Appends a notification.
    pub fn with_notification(mut self, notification: impl Into<String>) -> Self {
        self.notifications.push(notification.into());
        self
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the value of `column` in the first row, if any.
    pub fn first_value(&self, column: &str) -> Option<&serde_json::Value> {
        self.rows.first().and_then(|row| row.get(column))
    }
}

/// Why an execution failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The configured execution timeout elapsed.
    Timeout,
    /// The request never produced a store response (connect, TLS, decode).
    Transport,
    /// The store rejected the query; carries its status code,
    /// e.g. `Neo.ClientError.Statement.SyntaxError`.
    Store(String),
}

impl FailureKind {
    /// Short failure name, e.g. `SyntaxError` for a store syntax error code.
    pub fn name(&self) -> &str {
        match self {
            Self::Timeout => "Timeout",
            Self::Transport => "TransportError",
            Self::Store(code) => code.rsplit('.').next().unwrap_or(code),
        }
    }
}

/// A recovered execution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ExecutionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

/// Outcome of [`QueryExecutor::execute`](crate::graph::QueryExecutor::execute).
///
/// Execution never raises; a failed run is a value the caller must match on.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Completed(QueryResult),
    Failed(ExecutionFailure),
}
