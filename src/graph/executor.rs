//! Query execution with failure capture.
//!
//! Wraps a [`GraphClient`] with a fixed timeout. Ordinary execution never
//! returns an error: failures come back as [`ExecutionOutcome::Failed`] so the
//! caller can keep classifying. Scalar fetches for schema introspection do
//! propagate errors.

use std::time::Duration;

use tracing::{debug, warn};

use super::{
    ExecutionFailure, ExecutionOutcome, FailureKind, GraphClient, Params, FULL_SCHEMA_COLUMN,
    FULL_SCHEMA_QUERY, TIMEOUT_KIND,
};
use crate::error::{CleanupError, Result};

/// Executes Cypher against one database.
pub struct QueryExecutor {
    client: Box<dyn GraphClient>,
    timeout: Duration,
}

impl QueryExecutor {
    /// Creates a new executor with the given execution timeout.
    pub fn new(client: Box<dyn GraphClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Name of the target database.
    pub fn database(&self) -> &str {
        self.client.database()
    }

    /// Runs `query` verbatim and captures any failure as a value.
    pub async fn execute(&self, query: &str, params: Option<&Params>) -> ExecutionOutcome {
        debug!("Executing query on database: {}", self.database());

        match tokio::time::timeout(self.timeout, self.client.run(query, params)).await {
            Ok(Ok(result)) => {
                debug!(
                    "Query executed in {:?} with {} notification(s)",
                    result.execution_time,
                    result.notifications.len()
                );
                ExecutionOutcome::Completed(result)
            }
            Ok(Err(e)) => {
                let failure = failure_from_error(e);
                warn!("Query failed on {}: {}", self.database(), failure);
                ExecutionOutcome::Failed(failure)
            }
            Err(_) => {
                let failure = ExecutionFailure::new(
                    FailureKind::Timeout,
                    format!("Query timed out after {:?}", self.timeout),
                );
                warn!("Query failed on {}: {}", self.database(), failure);
                ExecutionOutcome::Failed(failure)
            }
        }
    }

    /// Validates `query` by planning it with `EXPLAIN`; nothing is read or written.
    pub async fn explain(&self, query: &str) -> ExecutionOutcome {
        self.execute(&format!("EXPLAIN {}", query), None).await
    }

    /// Runs `query` and returns `column` of the first row as text.
    ///
    /// String values are returned as-is, any other JSON value in its
    /// serialized form.
    pub async fn fetch_scalar(&self, query: &str, column: &str) -> Result<String> {
        let result = tokio::time::timeout(self.timeout, self.client.run(query, None))
            .await
            .map_err(|_| {
                CleanupError::query(
                    TIMEOUT_KIND,
                    format!("Query timed out after {:?}", self.timeout),
                )
            })??;

        match result.first_value(column) {
            Some(serde_json::Value::String(text)) => Ok(text.clone()),
            Some(value) => Ok(value.to_string()),
            None => Err(CleanupError::schema(format!(
                "Column '{}' missing from first row on {}",
                column,
                self.database()
            ))),
        }
    }

    /// Fetches the human-readable schema of the target database.
    pub async fn fetch_schema(&self) -> Result<String> {
        self.fetch_scalar(FULL_SCHEMA_QUERY, FULL_SCHEMA_COLUMN)
            .await
            .map_err(|e| match e {
                CleanupError::Schema(_) => e,
                other => CleanupError::schema(format!(
                    "Schema fetch failed on {}: {}",
                    self.database(),
                    other
                )),
            })
    }
}

/// Maps a client error onto a failure kind.
fn failure_from_error(e: CleanupError) -> ExecutionFailure {
    match e {
        CleanupError::Query { kind, message } if kind == TIMEOUT_KIND => {
            ExecutionFailure::new(FailureKind::Timeout, message)
        }
        CleanupError::Query { kind, message } => {
            ExecutionFailure::new(FailureKind::Store(kind), message)
        }
        other => ExecutionFailure::new(FailureKind::Transport, other.to_string()),
    }
}
