//! Error types for the cleanup pipeline.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for cleanup operations.
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Graph store connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors reported by the graph store.
    #[error("Query error: {kind}: {message}")]
    Query { kind: String, message: String },

    /// Schema introspection failed for a database alias.
    #[error("Schema error: {0}")]
    Schema(String),

    /// LLM API errors (rate limits, auth, timeouts, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// The model answered with something outside the allowed label set.
    #[error("Classification error: {output:?} is not one of {allowed:?}")]
    Classification {
        output: String,
        allowed: Vec<&'static str>,
    },

    /// Configuration errors (invalid config file, unknown alias, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset loading or writing errors (malformed record, I/O, etc.)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CleanupError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the store's failure kind and message.
    pub fn query(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Query {
            kind: kind.into(),
            message: msg.into(),
        }
    }

    /// Creates a schema error with the given message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a classification error for an out-of-set model answer.
    pub fn classification(output: impl Into<String>, allowed: Vec<&'static str>) -> Self {
        Self::Classification {
            output: output.into(),
            allowed,
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a dataset error with the given message.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for failures of the language-model call itself.
    pub fn is_llm_failure(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::Classification { .. })
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query { .. } => "Query Error",
            Self::Schema(_) => "Schema Error",
            Self::Llm(_) => "LLM Error",
            Self::Classification { .. } => "Classification Error",
            Self::Config(_) => "Configuration Error",
            Self::Dataset(_) => "Dataset Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using CleanupError.
pub type Result<T> = std::result::Result<T, CleanupError>;
