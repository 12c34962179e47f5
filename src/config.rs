//! Configuration management for the cleanup pipeline.
//!
//! Handles loading configuration from TOML files and environment variables,
//! covering the graph server, the LLM provider, detection policy and output.

use crate::error::{CleanupError, Result};
use crate::graph::DatabaseAlias;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// HTTP endpoint of the Neo4j Labs demo server.
pub const DEMO_HTTP_URL: &str = "https://demo.neo4jlabs.com:7473";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Graph server configuration.
    #[serde(default)]
    pub graph: GraphConfig,

    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Detection policy.
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Graph server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Base URL of the Neo4j HTTP endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Database used for records without an alias (explain-only checks).
    #[serde(default = "default_fallback_database")]
    pub fallback_database: String,

    /// User for the fallback database; defaults to the database name.
    pub fallback_user: Option<String>,

    /// Password for the fallback database; defaults to the database name.
    pub fallback_password: Option<String>,

    /// Query execution timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEMO_HTTP_URL.to_string()
}

fn default_fallback_database() -> String {
    DatabaseAlias::Northwind.database_name().to_string()
}

fn default_query_timeout() -> u64 {
    30
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fallback_database: default_fallback_database(),
            fallback_user: None,
            fallback_password: None,
            timeout_secs: default_query_timeout(),
        }
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "openai", "ollama" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name; the provider's environment variable or default applies when absent.
    pub model: Option<String>,

    /// Override for the provider's base URL.
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Detection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Abort the run when the model call fails instead of skipping the advisory tags.
    #[serde(default)]
    pub fail_on_llm_error: bool,

    /// Run the model-backed ambiguity and accuracy checks.
    #[serde(default = "default_true")]
    pub semantic_checks: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fail_on_llm_error: false,
            semantic_checks: true,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the cleaned split.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Also write every record with its issues column.
    #[serde(default)]
    pub annotated: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            annotated: false,
        }
    }
}

/// Connection settings for one database on the graph server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Base URL of the HTTP endpoint.
    pub base_url: String,

    /// Database name.
    pub database: String,

    /// Database user.
    pub user: String,

    /// Database password.
    pub password: String,

    /// Query execution timeout in seconds.
    pub timeout_secs: u64,
}

impl ConnectionConfig {
    /// Connection for a demo database alias; credentials equal the database name.
    pub fn for_alias(graph: &GraphConfig, alias: DatabaseAlias) -> Self {
        let name = alias.database_name();
        Self {
            base_url: graph.base_url.clone(),
            database: name.to_string(),
            user: name.to_string(),
            password: name.to_string(),
            timeout_secs: graph.timeout_secs,
        }
    }

    /// Connection for records carrying no alias.
    pub fn fallback(graph: &GraphConfig) -> Self {
        let name = graph.fallback_database.clone();
        Self {
            base_url: graph.base_url.clone(),
            user: graph.fallback_user.clone().unwrap_or_else(|| name.clone()),
            password: graph
                .fallback_password
                .clone()
                .unwrap_or_else(|| name.clone()),
            database: name,
            timeout_secs: graph.timeout_secs,
        }
    }

    /// Returns the Query API endpoint for this database.
    pub fn query_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| CleanupError::config(format!("Invalid graph base URL: {e}")))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(CleanupError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                base.scheme()
            )));
        }

        base.join(&format!("db/{}/query/v2", self.database))
            .map_err(|e| CleanupError::config(format!("Invalid graph base URL: {e}")))
    }

    /// Returns a display-safe string (no password) for log output.
    pub fn display_string(&self) -> String {
        format!("{} @ {}", self.database, self.base_url)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("text2cypher-cleanup")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CleanupError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CleanupError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment variables as overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NEO4J_HTTP_URL") {
            self.graph.base_url = url;
        }
    }

    /// Rejects settings no run can succeed with.
    ///
    /// A zero timeout expires before any network reply arrives, which would
    /// flag every record as a syntax error.
    pub fn validate(&self) -> Result<()> {
        if self.graph.timeout_secs == 0 {
            return Err(CleanupError::config(
                "Query timeout must be at least 1 second",
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(CleanupError::config("LLM timeout must be at least 1 second"));
        }
        Ok(())
    }
}
