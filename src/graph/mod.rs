//! Graph store access for the cleanup pipeline.
//!
//! Provides a trait-based interface for running Cypher, the executor that turns
//! failures into values, the per-alias connector registry and the schema cache.

mod alias;
mod executor;
mod http;
mod mock;
mod registry;
mod schema_cache;
mod types;

pub use alias::DatabaseAlias;
pub use executor::QueryExecutor;
pub use http::Neo4jHttpClient;
pub use mock::MockGraphClient;
pub use registry::{ConnectorFactory, ConnectorRegistry, DemoConnectorFactory, MockConnectorFactory};
pub use schema_cache::SchemaCache;
pub use types::{ExecutionFailure, ExecutionOutcome, FailureKind, QueryResult, Row};

use crate::error::Result;
use async_trait::async_trait;

/// Query parameters sent alongside a Cypher statement.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Failure kind reported by clients when their own request deadline elapses.
pub const TIMEOUT_KIND: &str = "Timeout";

/// Substring of the store notification for a deprecated feature that has a replacement.
pub const DEPRECATION_MARKER: &str = "warn: feature deprecated with replacement";

/// Exact store notification for a query that produced no data.
pub const NO_DATA_MARKER: &str = "note: no data";

/// Column holding the schema text returned by [`FULL_SCHEMA_QUERY`].
pub const FULL_SCHEMA_COLUMN: &str = "FullSchema";

/// Introspection query producing one human-readable schema string.
///
/// Lists node properties, relationship properties and relationship
/// directions, all derived from `apoc.meta.data()`.
pub const FULL_SCHEMA_QUERY: &str = r#"CALL apoc.meta.data()
YIELD label, other, elementType, type, property
WITH
  collect(CASE WHEN NOT type = "RELATIONSHIP" AND elementType = "node"
    THEN {label: label, property: property, type: type} END) AS nodeProps,
  collect(CASE WHEN NOT type = "RELATIONSHIP" AND elementType = "relationship"
    THEN {relationship: label, property: property, type: type} END) AS relProps,
  collect(CASE WHEN type = "RELATIONSHIP" AND elementType = "node"
    THEN "(:" + label + ")-[:" + property + "]->(:" + apoc.text.join(other, "|") + ")" END) AS rels
RETURN "Node properties: " + apoc.convert.toJson(nodeProps)
  + "\nRelationship properties: " + apoc.convert.toJson(relProps)
  + "\nThe relationships: " + apoc.text.join(rels, ", ") AS FullSchema"#;

/// Trait defining the interface for graph store clients.
///
/// Implementations report failures as errors; [`QueryExecutor`] is the layer
/// that converts them into [`ExecutionOutcome::Failed`].
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Runs a Cypher statement and returns its rows and notifications.
    async fn run(&self, query: &str, params: Option<&Params>) -> Result<QueryResult>;

    /// Name of the database this client targets.
    fn database(&self) -> &str;
}
