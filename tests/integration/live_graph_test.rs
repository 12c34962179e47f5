//! Tests against a live Neo4j server over the HTTP Query API.
//!
//! Set NEO4J_HTTP_URL (e.g. https://demo.neo4jlabs.com:7473) to run them.

use std::time::Duration;

use text2cypher_cleanup::config::{ConnectionConfig, GraphConfig};
use text2cypher_cleanup::graph::{
    DatabaseAlias, ExecutionOutcome, FailureKind, Neo4jHttpClient, QueryExecutor,
    NO_DATA_MARKER,
};

/// Helper to create an executor for the movies demo database.
fn get_test_executor() -> Option<QueryExecutor> {
    let base_url = std::env::var("NEO4J_HTTP_URL").ok()?;
    let graph = GraphConfig {
        base_url,
        ..GraphConfig::default()
    };
    let config = ConnectionConfig::for_alias(&graph, DatabaseAlias::Movies);
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = Neo4jHttpClient::new(config).ok()?;
    Some(QueryExecutor::new(Box::new(client), timeout))
}

#[tokio::test]
async fn test_execute_simple_return() {
    let Some(executor) = get_test_executor() else {
        eprintln!("Skipping test: NEO4J_HTTP_URL not set");
        return;
    };

    match executor.execute("RETURN 1 AS num", None).await {
        ExecutionOutcome::Completed(result) => {
            assert_eq!(result.columns, vec!["num".to_string()]);
            assert_eq!(result.rows.len(), 1);
        }
        ExecutionOutcome::Failed(failure) => panic!("Query failed: {}", failure),
    }
}

#[tokio::test]
async fn test_empty_match_reports_no_data() {
    let Some(executor) = get_test_executor() else {
        eprintln!("Skipping test: NEO4J_HTTP_URL not set");
        return;
    };

    match executor
        .execute("MATCH (p:Person {name: 'Nobody'}) RETURN p", None)
        .await
    {
        ExecutionOutcome::Completed(result) => {
            assert!(result.rows.is_empty());
            assert!(result.notifications.iter().any(|n| n == NO_DATA_MARKER));
        }
        ExecutionOutcome::Failed(failure) => panic!("Query failed: {}", failure),
    }
}

#[tokio::test]
async fn test_syntax_error_is_captured() {
    let Some(executor) = get_test_executor() else {
        eprintln!("Skipping test: NEO4J_HTTP_URL not set");
        return;
    };

    match executor.execute("MATCH (n) RETRUN n", None).await {
        ExecutionOutcome::Failed(failure) => {
            assert!(matches!(failure.kind, FailureKind::Store(_)));
            assert_eq!(failure.kind.name(), "SyntaxError");
        }
        ExecutionOutcome::Completed(_) => panic!("Expected a syntax error"),
    }
}

#[tokio::test]
async fn test_explain_does_not_return_rows() {
    let Some(executor) = get_test_executor() else {
        eprintln!("Skipping test: NEO4J_HTTP_URL not set");
        return;
    };

    let outcome = executor.explain("MATCH (m:Movie) RETURN m.title").await;
    match outcome {
        ExecutionOutcome::Completed(result) => assert!(result.rows.is_empty()),
        ExecutionOutcome::Failed(failure) => panic!("Explain failed: {}", failure),
    }
}

#[tokio::test]
async fn test_fetch_schema() {
    let Some(executor) = get_test_executor() else {
        eprintln!("Skipping test: NEO4J_HTTP_URL not set");
        return;
    };

    let schema = executor.fetch_schema().await.unwrap();
    assert!(schema.starts_with("Node properties:"));
    assert!(schema.contains("Movie"));
}
