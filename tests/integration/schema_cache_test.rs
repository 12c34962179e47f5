//! Schema cache behaviour across records and concurrent callers.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use text2cypher_cleanup::dataset::Record;
use text2cypher_cleanup::detect::Detector;
use text2cypher_cleanup::graph::{
    DatabaseAlias, MockGraphClient, QueryExecutor, SchemaCache, FULL_SCHEMA_QUERY,
};
use text2cypher_cleanup::llm::MockLlmClient;

#[tokio::test]
async fn test_concurrent_resolves_fetch_once() {
    let client = MockGraphClient::new("twitch")
        .with_schema("(:User)-[:CHATTER]->(:Stream)")
        .with_latency(Duration::from_millis(50));
    let executor = QueryExecutor::new(Box::new(client.clone()), Duration::from_secs(5));
    let cache = SchemaCache::new();

    let results = join_all((0..8).map(|_| cache.resolve(DatabaseAlias::Twitch, &executor))).await;

    for result in results {
        assert_eq!(result.unwrap(), "(:User)-[:CHATTER]->(:Stream)");
    }
    assert_eq!(client.call_count(FULL_SCHEMA_QUERY), 1);
}

#[tokio::test]
async fn test_every_record_of_an_alias_gets_the_schema() {
    let client = MockGraphClient::new("movies").with_schema("movies schema");
    let executor = QueryExecutor::new(Box::new(client.clone()), Duration::from_secs(5));
    let cache = Arc::new(SchemaCache::new());
    let detector = Detector::new(Arc::clone(&cache), Arc::new(MockLlmClient::new()));

    let mut records: Vec<Record> = (0..5)
        .map(|i| {
            Record::new(
                i.to_string(),
                "How many movies are there?",
                "MATCH (m:Movie) RETURN count(m)",
            )
            .with_alias("neo4jlabs_demo_db_movies")
        })
        .collect();

    for record in &mut records {
        detector.detect_issues(record, &executor).await.unwrap();
    }

    assert_eq!(client.call_count(FULL_SCHEMA_QUERY), 1);
    assert!(records
        .iter()
        .all(|record| record.schema.as_deref() == Some("movies schema")));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_retried_on_next_use() {
    let failing = MockGraphClient::new("fincen").with_error(
        FULL_SCHEMA_QUERY,
        "Neo.TransientError.General.DatabaseUnavailable",
        "Database unavailable",
    );
    let healthy = MockGraphClient::new("fincen").with_schema("(:Filing)-[:BENEFITS]->(:Entity)");
    let cache = SchemaCache::new();

    let first = cache
        .resolve(
            DatabaseAlias::Fincen,
            &QueryExecutor::new(Box::new(failing), Duration::from_secs(5)),
        )
        .await;
    let second = cache
        .resolve(
            DatabaseAlias::Fincen,
            &QueryExecutor::new(Box::new(healthy), Duration::from_secs(5)),
        )
        .await;

    assert!(first.is_err());
    assert_eq!(second.unwrap(), "(:Filing)-[:BENEFITS]->(:Entity)");
}
