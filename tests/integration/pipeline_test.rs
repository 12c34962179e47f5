//! Full runs over dataset files.

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use text2cypher_cleanup::app::{run_cleanup, RunOptions};
use text2cypher_cleanup::config::Config;
use text2cypher_cleanup::dataset::{load_records, Split};
use text2cypher_cleanup::detect::IssueTag;
use text2cypher_cleanup::graph::{
    DatabaseAlias, MockConnectorFactory, MockGraphClient, FULL_SCHEMA_QUERY,
};
use text2cypher_cleanup::llm::{FailingLlmClient, MockLlmClient};

const DEPRECATION: &str =
    "warn: feature deprecated with replacement. id is deprecated. It is replaced by elementId.";

fn dataset() -> String {
    [
        r#"{"instance_id":"t1","question":"How many movies were released in 1999?","cypher":"MATCH (m:Movie {released: 1999}) RETURN count(m)","type":"Aggregation","database_reference_alias":"neo4jlabs_demo_db_movies"}"#,
        r#"{"instance_id":"t2","question":"What are the node ids of movies?","cypher":"MATCH (m:Movie) RETURN id(m)","type":"Simple Retrieval","database_reference_alias":"neo4jlabs_demo_db_movies"}"#,
        r#"{"instance_id":"t3","question":"Which streamers have the most followers?","cypher":"MATCH (s:Stream) RETURN s ORDER BY s.followers DESC LIMIT 5","type":"Ranking","database_reference_alias":"neo4jlabs_demo_db_twitch"}"#,
        r#"{"instance_id":"t4","question":"哪些产品最贵?","cypher":"MATCH (p:Product) RETURN p ORDER BY p.unitPrice DESC LIMIT 3","type":"Ranking","database_reference_alias":null}"#,
        r#"{"instance_id":"t5","question":"Show the top 3 suppliers by product count","cypher":"MATCH (s:Supplier)-[:SUPPLIES]->(p) RETURN s, count(p) ORDER BY count(p) DESC LIMIT 3","type":"Aggregation","database_reference_alias":null}"#,
    ]
    .join("\n")
}

fn setup() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("test.jsonl"), dataset()).unwrap();
    let mut config = Config::default();
    config.output.dir = dir.path().join("output");
    (dir, config)
}

#[tokio::test]
async fn test_cleaned_split_keeps_only_issue_free_records() {
    let (dir, config) = setup();
    let movies = MockGraphClient::new("movies")
        .with_schema("(:Person)-[:ACTED_IN]->(:Movie)")
        .with_notifications("RETURN id(m)", &[DEPRECATION])
        .with_notifications("released: 1999", &["note: no data"]);
    let factory = MockConnectorFactory::default().with_client(DatabaseAlias::Movies, movies.clone());
    let options = RunOptions::new(dir.path(), Split::Test, &config);

    let report = run_cleanup(&options, &config, &factory, Arc::new(MockLlmClient::new()))
        .await
        .unwrap();

    assert_eq!(report.summary.total_records, 5);
    assert_eq!(report.summary.count(IssueTag::EmptyResult), 1);
    assert_eq!(report.summary.count(IssueTag::Deprecation), 1);
    assert_eq!(report.summary.count(IssueTag::NonEnglishCharacters), 1);
    assert_eq!(movies.call_count(FULL_SCHEMA_QUERY), 1);

    let cleaned = load_records(&report.cleaned_path).unwrap();
    let ids: Vec<_> = cleaned.iter().map(|r| r.instance_id.as_str()).collect();
    assert_eq!(ids, vec!["t3", "t5"]);
    assert_eq!(cleaned[0].schema.as_deref(), Some("Mock schema for twitch"));
    assert_eq!(cleaned[1].extra["type"], "Aggregation");

    let raw = fs::read_to_string(&report.cleaned_path).unwrap();
    assert!(!raw.contains("\"issues\""));
}

#[tokio::test]
async fn test_model_outage_is_skipped_by_default() {
    let (dir, config) = setup();
    let options = RunOptions::new(dir.path(), Split::Test, &config);

    let report = run_cleanup(
        &options,
        &config,
        &MockConnectorFactory::default(),
        Arc::new(FailingLlmClient::new("model offline")),
    )
    .await
    .unwrap();

    assert_eq!(report.summary.total_records, 5);
    assert_eq!(report.summary.clean_records, 4);
}

#[tokio::test]
async fn test_model_outage_halts_strict_run_without_output() {
    let (dir, mut config) = setup();
    config.detection.fail_on_llm_error = true;
    let options = RunOptions::new(dir.path(), Split::Test, &config);

    let err = run_cleanup(
        &options,
        &config,
        &MockConnectorFactory::default(),
        Arc::new(FailingLlmClient::new("model offline")),
    )
    .await
    .unwrap_err();

    assert_eq!(err.category(), "LLM Error");
    assert!(!config.output.dir.join("test_split_cleaned.jsonl").exists());
}

#[tokio::test]
async fn test_missing_split_file() {
    let (dir, config) = setup();
    let options = RunOptions::new(dir.path(), Split::Train, &config);

    let err = run_cleanup(
        &options,
        &config,
        &MockConnectorFactory::default(),
        Arc::new(MockLlmClient::new()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.category(), "Dataset Error");
    assert!(err.to_string().contains("train.jsonl"));
}
