//! End-to-end classification scenarios.
//!
//! Each test runs one record through the detector with scripted graph and
//! model clients.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use text2cypher_cleanup::dataset::Record;
use text2cypher_cleanup::detect::{only_latin_characters, Detector, IssueTag};
use text2cypher_cleanup::graph::{MockGraphClient, QueryExecutor, SchemaCache};
use text2cypher_cleanup::llm::{LlmClient, MockLlmClient};

const DEPRECATION: &str = "warn: feature deprecated with replacement. The query used a deprecated function: `id`.";

fn executor(client: &MockGraphClient) -> QueryExecutor {
    QueryExecutor::new(Box::new(client.clone()), Duration::from_secs(5))
}

fn detector(llm: impl LlmClient + 'static) -> Detector {
    Detector::new(Arc::new(SchemaCache::new()), Arc::new(llm))
}

#[tokio::test]
async fn test_alias_free_record_with_valid_query_is_clean() {
    let fallback = MockGraphClient::new("northwind");
    let mut record = Record::new(
        "scenario-a",
        "What is the capital of France?",
        "MATCH (c:Country {name: 'France'})-[:HAS_CAPITAL]->(city) RETURN city.name",
    );

    detector(MockLlmClient::new())
        .detect_issues(&mut record, &executor(&fallback))
        .await
        .unwrap();

    assert_eq!(record.issues, vec![]);
    assert_eq!(fallback.call_count("EXPLAIN MATCH (c:Country"), 1);
    assert_eq!(record.schema, None);
}

#[tokio::test]
async fn test_repeated_deprecation_notice_is_tagged_once() {
    let movies = MockGraphClient::new("movies")
        .with_schema("(:Person)-[:ACTED_IN]->(:Movie)")
        .with_notifications("RETURN id(m)", &[DEPRECATION, DEPRECATION]);
    let mut record = Record::new(
        "scenario-b",
        "What are the ids of all movies?",
        "MATCH (m:Movie) RETURN id(m)",
    )
    .with_alias("neo4jlabs_demo_db_movies");

    detector(MockLlmClient::new())
        .detect_issues(&mut record, &executor(&movies))
        .await
        .unwrap();

    assert_eq!(record.issues, vec![IssueTag::Deprecation]);
}

#[tokio::test]
async fn test_accented_latin_passes_and_cjk_is_flagged() {
    let fallback = MockGraphClient::new("northwind");
    let detector = detector(MockLlmClient::new());

    let mut accented = Record::new("scenario-c1", "dépenses café m'aider", "RETURN 1");
    detector
        .detect_issues(&mut accented, &executor(&fallback))
        .await
        .unwrap();
    assert!(!accented.issues.contains(&IssueTag::NonEnglishCharacters));

    let mut cjk = Record::new("scenario-c2", "Which 电影 has the most actors?", "RETURN 1");
    detector
        .detect_issues(&mut cjk, &executor(&fallback))
        .await
        .unwrap();
    assert_eq!(cjk.issues, vec![IssueTag::NonEnglishCharacters]);
}

#[tokio::test]
async fn test_failed_execution_still_gets_semantic_checks() {
    let movies = MockGraphClient::new("movies")
        .with_schema("(:Person)-[:DIRECTED]->(:Movie)")
        .with_error(
            "RETRUN",
            "Neo.ClientError.Statement.SyntaxError",
            "Invalid input 'RETRUN'",
        );
    let llm = MockLlmClient::new().with_response("semantically reflects", "no it doesn't reflect");
    let mut record = Record::new(
        "scenario-d",
        "Who directed The Matrix?",
        "MATCH (p)-[:DIRECTED]->(m {title: 'The Matrix'}) RETRUN p",
    )
    .with_alias("neo4jlabs_demo_db_movies");

    detector(llm)
        .detect_issues(&mut record, &executor(&movies))
        .await
        .unwrap();

    assert_eq!(
        record.issues,
        vec![IssueTag::SyntaxError, IssueTag::InaccurateQuery]
    );
}

#[tokio::test]
async fn test_vague_question_never_gets_inaccurate_query() {
    let llm = MockLlmClient::new()
        .with_response("vague or not", "vague")
        .with_response("semantically reflects", "no it doesn't reflect");
    let fallback = MockGraphClient::new("northwind");
    let mut record = Record::new("vague", "Show me something", "MATCH (n) RETURN n");

    detector(llm.clone())
        .detect_issues(&mut record, &executor(&fallback))
        .await
        .unwrap();

    assert_eq!(record.issues, vec![IssueTag::AmbiguousQuestion]);
    assert!(llm
        .requests()
        .iter()
        .all(|request| !request.contains("semantically reflects")));
}

#[tokio::test]
async fn test_issues_only_grow() {
    let movies = MockGraphClient::new("movies")
        .with_schema("schema")
        .with_notifications("Nobody", &["note: no data"]);
    let detector = detector(MockLlmClient::new().with_response("vague or not", "vague"));
    let mut record = Record::new("grow", "Wer ist Nobody?", "MATCH (p {name: 'Nobody'}) RETURN p")
        .with_alias("neo4jlabs_demo_db_movies");
    record.add_issue(IssueTag::Deprecation);

    detector
        .detect_issues(&mut record, &executor(&movies))
        .await
        .unwrap();

    assert_eq!(
        record.issues,
        vec![
            IssueTag::Deprecation,
            IssueTag::EmptyResult,
            IssueTag::AmbiguousQuestion
        ]
    );
}

#[test]
fn test_language_check_is_idempotent() {
    for question in ["¿Cuántas películas hay?", "Œuvres d'art…", "Сколько фильмов?", ""] {
        assert_eq!(
            only_latin_characters(question),
            only_latin_characters(question)
        );
    }
    assert!(only_latin_characters("¿Cuántas películas hay?"));
    assert!(!only_latin_characters("Сколько фильмов?"));
}
