//! Neo4j client over the HTTP Query API.
//!
//! Provides the `Neo4jHttpClient` struct that implements the `GraphClient`
//! trait using `reqwest` against `POST /db/{name}/query/v2`.

use crate::config::ConnectionConfig;
use crate::error::{CleanupError, Result};
use crate::graph::{GraphClient, Params, QueryResult, Row, NO_DATA_MARKER, TIMEOUT_KIND};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Neo4j HTTP Query API client bound to one database.
#[derive(Debug, Clone)]
pub struct Neo4jHttpClient {
    config: ConnectionConfig,
    query_url: Url,
    client: Client,
}

impl Neo4jHttpClient {
    /// Creates a new client for the given connection.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let query_url = config.query_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CleanupError::connection(format!("Failed to create HTTP client: {}", e))
            })?;

        debug!("Neo4j client initialized for {}", config.display_string());
        Ok(Self {
            config,
            query_url,
            client,
        })
    }

    /// Maps a transport-level request error.
    fn map_request_error(&self, e: reqwest::Error) -> CleanupError {
        if e.is_timeout() {
            CleanupError::query(
                TIMEOUT_KIND,
                format!("No response within {}s", self.config.timeout_secs),
            )
        } else if e.is_connect() {
            CleanupError::connection(format!(
                "Failed to connect to {}: {}",
                self.config.display_string(),
                e
            ))
        } else {
            CleanupError::connection(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl GraphClient for Neo4jHttpClient {
    async fn run(&self, query: &str, params: Option<&Params>) -> Result<QueryResult> {
        let start = Instant::now();
        let request = QueryRequest {
            statement: query,
            parameters: params,
        };

        let response = self
            .client
            .post(self.query_url.clone())
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CleanupError::connection(format!("Failed to read response: {}", e)))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CleanupError::connection(format!(
                "Authentication failed for {}",
                self.config.display_string()
            )));
        }

        let response = parse_query_response(&body)?;
        if !status.is_success() && response.errors.is_empty() {
            return Err(CleanupError::connection(format!(
                "Neo4j API error ({}): {}",
                status, body
            )));
        }

        let result = response.into_query_result(is_explain(query))?;
        Ok(result.with_execution_time(start.elapsed()))
    }

    fn database(&self) -> &str {
        &self.config.database
    }
}

/// Whether `query` only plans, so an empty result carries no meaning.
fn is_explain(query: &str) -> bool {
    query
        .trim_start()
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("EXPLAIN"))
}

/// Parses a Query API response body.
fn parse_query_response(body: &str) -> Result<QueryResponse> {
    serde_json::from_str(body)
        .map_err(|e| CleanupError::connection(format!("Failed to parse response: {}", e)))
}

// Neo4j Query API types

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    statement: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a Params>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    notifications: Vec<Notification>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Notification {
    #[serde(default)]
    status_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl Notification {
    /// GQL status description when the server reports one, else the classic description.
    fn text(self) -> Option<String> {
        self.status_description.or(self.description)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    message: String,
}

impl QueryResponse {
    /// Converts the response into rows and status texts.
    ///
    /// The Query API reports only real notifications, not completion
    /// statuses. A completed non-EXPLAIN query without rows gets the
    /// `note: no data` status that the Bolt driver reports for GQL 02000.
    fn into_query_result(self, explain: bool) -> Result<QueryResult> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(CleanupError::query(error.code, error.message));
        }

        let (columns, rows) = match self.data {
            Some(data) => {
                let rows = data
                    .values
                    .into_iter()
                    .map(|values| data.fields.iter().cloned().zip(values).collect::<Row>())
                    .collect::<Vec<_>>();
                (data.fields, rows)
            }
            None => (Vec::new(), Vec::new()),
        };

        let mut notifications: Vec<String> = self
            .notifications
            .into_iter()
            .filter_map(Notification::text)
            .collect();
        if rows.is_empty() && !explain && !notifications.iter().any(|n| n == NO_DATA_MARKER) {
            notifications.push(NO_DATA_MARKER.to_string());
        }

        Ok(QueryResult {
            columns,
            rows,
            notifications,
            execution_time: Duration::ZERO,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::graph::DatabaseAlias;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_client_new() {
        let config = ConnectionConfig::for_alias(&GraphConfig::default(), DatabaseAlias::Movies);
        let client = Neo4jHttpClient::new(config).unwrap();
        assert_eq!(client.database(), "movies");
        assert_eq!(
            client.query_url.as_str(),
            "https://demo.neo4jlabs.com:7473/db/movies/query/v2"
        );
    }

    #[test]
    fn test_parse_rows_and_notifications() {
        let body = r#"{
            "data": {"fields": ["name", "born"], "values": [["Keanu Reeves", 1964], ["Carrie-Anne Moss", 1967]]},
            "notifications": [
                {"gqlStatus": "01N01", "statusDescription": "warn: feature deprecated with replacement. id is deprecated and will be removed without a replacement.", "description": "The query used a deprecated function."},
                {"code": "Neo.ClientNotification.Statement.CartesianProduct", "description": "This query builds a cartesian product"}
            ],
            "bookmarks": ["FB:kcwQ"]
        }"#;

        let result = parse_query_response(body)
            .unwrap()
            .into_query_result(false)
            .unwrap();

        assert_eq!(result.columns, vec!["name", "born"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1].get("born"), Some(&json!(1967)));
        assert_eq!(
            result.notifications,
            vec![
                "warn: feature deprecated with replacement. id is deprecated and will be removed without a replacement.".to_string(),
                "This query builds a cartesian product".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input 'RETRUN'"}]}"#;

        let err = parse_query_response(body)
            .unwrap()
            .into_query_result(false)
            .unwrap_err();

        match err {
            CleanupError::Query { kind, message } => {
                assert_eq!(kind, "Neo.ClientError.Statement.SyntaxError");
                assert_eq!(message, "Invalid input 'RETRUN'");
            }
            other => panic!("Expected Query error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_data() {
        let body = r#"{"data": {"fields": ["n"], "values": []}, "notifications": [{"statusDescription": "note: no data"}]}"#;

        let result = parse_query_response(body)
            .unwrap()
            .into_query_result(false)
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.notifications, vec!["note: no data".to_string()]);
    }

    #[test]
    fn test_empty_result_reports_no_data() {
        let body = r#"{"data": {"fields": ["p"], "values": []}, "notifications": [], "bookmarks": ["FB:kcwQ"]}"#;

        let result = parse_query_response(body)
            .unwrap()
            .into_query_result(false)
            .unwrap();

        assert_eq!(result.notifications, vec![NO_DATA_MARKER.to_string()]);
    }

    #[test]
    fn test_no_data_follows_real_notifications() {
        let body = r#"{"data": {"fields": ["id(m)"], "values": []}, "notifications": [{"statusDescription": "warn: feature deprecated with replacement. id is deprecated."}]}"#;

        let result = parse_query_response(body)
            .unwrap()
            .into_query_result(false)
            .unwrap();

        assert_eq!(result.notifications.len(), 2);
        assert_eq!(result.notifications[1], NO_DATA_MARKER);
    }

    #[test]
    fn test_explain_plan_has_no_no_data_status() {
        let body = r#"{"data": {"fields": ["p"], "values": []}}"#;

        let result = parse_query_response(body)
            .unwrap()
            .into_query_result(true)
            .unwrap();

        assert!(result.notifications.is_empty());
    }

    #[test]
    fn test_rows_suppress_no_data() {
        let body = r#"{"data": {"fields": ["n"], "values": [[1]]}}"#;

        let result = parse_query_response(body)
            .unwrap()
            .into_query_result(false)
            .unwrap();

        assert!(result.notifications.is_empty());
    }

    #[test]
    fn test_is_explain() {
        assert!(is_explain("EXPLAIN MATCH (n) RETURN n"));
        assert!(is_explain("  explain RETURN 1"));
        assert!(!is_explain("MATCH (n) RETURN n"));
        assert!(!is_explain("RETURN 1"));
    }

    #[test]
    fn test_parse_garbage_is_connection_error() {
        let err = parse_query_response("<html>502</html>").unwrap_err();
        assert_eq!(err.category(), "Connection Error");
    }

    #[test]
    fn test_request_serialization_omits_missing_params() {
        let request = QueryRequest {
            statement: "RETURN 1",
            parameters: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"statement": "RETURN 1"})
        );
    }
}
