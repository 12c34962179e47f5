//! One row of a text2cypher dataset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::detect::IssueTag;
use crate::error::{CleanupError, Result};
use crate::graph::DatabaseAlias;

/// A question/query pair plus the issues detected on it.
///
/// Columns this crate does not interpret are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub instance_id: String,

    pub question: String,

    #[serde(rename = "cypher")]
    pub cypher_query: String,

    /// Schema text of the source database; overwritten by the schema cache.
    #[serde(default)]
    pub schema: Option<String>,

    /// Raw alias column; validated when the connector registry is populated.
    #[serde(
        rename = "database_reference_alias",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub database_alias: Option<String>,

    /// Append-only during classification.
    #[serde(default, skip_deserializing)]
    pub issues: Vec<IssueTag>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Creates a record without alias or schema.
    pub fn new(
        instance_id: impl Into<String>,
        question: impl Into<String>,
        cypher_query: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            question: question.into(),
            cypher_query: cypher_query.into(),
            schema: None,
            database_alias: None,
            issues: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the database alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.database_alias = Some(alias.into());
        self
    }

    /// Parsed database alias; an empty column counts as absent.
    pub fn alias(&self) -> Result<Option<DatabaseAlias>> {
        match self.raw_alias() {
            Some(raw) => raw.parse().map(Some),
            None => Ok(None),
        }
    }

    /// Alias column text, if present and non-empty.
    pub fn raw_alias(&self) -> Option<&str> {
        self.database_alias
            .as_deref()
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }

    pub fn add_issue(&mut self, tag: IssueTag) {
        self.issues.push(tag);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// JSON object for output, optionally without the `issues` column.
    pub fn to_output_value(&self, with_issues: bool) -> Result<Value> {
        let mut value = serde_json::to_value(self).map_err(|e| {
            CleanupError::dataset(format!(
                "Failed to serialize record {}: {}",
                self.instance_id, e
            ))
        })?;
        if !with_issues {
            if let Value::Object(map) = &mut value {
                map.remove("issues");
            }
        }
        Ok(value)
    }
}
