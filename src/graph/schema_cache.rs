//! Per-alias schema cache.
//!
//! The schema text of each source database is fetched at most once per
//! process and never invalidated. Population is single-flight per alias:
//! concurrent callers for the same alias wait on one fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{DatabaseAlias, QueryExecutor};
use crate::dataset::Record;
use crate::error::{CleanupError, Result};

/// Memoized schema text keyed by database alias.
#[derive(Debug, Default)]
pub struct SchemaCache {
    slots: Mutex<HashMap<DatabaseAlias, Arc<OnceCell<String>>>>,
}

impl SchemaCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema for `alias`, fetching it through `executor` on first use.
    ///
    /// A failed fetch is returned to the caller and leaves the slot empty.
    pub async fn resolve(&self, alias: DatabaseAlias, executor: &QueryExecutor) -> Result<String> {
        let slot = self.slot(alias)?;

        let schema = slot
            .get_or_try_init(|| async {
                info!("Fetching schema for {}", alias);
                executor.fetch_schema().await
            })
            .await?;

        debug!("Schema resolved for {}", alias);
        Ok(schema.clone())
    }

    /// Resolves the schema for `alias` and writes it onto `record`.
    ///
    /// The write happens on hits and misses alike.
    pub async fn apply(
        &self,
        record: &mut Record,
        alias: DatabaseAlias,
        executor: &QueryExecutor,
    ) -> Result<()> {
        record.schema = Some(self.resolve(alias, executor).await?);
        Ok(())
    }

    /// Returns the cached schema for `alias` without fetching.
    pub fn cached(&self, alias: DatabaseAlias) -> Option<String> {
        let slots = self.slots.lock().ok()?;
        slots.get(&alias).and_then(|slot| slot.get().cloned())
    }

    /// Number of aliases with a populated schema.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .map(|slots| slots.values().filter(|slot| slot.initialized()).count())
            .unwrap_or(0)
    }

    /// Returns true if no schema has been populated yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, alias: DatabaseAlias) -> Result<Arc<OnceCell<String>>> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| CleanupError::internal("Schema cache lock poisoned"))?;
        Ok(Arc::clone(slots.entry(alias).or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MockGraphClient, FULL_SCHEMA_QUERY};
    use std::time::Duration;

    fn executor(client: &MockGraphClient) -> QueryExecutor {
        QueryExecutor::new(Box::new(client.clone()), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_resolve_fetches_once() {
        let client = MockGraphClient::new("movies").with_schema("(:Movie)-[:ACTED_IN]-(:Person)");
        let executor = executor(&client);
        let cache = SchemaCache::new();

        for _ in 0..3 {
            let schema = cache.resolve(DatabaseAlias::Movies, &executor).await.unwrap();
            assert_eq!(schema, "(:Movie)-[:ACTED_IN]-(:Person)");
        }

        assert_eq!(client.call_count(FULL_SCHEMA_QUERY), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_writes_on_hit_and_miss() {
        let client = MockGraphClient::new("movies").with_schema("movie schema");
        let executor = executor(&client);
        let cache = SchemaCache::new();
        let mut first = Record::new("1", "Who acted in The Matrix?", "MATCH (n) RETURN n");
        let mut second = Record::new("2", "List movies", "MATCH (m:Movie) RETURN m");

        cache
            .apply(&mut first, DatabaseAlias::Movies, &executor)
            .await
            .unwrap();
        cache
            .apply(&mut second, DatabaseAlias::Movies, &executor)
            .await
            .unwrap();

        assert_eq!(first.schema.as_deref(), Some("movie schema"));
        assert_eq!(second.schema.as_deref(), Some("movie schema"));
        assert_eq!(client.call_count(FULL_SCHEMA_QUERY), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_propagates_and_leaves_slot_empty() {
        let client = MockGraphClient::new("movies");
        let executor = executor(&client);
        let cache = SchemaCache::new();

        let result = cache.resolve(DatabaseAlias::Movies, &executor).await;

        assert!(result.is_err());
        assert!(cache.cached(DatabaseAlias::Movies).is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_aliases_are_cached_separately() {
        let movies = MockGraphClient::new("movies").with_schema("movies schema");
        let twitch = MockGraphClient::new("twitch").with_schema("twitch schema");
        let cache = SchemaCache::new();

        cache
            .resolve(DatabaseAlias::Movies, &executor(&movies))
            .await
            .unwrap();
        cache
            .resolve(DatabaseAlias::Twitch, &executor(&twitch))
            .await
            .unwrap();

        assert_eq!(
            cache.cached(DatabaseAlias::Twitch).as_deref(),
            Some("twitch schema")
        );
        assert_eq!(cache.len(), 2);
    }
}
