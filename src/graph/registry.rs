//! Connector registry mapping database aliases to executors.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{DatabaseAlias, MockGraphClient, Neo4jHttpClient, QueryExecutor};
use crate::config::{ConnectionConfig, GraphConfig};
use crate::error::{CleanupError, Result};

/// Creates executors for the registry.
pub trait ConnectorFactory {
    /// Creates the executor for a demo database alias.
    fn connect(&self, alias: DatabaseAlias) -> Result<QueryExecutor>;

    /// Creates the shared executor for records without an alias.
    fn connect_fallback(&self) -> Result<QueryExecutor>;
}

/// Connects to the Neo4j Labs demo server over HTTP.
#[derive(Debug, Clone)]
pub struct DemoConnectorFactory {
    graph: GraphConfig,
}

impl DemoConnectorFactory {
    pub fn new(graph: GraphConfig) -> Self {
        Self { graph }
    }

    fn executor(&self, config: ConnectionConfig) -> Result<QueryExecutor> {
        info!("Creating Neo4j connector for database: {}", config.database);
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Neo4jHttpClient::new(config)?;
        Ok(QueryExecutor::new(Box::new(client), timeout))
    }
}

impl ConnectorFactory for DemoConnectorFactory {
    fn connect(&self, alias: DatabaseAlias) -> Result<QueryExecutor> {
        self.executor(ConnectionConfig::for_alias(&self.graph, alias))
    }

    fn connect_fallback(&self) -> Result<QueryExecutor> {
        self.executor(ConnectionConfig::fallback(&self.graph))
    }
}

/// Hands out [`MockGraphClient`]s.
///
/// Aliases registered with [`with_client`](Self::with_client) get that client
/// (clones share call logs, so callers can keep a handle for inspection);
/// any other alias gets a fresh mock answering a placeholder schema.
#[derive(Debug, Clone)]
pub struct MockConnectorFactory {
    clients: HashMap<DatabaseAlias, MockGraphClient>,
    fallback: MockGraphClient,
    timeout: Duration,
}

impl MockConnectorFactory {
    pub fn new(fallback: MockGraphClient) -> Self {
        Self {
            clients: HashMap::new(),
            fallback,
            timeout: Duration::from_secs(30),
        }
    }

    /// Uses `client` for `alias`.
    pub fn with_client(mut self, alias: DatabaseAlias, client: MockGraphClient) -> Self {
        self.clients.insert(alias, client);
        self
    }

    /// Sets the execution timeout of created executors.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for MockConnectorFactory {
    fn default() -> Self {
        Self::new(MockGraphClient::new(DatabaseAlias::Northwind.database_name()))
    }
}

impl ConnectorFactory for MockConnectorFactory {
    fn connect(&self, alias: DatabaseAlias) -> Result<QueryExecutor> {
        let client = self.clients.get(&alias).cloned().unwrap_or_else(|| {
            MockGraphClient::new(alias.database_name())
                .with_schema(format!("Mock schema for {}", alias.database_name()))
        });
        Ok(QueryExecutor::new(Box::new(client), self.timeout))
    }

    fn connect_fallback(&self) -> Result<QueryExecutor> {
        Ok(QueryExecutor::new(Box::new(self.fallback.clone()), self.timeout))
    }
}

/// Alias to executor mapping, immutable after population.
pub struct ConnectorRegistry {
    executors: HashMap<DatabaseAlias, Arc<QueryExecutor>>,
    fallback: Arc<QueryExecutor>,
}

impl ConnectorRegistry {
    /// Builds one executor per distinct alias plus the fallback executor.
    ///
    /// Every alias is validated before any connector is created; an unknown
    /// alias is a configuration error.
    pub fn populate<'a, I>(aliases: I, factory: &dyn ConnectorFactory) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct = aliases
            .into_iter()
            .map(str::parse::<DatabaseAlias>)
            .collect::<Result<BTreeSet<_>>>()?;

        debug!("Populating Neo4j connectors for {} database aliases", distinct.len());

        let mut executors = HashMap::with_capacity(distinct.len());
        for alias in distinct {
            debug!("Creating connector for database alias: {}", alias);
            executors.insert(alias, Arc::new(factory.connect(alias)?));
        }
        let fallback = Arc::new(factory.connect_fallback()?);

        debug!("Successfully created {} Neo4j connectors", executors.len());
        Ok(Self {
            executors,
            fallback,
        })
    }

    /// Executor for `alias`, or the fallback executor when there is none.
    pub fn executor_for(&self, alias: Option<DatabaseAlias>) -> Result<Arc<QueryExecutor>> {
        match alias {
            None => Ok(Arc::clone(&self.fallback)),
            Some(alias) => self.executors.get(&alias).cloned().ok_or_else(|| {
                CleanupError::internal(format!("No connector registered for alias '{}'", alias))
            }),
        }
    }

    /// Number of alias-bound executors (the fallback is not counted).
    pub fn len(&self) -> usize {
        self.executors.len()
    }

    /// Returns true if no alias-bound executors exist.
    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}
