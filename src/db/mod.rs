use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::coerce::NativeValue;
use crate::config::PoolSettings;
use crate::dialect::ResolvedConnection;
use crate::error::EngineError;
use crate::models::QueryParams;
use crate::state::ConnectionRegistry;

pub mod mysql;
pub mod params;
pub mod postgres;

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// The statement returns a result set (possibly empty).
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<NativeValue>>,
        /// Driver-reported count, when the driver has one.
        rowcount: Option<u64>,
    },
    /// DML/DDL without a result set.
    Affected { rowcount: Option<u64> },
}

/// A connected handle to one database.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    async fn connect(
        &mut self,
        target: &ResolvedConnection,
        pool: &PoolSettings,
    ) -> Result<(), EngineError>;
    async fn query(&self, sql: &str, params: &QueryParams) -> Result<StatementOutcome, EngineError>;
    /// Tables of the connection's current schema.
    async fn get_tables(&self) -> Result<Vec<String>, EngineError>;
    /// Close the pool and wait for its connections to be released.
    async fn close(&self);
}

/// The uniform "execute statement against URL" capability used by the executor.
#[async_trait]
pub trait DatabaseEngine: Send + Sync {
    async fn execute(
        &self,
        target: &ResolvedConnection,
        sql: &str,
        params: &QueryParams,
    ) -> Result<StatementOutcome, EngineError>;

    async fn list_tables(&self, target: &ResolvedConnection) -> Result<Vec<String>, EngineError>;

    /// Release any connections held open between requests.
    async fn close_all(&self) {}
}

/// Engine backed by `sqlx` drivers, one cached pool per target.
pub struct SqlxEngine {
    registry: ConnectionRegistry,
    pool: PoolSettings,
}

impl SqlxEngine {
    pub fn new(pool: PoolSettings) -> Self {
        Self {
            registry: ConnectionRegistry::with_capacity(pool.max_pools),
            pool,
        }
    }

    fn new_driver(target: &ResolvedConnection) -> Result<Box<dyn DatabaseDriver>, EngineError> {
        let scheme = target
            .url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or_default();
        match scheme {
            "postgresql" | "postgres" => Ok(Box::new(postgres::PostgresDriver::new())),
            "mysql" | "mariadb" => Ok(Box::new(mysql::MySqlDriver::new())),
            _ => Err(EngineError::UnsupportedDialect(target.dialect.to_string())),
        }
    }

    async fn driver_for(
        &self,
        target: &ResolvedConnection,
    ) -> Result<Arc<dyn DatabaseDriver>, EngineError> {
        let key = ConnectionRegistry::key_for(target);
        if let Some(driver) = self.registry.get(&key) {
            return Ok(driver);
        }

        let mut driver = Self::new_driver(target)?;
        info!(url = %target.redacted_url(), "opening database pool");
        driver.connect(target, &self.pool).await?;

        let driver: Arc<dyn DatabaseDriver> = Arc::from(driver);
        if let Some((evicted, old)) = self.registry.insert(key, driver.clone()) {
            debug!(key = %evicted, "closing least recently used pool");
            old.close().await;
        }
        Ok(driver)
    }
}

#[async_trait]
impl DatabaseEngine for SqlxEngine {
    async fn execute(
        &self,
        target: &ResolvedConnection,
        sql: &str,
        params: &QueryParams,
    ) -> Result<StatementOutcome, EngineError> {
        let driver = self.driver_for(target).await?;
        debug!(url = %target.redacted_url(), "executing statement");
        driver.query(sql, params).await
    }

    async fn list_tables(&self, target: &ResolvedConnection) -> Result<Vec<String>, EngineError> {
        self.driver_for(target).await?.get_tables().await
    }

    async fn close_all(&self) {
        let drivers = self.registry.drain();
        if !drivers.is_empty() {
            info!(count = drivers.len(), "closing database pools");
        }
        for driver in drivers {
            driver.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::resolve;
    use crate::models::{ConnectionDescriptor, Dialect};
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDriver {
        closed: Arc<AtomicUsize>,
    }

    impl std::fmt::Debug for dyn DatabaseDriver {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("DatabaseDriver")
        }
    }

    #[async_trait]
    impl DatabaseDriver for CountingDriver {
        async fn connect(
            &mut self,
            _target: &ResolvedConnection,
            _pool: &PoolSettings,
        ) -> Result<(), EngineError> {
            Ok(())
        }

        async fn query(
            &self,
            _sql: &str,
            _params: &QueryParams,
        ) -> Result<StatementOutcome, EngineError> {
            Ok(StatementOutcome::Affected { rowcount: None })
        }

        async fn get_tables(&self) -> Result<Vec<String>, EngineError> {
            Ok(Vec::new())
        }

        async fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn target(dialect: Dialect) -> ResolvedConnection {
        resolve(&ConnectionDescriptor {
            dialect,
            user: Some("u".into()),
            password: Some("p".into()),
            host: Some("h".into()),
            port: Some("1".into()),
            database: Some("d".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn snowflake_has_no_driver() {
        let engine = SqlxEngine::new(PoolSettings::default());
        let result = engine
            .execute(&target(Dialect::Snowflake), "SELECT 1", &QueryParams::new())
            .await;
        assert_matches!(result, Err(EngineError::UnsupportedDialect(d)) if d == "snowflake");
    }

    #[tokio::test]
    async fn close_all_closes_and_forgets_every_pool() {
        let engine = SqlxEngine::new(PoolSettings::default());
        let closed = Arc::new(AtomicUsize::new(0));
        for key in ["a", "b"] {
            let driver = Arc::new(CountingDriver {
                closed: closed.clone(),
            });
            assert!(engine.registry.insert(key.into(), driver).is_none());
        }

        engine.close_all().await;
        assert_eq!(closed.load(Ordering::SeqCst), 2);
        assert!(engine.registry.get("a").is_none());

        engine.close_all().await;
        assert_eq!(closed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registry_capacity_follows_settings() {
        let engine = SqlxEngine::new(PoolSettings {
            max_pools: 1,
            ..PoolSettings::default()
        });
        let closed = Arc::new(AtomicUsize::new(0));
        let driver = || -> Arc<dyn DatabaseDriver> {
            Arc::new(CountingDriver {
                closed: closed.clone(),
            })
        };
        assert!(engine.registry.insert("a".into(), driver()).is_none());
        assert_matches!(engine.registry.insert("b".into(), driver()), Some((key, _)) if key == "a");
    }

    #[test]
    fn schemes_route_to_drivers() {
        assert!(SqlxEngine::new_driver(&target(Dialect::Postgresql)).is_ok());
        assert!(SqlxEngine::new_driver(&target(Dialect::Mysql)).is_ok());
        assert!(SqlxEngine::new_driver(&target(Dialect::Other("postgres".into()))).is_ok());
        assert!(SqlxEngine::new_driver(&target(Dialect::Other("foo".into()))).is_err());
    }
}
