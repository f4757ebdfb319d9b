use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::db::DatabaseDriver;
use crate::dialect::ResolvedConnection;

#[derive(Default)]
struct Entries {
    connections: HashMap<String, Arc<dyn DatabaseDriver>>,
    /// Keys from least to most recently used.
    recency: VecDeque<String>,
}

impl Entries {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}

/// Connected drivers keyed by resolved URL and options, bounded in size.
pub struct ConnectionRegistry {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl ConnectionRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn key_for(target: &ResolvedConnection) -> String {
        format!("{} {}", target.url, target.render_options())
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn DatabaseDriver>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let driver = entries.connections.get(key).cloned()?;
        entries.touch(key);
        Some(driver)
    }

    /// Insert a driver. Returns the driver it displaced, either the one
    /// previously under `key` or the least recently used entry once full. The
    /// caller is responsible for closing it.
    pub fn insert(
        &self,
        key: String,
        driver: Arc<dyn DatabaseDriver>,
    ) -> Option<(String, Arc<dyn DatabaseDriver>)> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(replaced) = entries.connections.insert(key.clone(), driver) {
            entries.touch(&key);
            return Some((key, replaced));
        }
        entries.recency.push_back(key);

        if entries.connections.len() <= self.capacity {
            return None;
        }
        let oldest = entries.recency.pop_front()?;
        let evicted = entries.connections.remove(&oldest)?;
        Some((oldest, evicted))
    }

    /// Remove every driver, leaving the registry empty.
    pub fn drain(&self) -> Vec<Arc<dyn DatabaseDriver>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.recency.clear();
        entries.connections.drain().map(|(_, driver)| driver).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolSettings;
    use crate::db::StatementOutcome;
    use crate::error::EngineError;
    use crate::models::QueryParams;
    use async_trait::async_trait;

    struct NullDriver;

    #[async_trait]
    impl DatabaseDriver for NullDriver {
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

        async fn close(&self) {}
    }

    fn target(url: &str, search_path: Option<&str>) -> ResolvedConnection {
        let mut options = crate::dialect::ConnectOptions::new();
        if let Some(path) = search_path {
            options.insert(crate::dialect::SEARCH_PATH.into(), path.into());
        }
        ResolvedConnection {
            dialect: crate::models::Dialect::Postgresql,
            url: url.into(),
            options,
        }
    }

    #[test]
    fn keys_distinguish_options() {
        let a = ConnectionRegistry::key_for(&target("postgresql://u:p@h:1/d", None));
        let b = ConnectionRegistry::key_for(&target("postgresql://u:p@h:1/d", Some("public")));
        assert_ne!(a, b);
    }

    #[test]
    fn insert_then_get() {
        let registry = ConnectionRegistry::with_capacity(4);
        let key = ConnectionRegistry::key_for(&target("mysql://u:p@h:1/d", None));
        assert!(registry.insert(key.clone(), Arc::new(NullDriver)).is_none());
        assert!(registry.get(&key).is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let registry = ConnectionRegistry::with_capacity(2);
        assert!(registry.insert("a".into(), Arc::new(NullDriver)).is_none());
        assert!(registry.insert("b".into(), Arc::new(NullDriver)).is_none());
        // Using "a" makes "b" the oldest.
        assert!(registry.get("a").is_some());

        let (evicted, _) = registry.insert("c".into(), Arc::new(NullDriver)).unwrap();
        assert_eq!(evicted, "b");
        assert!(registry.get("b").is_none());
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_some());
    }

    #[test]
    fn reinserting_a_key_hands_back_the_old_driver() {
        let registry = ConnectionRegistry::with_capacity(2);
        assert!(registry.insert("a".into(), Arc::new(NullDriver)).is_none());
        assert!(registry.insert("b".into(), Arc::new(NullDriver)).is_none());
        let (key, _) = registry.insert("a".into(), Arc::new(NullDriver)).unwrap();
        assert_eq!(key, "a");
        assert!(registry.get("b").is_some());
    }

    #[test]
    fn drain_empties_the_registry() {
        let registry = ConnectionRegistry::with_capacity(4);
        registry.insert("a".into(), Arc::new(NullDriver));
        registry.insert("b".into(), Arc::new(NullDriver));
        assert_eq!(registry.drain().len(), 2);
        assert!(registry.get("a").is_none());
        assert!(registry.drain().is_empty());
    }
}
