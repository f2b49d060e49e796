use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::{RepositoryError, RepositoryResult};

/// Key/value store abstraction the in-memory repositories are built on.
pub trait CatalogStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> RepositoryResult<Option<V>>;
    fn upsert(&self, key: K, value: V) -> RepositoryResult<()>;
    fn remove(&self, key: &K) -> RepositoryResult<Option<V>>;
    /// All values, ordered by key.
    fn list(&self) -> RepositoryResult<Vec<V>>;
}

impl<K, V, S> CatalogStore<K, V> for Arc<S>
where
    S: CatalogStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> RepositoryResult<Option<V>> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) -> RepositoryResult<()> {
        (**self).upsert(key, value)
    }

    fn remove(&self, key: &K) -> RepositoryResult<Option<V>> {
        (**self).remove(key)
    }

    fn list(&self) -> RepositoryResult<Vec<V>> {
        (**self).list()
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryCatalogStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryCatalogStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryCatalogStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CatalogStore<K, V> for InMemoryCatalogStore<K, V>
where
    K: Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> RepositoryResult<Option<V>> {
        let map = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("get"))?;
        Ok(map.get(key).cloned())
    }

    fn upsert(&self, key: K, value: V) -> RepositoryResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("upsert"))?;
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> RepositoryResult<Option<V>> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("remove"))?;
        Ok(map.remove(key))
    }

    fn list(&self) -> RepositoryResult<Vec<V>> {
        let map = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("list"))?;
        Ok(map.values().cloned().collect())
    }
}
