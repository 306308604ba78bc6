use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key/value store abstraction for catalog records.
///
/// `list` returns values in key order. Ids are UUIDv7, so key order is
/// insertion order.
pub trait Store<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V);
    fn remove(&self, key: &K) -> Option<V>;
    fn list(&self) -> Vec<V>;
    /// Remove every record for which `keep` returns false; returns how many were removed.
    fn retain(&self, keep: &dyn Fn(&V) -> bool) -> usize;
}

impl<K, V, S> Store<K, V> for Arc<S>
where
    S: Store<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) {
        (**self).upsert(key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        (**self).remove(key)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn retain(&self, keep: &dyn Fn(&V) -> bool) -> usize {
        (**self).retain(keep)
    }
}

/// In-memory store for tests/dev (and the only backend the server ships with).
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryStore<K, V> {
    // Poisoning is ignored: every write is a single map call and leaves the map consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<K, V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<K, V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Store<K, V> for InMemoryStore<K, V>
where
    K: Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        self.read().get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.write().remove(key)
    }

    fn list(&self) -> Vec<V> {
        self.read().values().cloned().collect()
    }

    fn retain(&self, keep: &dyn Fn(&V) -> bool) -> usize {
        let mut map = self.write();
        let before = map.len();
        map.retain(|_k, v| keep(v));
        before - map.len()
    }
}
