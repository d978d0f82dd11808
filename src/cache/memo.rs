//! Unbounded memo table with explicit invalidation

use crate::cache::key::CacheKey;
use crate::error::HaetaeResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Memoized results keyed by [`CacheKey`]
///
/// Values are cloned out on every hit, so wrap large values in `Arc`.
/// Failed computations are never cached.
pub struct Memo<V> {
    name: &'static str,
    entries: Mutex<HashMap<CacheKey, V>>,
}

impl<V: Clone> Memo<V> {
    /// Create an empty memo table; `name` only shows up in logs
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a cached value
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Cache a value, replacing any previous entry
    pub fn insert(&self, key: CacheKey, value: V) {
        self.lock().insert(key, value);
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        let mut entries = self.lock();
        debug!("Invalidating {} cache ({} entries)", self.name, entries.len());
        entries.clear();
    }

    /// Return the cached value for `key`, or run `init` and cache its result
    ///
    /// The lock is not held while `init` runs.
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: CacheKey, init: F) -> HaetaeResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HaetaeResult<V>>,
    {
        if let Some(value) = self.get(&key) {
            debug!("{} cache hit: {}", self.name, key);
            return Ok(value);
        }

        let value = init().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
