//! Query cache with JSON-serialized values.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Entry {
    bytes: Vec<u8>,
    stored_at: Instant,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// In-process cache for backend query results.
///
/// Values are stored as JSON so any `Serialize + DeserializeOwned` type can
/// share one cache. Entries older than `stale_after` are treated as missing.
/// The lock is never held across an `.await`.
pub struct QueryCache {
    entries: Mutex<HashMap<String, Entry>>,
    stale_after: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    /// Cache whose entries never go stale.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_after: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache whose entries are dropped after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            stale_after: Some(ttl),
            ..Self::new()
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.stale_after
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.stale_after
            .map_or(true, |ttl| entry.stored_at.elapsed() < ttl)
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has gone stale.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let bytes = {
            let mut entries = self.lock();
            match entries.get(key) {
                Some(entry) if self.is_fresh(entry) => Some(entry.bytes.clone()),
                Some(_) => {
                    entries.remove(key);
                    None
                }
                None => None,
            }
        };

        match bytes {
            Some(bytes) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key, "cache hit");
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key, "cache miss");
                Ok(None)
            }
        }
    }

    /// Like [`get`](Self::get) but a missing key is an error.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        self.get(key)?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.lock().insert(
            key.to_string(),
            Entry {
                bytes,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Delete a value. Returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Check if a fresh value exists for `key`.
    pub fn exists(&self, key: &str) -> bool {
        self.lock()
            .get(key)
            .map_or(false, |entry| self.is_fresh(entry))
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Remove every key that starts with `prefix`. Returns how many went.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(prefix, removed, "cache invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }

    /// Return the cached value or run `fetch` and cache its result.
    ///
    /// Errors from `fetch` are returned as-is and nothing is cached.
    pub async fn get_or_try_insert_with<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }
        let value = fetch().await?;
        self.set(key, &value)?;
        Ok(value)
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use parfum_cache::cache_key;
/// let key = cache_key!("skus", "product", 42);
/// assert_eq!(key, "skus:product:42");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr) => {
        String::from($prefix)
    };
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: String,
        price: i64,
    }

    #[test]
    fn test_set_get_delete() {
        let cache = QueryCache::new();
        let row = Row {
            id: "p1".to_string(),
            price: 5000,
        };
        cache.set("products:p1", &row).unwrap();
        assert!(cache.exists("products:p1"));
        assert_eq!(cache.get::<Row>("products:p1").unwrap(), Some(row));
        assert!(cache.delete("products:p1"));
        assert!(!cache.delete("products:p1"));
        assert!(cache.get::<Row>("products:p1").unwrap().is_none());
    }

    #[test]
    fn test_wrong_type_is_error() {
        let cache = QueryCache::new();
        cache.set("k", &"text").unwrap();
        assert!(cache.get::<Row>("k").is_err());
    }

    #[test]
    fn test_require_missing() {
        let cache = QueryCache::new();
        assert!(matches!(
            cache.require::<Row>("nope"),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalidate_prefix() {
        let cache = QueryCache::new();
        cache.set("orders:list:all", &1).unwrap();
        cache.set("orders:detail:o1", &2).unwrap();
        cache.set("products:all", &3).unwrap();
        assert_eq!(cache.invalidate_prefix("orders:"), 2);
        assert_eq!(cache.keys(), vec!["products:all".to_string()]);
    }

    #[test]
    fn test_stale_entries_are_dropped() {
        let cache = QueryCache::with_ttl(Duration::from_millis(0));
        cache.set("k", &1).unwrap();
        assert!(!cache.exists("k"));
        assert_eq!(cache.get::<i32>("k").unwrap(), None);
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_stats() {
        let cache = QueryCache::new();
        cache.set("a", &1).unwrap();
        let _ = cache.get::<i32>("a");
        let _ = cache.get::<i32>("b");
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("products"), "products");
        assert_eq!(cache_key!("skus", "p1"), "skus:p1");
        assert_eq!(cache_key!("orders", "page", 2), "orders:page:2");
    }

    #[tokio::test]
    async fn test_get_or_try_insert_with() {
        let cache = QueryCache::new();
        let first: Result<i32, CacheError> =
            cache.get_or_try_insert_with("n", || async { Ok(7) }).await;
        assert_eq!(first.unwrap(), 7);

        let second: Result<i32, CacheError> = cache
            .get_or_try_insert_with("n", || async { Ok(99) })
            .await;
        assert_eq!(second.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = QueryCache::new();
        let result: Result<i32, CacheError> = cache
            .get_or_try_insert_with("n", || async { Err(CacheError::NotFound("n".into())) })
            .await;
        assert!(result.is_err());
        assert!(!cache.exists("n"));
    }
}
