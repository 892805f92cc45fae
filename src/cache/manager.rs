/// Write-once in-memory cache
///
/// Thread-safe, generic over key/value types. Entries never expire and the
/// first value stored for a key wins: later inserts return the stored value
/// instead of replacing it.
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

/// Cache metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    /// Inserts that lost to an existing entry
    pub rejected: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    data: RwLock<HashMap<K, V>>,
    metrics: RwLock<CacheMetrics>,
}

impl<K, V> Default for CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            metrics: RwLock::new(CacheMetrics::default()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.data.read().get(key).cloned();
        let mut metrics = self.metrics.write();
        if value.is_some() {
            metrics.hits += 1;
        } else {
            metrics.misses += 1;
        }
        value
    }

    /// Store `value` unless the key is already present; returns the value that ended up cached
    pub fn insert_if_absent(&self, key: K, value: V) -> V {
        let mut data = self.data.write();
        let mut metrics = self.metrics.write();
        match data.get(&key) {
            Some(existing) => {
                metrics.rejected += 1;
                existing.clone()
            }
            None => {
                metrics.inserts += 1;
                data.insert(key, value.clone());
                value
            }
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let cache = CacheManager::new();

        cache.insert_if_absent("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.get(&"nonexistent".to_string()), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.hit_rate(), 0.5);
    }

    #[test]
    fn test_first_write_wins() {
        let cache = CacheManager::new();
        assert!(!cache.insert_if_absent("mint", false));
        assert!(!cache.insert_if_absent("mint", true));
        assert_eq!(cache.get(&"mint"), Some(false));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.metrics().rejected, 1);
    }

    #[test]
    fn test_concurrent_inserts_agree() {
        let cache = Arc::new(CacheManager::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || cache.insert_if_absent("shared".to_string(), i))
            })
            .collect();

        let results: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = cache.get(&"shared".to_string()).unwrap();
        assert!(results.iter().all(|r| *r == stored));
    }
}
