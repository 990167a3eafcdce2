//! Bounded LRU cache for analysis results.
//!
//! Keys are the canonical JSON bytes of the input, so two inputs share an
//! entry only when their serialisations are identical. Entries expire
//! after a fixed TTL and are dropped when read after expiry; inserting into
//! a full cache evicts the least recently used entry.

use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::OptionsRiskResult;

/// Canonical JSON bytes of an analysis request. Hashed with Fx for lookup
/// and compared byte for byte on a hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<u8>);

impl CacheKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

pub fn cache_key<K: Serialize + ?Sized>(key: &K) -> OptionsRiskResult<CacheKey> {
    Ok(CacheKey(serde_json::to_vec(key)?))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    last_used: u64,
}

struct CacheState<K, V> {
    entries: FxHashMap<K, Entry<V>>,
    tick: u64,
    stats: CacheStats,
}

pub struct AnalysisCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V: Clone> AnalysisCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: FxHashMap::default(),
                tick: 0,
                stats: CacheStats::default(),
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.cache_capacity, Duration::from_secs(config.cache_ttl_secs))
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut guard = self.state.lock();
        let CacheState {
            entries,
            tick,
            stats,
        } = &mut *guard;
        *tick += 1;

        let fresh = entries
            .get(key)
            .map(|e| now.saturating_duration_since(e.inserted_at) < self.ttl);

        match fresh {
            Some(true) => {
                if let Some(entry) = entries.get_mut(key) {
                    entry.last_used = *tick;
                    stats.hits += 1;
                    let value = entry.value.clone();
                    tracing::trace!(entries = entries.len(), "analysis cache hit");
                    return Some(value);
                }
            }
            Some(false) => {
                entries.remove(key);
                stats.expirations += 1;
                tracing::trace!(entries = entries.len(), "analysis cache entry expired");
            }
            None => {}
        }
        stats.misses += 1;
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        let mut state = self.state.lock();
        state.tick += 1;
        let tick = state.tick;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
                state.stats.evictions += 1;
                tracing::trace!(capacity = self.capacity, "analysis cache eviction");
            }
        }

        state.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                last_used: tick,
            },
        );
    }

    /// Return the cached value for `key`, or compute, store and return it.
    /// Errors are returned as-is and never cached.
    pub fn get_or_try_insert_with<F>(&self, key: K, compute: F) -> OptionsRiskResult<V>
    where
        F: FnOnce() -> OptionsRiskResult<V>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        tracing::debug!(dropped, "analysis cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptionsRiskError;

    #[test]
    fn test_hit_and_miss() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::new(4, Duration::from_secs(60));
        assert_eq!(cache.get(&1), None);
        cache.insert(1, 10);
        assert_eq!(cache.get(&1), Some(10));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache: AnalysisCache<u64, &str> = AnalysisCache::new(2, Duration::from_secs(60));
        cache.insert(1, "a");
        cache.insert(2, "b");
        // Touch 1 so 2 becomes the eviction candidate
        assert_eq!(cache.get(&1), Some("a"));
        cache.insert(3, "c");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some("a"));
        assert_eq!(cache.get(&3), Some("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::new(2, Duration::from_secs(60));
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(2, 20);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), Some(20));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::new(4, Duration::from_secs(30));
        let t0 = Instant::now();
        cache.insert_at(7, 70, t0);
        assert_eq!(cache.get_at(&7, t0 + Duration::from_secs(29)), Some(70));
        assert_eq!(cache.get_at(&7, t0 + Duration::from_secs(30)), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::new(4, Duration::from_secs(60));
        let result = cache.get_or_try_insert_with(5, || {
            Err(OptionsRiskError::DegenerateInput("boom".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());

        let value = cache.get_or_try_insert_with(5, || Ok(50)).unwrap();
        assert_eq!(value, 50);
        let again = cache.get_or_try_insert_with(5, || Ok(99)).unwrap();
        assert_eq!(again, 50);
    }

    #[test]
    fn test_cache_key_is_canonical() {
        #[derive(Serialize)]
        struct Probe {
            a: u32,
            b: &'static str,
        }
        let k1 = cache_key(&Probe { a: 1, b: "x" }).unwrap();
        let k2 = cache_key(&Probe { a: 1, b: "x" }).unwrap();
        let k3 = cache_key(&Probe { a: 2, b: "x" }).unwrap();
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert_eq!(k1.as_bytes(), br#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_distinct_keys_never_share_an_entry() {
        let cache: AnalysisCache<CacheKey, &str> = AnalysisCache::new(8, Duration::from_secs(60));
        let a = cache_key(&("SPY", 100)).unwrap();
        let b = cache_key(&("SPY", 101)).unwrap();
        cache.insert(a.clone(), "spy-100");
        assert_eq!(cache.get(&b), None);
        assert_eq!(cache.get(&a), Some("spy-100"));
    }

    #[test]
    fn test_clear_and_capacity() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::new(0, Duration::from_secs(60));
        // Capacity is at least one
        assert_eq!(cache.capacity(), 1);
        cache.insert(1, 1);
        assert_eq!(cache.get(&1), Some(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.stats().hits, 1);
    }
}
