use chrono::NaiveDate;
use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::types::{ScanResult, ScanType};

/// A thread-safe cache with TTL support.
///
/// Entries are replaced wholesale on insert and are never mutated in place,
/// so concurrent writers for the same key simply race (last writer wins).
pub struct Cache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    /// Create a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a value if it is younger than the TTL. Expired entries are evicted.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.created_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Insert or replace a value.
    pub fn insert(&self, key: K, value: V) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Remove all expired entries from the cache.
    pub fn cleanup(&self) {
        let ttl = self.ttl;
        self.data.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }

    /// Get the number of entries in the cache (including expired).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Scan results keyed by scan type and market calendar day.
pub type ScanCache = Cache<(ScanType, NaiveDate), ScanResult>;
