//! Bounded TTL cache for synthesized decisions
//!
//! Expired entries are dropped lazily on read and by a periodic
//! [`TtlCache::sweep`]. Reads use `peek` so the LRU order stays the
//! insertion order and overflow evicts the oldest entry.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<LruCache<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live value for `key`; an expired entry is removed and never returned
    pub fn get(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        match entries.peek(key) {
            None => return None,
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => {}
        }
        entries.pop(key);
        None
    }

    /// Insert or replace; a replaced key moves to the newest position
    pub fn insert(&self, key: String, value: V, now: Instant) {
        let entry = CacheEntry {
            value,
            expires_at: now + self.ttl,
        };
        self.lock().put(key, entry);
    }

    /// Remove every expired entry; returns how many were removed
    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| now >= entry.expires_at)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
