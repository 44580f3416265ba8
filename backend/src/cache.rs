// src/cache.rs

//! Small time-bounded cache for store lookups (user profiles).
//!
//! Entries expire lazily: an entry older than the TTL reads as absent even while
//! it is still held in the map. Callers encode any partitioning into the key.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::CACHE_TTL;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CacheEntry {
    value: Value,
    stored_at: DateTime<Utc>,
}

/// Cloning shares the underlying entries.
#[derive(Clone)]
pub struct TtlCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;

        if !self.is_fresh(entry.stored_at, now) {
            return None;
        }

        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Skipping cache write for {}: {}", key, e);
                return;
            }
        };

        let stored_at = self.clock.now();
        self.lock().insert(key.to_string(), CacheEntry { value, stored_at });
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn clear_item(&self, key: &str) {
        self.lock().remove(key);
    }

    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match (now - stored_at).to_std() {
            Ok(elapsed) => elapsed < self.ttl,
            // Clock went backwards.
            Err(_) => true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new(start: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(start) }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    fn cache_with_clock() -> (TtlCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::with_clock(CACHE_TTL, clock.clone());
        (cache, clock)
    }

    #[test]
    fn returns_value_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &"v".to_string());

        clock.advance(Duration::from_secs(4 * 60 + 59));
        assert_eq!(cache.get::<String>("k"), Some("v".to_string()));
    }

    #[test]
    fn expires_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &"v".to_string());

        clock.advance(Duration::from_secs(5 * 60 + 1));
        assert_eq!(cache.get::<String>("k"), None);
    }

    #[test]
    fn expires_exactly_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &1u32);

        clock.advance(CACHE_TTL);
        assert_eq!(cache.get::<u32>("k"), None);
    }

    #[test]
    fn set_refreshes_timestamp() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &1u32);
        clock.advance(Duration::from_secs(200));
        cache.set("k", &2u32);
        clock.advance(Duration::from_secs(200));

        assert_eq!(cache.get::<u32>("k"), Some(2));
    }

    #[test]
    fn clear_item_and_clear() {
        let (cache, _clock) = cache_with_clock();
        cache.set("a", &1u32);
        cache.set("b", &2u32);

        cache.clear_item("a");
        assert_eq!(cache.get::<u32>("a"), None);
        assert_eq!(cache.get::<u32>("b"), Some(2));

        cache.clear();
        assert_eq!(cache.get::<u32>("b"), None);
    }

    #[test]
    fn clones_share_entries() {
        let (cache, _clock) = cache_with_clock();
        let other = cache.clone();
        cache.set("shared", &true);

        assert_eq!(other.get::<bool>("shared"), Some(true));
    }

    #[test]
    fn wrong_type_reads_as_absent() {
        let (cache, _clock) = cache_with_clock();
        cache.set("k", &"text");

        assert_eq!(cache.get::<u32>("k"), None);
    }
}
