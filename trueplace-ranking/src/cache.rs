//! In-process result cache with a fixed time-to-live.
//!
//! Entries are keyed by the strings [`build_cache_key`](crate::build_cache_key)
//! produces. The cache never coordinates concurrent computations: two
//! requests that miss on the same key both compute, and whichever inserts
//! last wins.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::{Clock, SystemClock};

/// Time-to-live applied when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe map from cache key to value, expiring entries after a TTL.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use trueplace_ranking::{ManualClock, ResultCache};
///
/// let clock = Arc::new(ManualClock::new());
/// let cache = ResultCache::with_clock(Duration::from_secs(60), Arc::clone(&clock));
/// cache.insert("k".to_owned(), 7_u32);
/// assert_eq!(cache.get("k"), Some(7));
/// clock.advance(Duration::from_secs(60));
/// assert_eq!(cache.get("k"), None);
/// ```
#[derive(Debug)]
pub struct ResultCache<V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> ResultCache<V, SystemClock> {
    /// Create a cache on the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<V> Default for ResultCache<V, SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V, C: Clock> ResultCache<V, C> {
    /// Create a cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value`, replacing any entry under `key`.
    ///
    /// Expired entries are dropped first, so keys left behind by an older
    /// dataset fingerprint do not accumulate.
    pub fn insert(&self, key: String, value: V) {
        let inserted_at = self.clock.now();
        let mut entries = self.lock();
        entries.retain(|_, entry| !self.is_expired(entry, inserted_at));
        entries.insert(key, CacheEntry { value, inserted_at });
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        before.saturating_sub(entries.len())
    }

    /// Number of stored entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }

    // Mutations only run map calls under the lock, so a poisoned map is still whole.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone, C: Clock> ResultCache<V, C> {
    /// Return a live entry, evicting it instead when it has expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if !self.is_expired(entry, now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}
