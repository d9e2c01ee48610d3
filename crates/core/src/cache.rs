use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

/// Time source for cache expiry. Injected so tests can advance time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn games_ttl() -> Duration {
    Duration::minutes(30)
}

pub fn history_ttl() -> Duration {
    Duration::hours(1)
}

pub fn teams_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone)]
struct Entry<V> {
    stored_at: DateTime<Utc>,
    value: V,
}

/// Time-bounded memoization: entries are served as clones until they age past
/// the TTL, then treated as absent. Stale entries are dropped on access.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K, clock: &dyn Clock) -> Option<V> {
        let now = clock.now();
        // Entries are plain data; a poisoned lock is still usable.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if now - entry.stored_at < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V, clock: &dyn Clock) {
        let entry = Entry {
            stored_at: clock.now(),
            value,
        };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, entry);
    }
}
