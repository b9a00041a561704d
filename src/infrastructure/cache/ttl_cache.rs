//! In-memory TTL cache for derived payloads.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// A small keyed cache with a fixed time-to-live.
///
/// Used for mech status payloads and rendered animations, which are cheap
/// to hold and expensive to recompute. Reads are fail-open: an expired or
/// missing entry simply yields `None` and the caller recomputes.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value and its age in seconds, if still fresh.
    pub async fn get(&self, key: &K) -> Option<(V, f64)> {
        let entries = self.entries.read().await;
        let (inserted_at, value) = entries.get(key)?;
        let age = inserted_at.elapsed();
        if age <= self.ttl {
            Some((value.clone(), age.as_secs_f64()))
        } else {
            None
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        // Expired entries for other keys are dropped opportunistically.
        let ttl = self.ttl;
        entries.retain(|_, (inserted_at, _)| inserted_at.elapsed() <= ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub async fn invalidate_all(&self) {
        self.entries.write().await.clear();
    }
}
