//! Pluggable map backends for the in-memory preference mapping.
//!
//! Implement [`MapBackend`] to bring your own concurrent map.

use serde_json::Value;
use std::collections::HashMap;

/// Trait that a concurrent map must satisfy to hold a [`PrefsStore`](crate::PrefsStore)
/// mapping.
///
/// Keys are preference names, values are arbitrary JSON. Every method works
/// with owned values so the store API stays uniform regardless of how the
/// backend keeps things internally.
pub trait MapBackend: Default + Send + Sync {
    /// Insert a preference, returning the previous value if any.
    fn insert(&self, key: String, value: Value) -> Option<Value>;

    /// Look up a preference by key.
    fn get(&self, key: &str) -> Option<Value>;

    /// Remove a preference, returning its value if it was present.
    fn remove(&self, key: &str) -> Option<Value>;

    /// Snapshot of all entries. Must not hold locks that would block writers
    /// once it returns.
    fn snapshot(&self) -> Vec<(String, Value)>;

    /// Number of entries.
    fn map_len(&self) -> usize {
        self.snapshot().len()
    }

    /// Check if a key exists. Override for backends that can skip the clone.
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drop all entries. The default does snapshot + remove; override with the
    /// backend's native clear when available.
    fn clear(&self) {
        for (k, _) in self.snapshot() {
            self.remove(&k);
        }
    }
}

// ---- ShardMap ----------------------------------------------------------------

impl MapBackend for shardmap::ShardMap<String, Value> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        shardmap::ShardMap::insert(self, key, value).map(|arc| (*arc).clone())
    }

    fn get(&self, key: &str) -> Option<Value> {
        shardmap::ShardMap::get(self, &key.to_owned()).map(|arc| (*arc).clone())
    }

    fn remove(&self, key: &str) -> Option<Value> {
        shardmap::ShardMap::remove(self, &key.to_owned()).map(|arc| (*arc).clone())
    }

    fn snapshot(&self) -> Vec<(String, Value)> {
        self.iter_snapshot()
            .map(|(k, arc_v)| (k, (*arc_v).clone()))
            .collect()
    }

    fn map_len(&self) -> usize {
        self.len()
    }

    // ShardMap::get hands back an Arc, so no value clone here.
    fn contains_key(&self, key: &str) -> bool {
        shardmap::ShardMap::get(self, &key.to_owned()).is_some()
    }
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl MapBackend for parking_lot::RwLock<HashMap<String, Value>> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        self.write().insert(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    fn snapshot(&self) -> Vec<(String, Value)> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn map_len(&self) -> usize {
        self.read().len()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn clear(&self) {
        self.write().clear()
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl MapBackend for dashmap::DashMap<String, Value> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        dashmap::DashMap::insert(self, key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        dashmap::DashMap::get(self, key).map(|r| r.value().clone())
    }

    fn remove(&self, key: &str) -> Option<Value> {
        dashmap::DashMap::remove(self, key).map(|(_, v)| v)
    }

    fn snapshot(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    fn map_len(&self) -> usize {
        self.len()
    }

    fn contains_key(&self, key: &str) -> bool {
        dashmap::DashMap::contains_key(self, key)
    }

    fn clear(&self) {
        dashmap::DashMap::clear(self)
    }
}
