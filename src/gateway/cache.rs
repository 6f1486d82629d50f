use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::observability::metrics;

#[derive(Debug)]
pub struct CacheEntry<T> {
    pub data: Arc<T>,
    pub fetched_at_ms: i64,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            fetched_at_ms: self.fetched_at_ms,
        }
    }
}

/// One entry per key, last write wins. An entry is served strictly before
/// `fetched_at_ms + ttl_ms`; at or after that instant a read is a miss.
pub struct TtlCache<T> {
    name: &'static str,
    ttl_ms: i64,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(name: &'static str, ttl_ms: i64) -> Self {
        Self {
            name,
            ttl_ms,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str, now_ms: i64) -> Option<Arc<T>> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if now_ms < entry.fetched_at_ms.saturating_add(self.ttl_ms) => {
                debug!(cache = self.name, key, "Cache hit");
                metrics::cache::hit(self.name);
                Some(Arc::clone(&entry.data))
            }
            _ => {
                debug!(cache = self.name, key, "Cache miss");
                metrics::cache::miss(self.name);
                None
            }
        }
    }

    pub async fn insert(&self, key: impl Into<String>, data: Arc<T>, now_ms: i64) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.into(),
            CacheEntry {
                data,
                fetched_at_ms: now_ms,
            },
        );
    }

    /// Raw entry regardless of age
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<T>> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
