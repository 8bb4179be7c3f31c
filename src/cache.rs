//! Content-addressed TTL cache for final generation outcomes.
//!
//! Only the final orchestration outcome is ever cached; individual provider
//! failures are not. Successful results get a long TTL, placeholders a short
//! one so dead providers are retried soon without being hammered.
//!
//! Entries are not invalidated when provider configuration changes: a cached
//! placeholder for a key that failed under the old configuration survives
//! until its TTL expires, even if a provider has since been enabled. The
//! short placeholder TTL bounds that staleness.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::orchestrator::GenerationResult;
use crate::request::NormalizedKey;

struct CacheEntry {
    result: GenerationResult,
    created: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created.elapsed() >= self.ttl
    }
}

/// Concurrent-safe in-memory TTL store keyed by normalized request digest.
pub struct ResultCache {
    entries: RwLock<HashMap<NormalizedKey, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a key. Expired entries behave as absent and are removed.
    pub async fn get(&self, key: &NormalizedKey) -> Option<GenerationResult> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.result.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but expired; drop it under the write lock
        let mut entries = self.entries.write().await;
        if entries.get(key).map(|e| e.is_expired()).unwrap_or(false) {
            entries.remove(key);
        }
        None
    }

    pub async fn set(&self, key: NormalizedKey, result: GenerationResult, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                result,
                created: Instant::now(),
                ttl,
            },
        );
    }

    pub async fn delete(&self, key: &NormalizedKey) {
        self.entries.write().await.remove(key);
    }

    pub async fn flush_all(&self) {
        self.entries.write().await.clear();
    }

    /// Drop every expired entry. Callers run this opportunistically; nothing
    /// in the lookup path depends on it.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
