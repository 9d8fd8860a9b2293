use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sim_core::QuoteEntry;
use std::sync::Arc;

/// A named keyed cache of derived quote reads.
///
/// The tiers ("hot", "warm", "cold") are the same container under different
/// names; nothing evicts and there is no capacity bound. Entries are
/// overwritten wholesale on every refresher tick.
///
/// Timestamps must never move backwards per key. The refresher is the only
/// writer, but the guard is enforced here rather than assumed, so a delayed
/// tick racing a fresh one cannot publish stale data.
pub struct QuoteCache {
    name: String,
    entries: DashMap<String, QuoteEntry>,
}

impl QuoteCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overwrite the entry for `key`, stamped now. Returns false when the
    /// write was dropped as stale.
    pub fn set(&self, key: &str, value: f64, source: &str, confidence: f64) -> bool {
        self.set_at(key, value, source, confidence, Utc::now())
    }

    /// Timestamped write; the seam the monotonic guard is tested through.
    pub fn set_at(
        &self,
        key: &str,
        value: f64,
        source: &str,
        confidence: f64,
        timestamp: DateTime<Utc>,
    ) -> bool {
        let mut stale = false;
        self.entries
            .entry(key.to_string())
            .and_modify(|existing| {
                if timestamp < existing.timestamp {
                    stale = true;
                } else {
                    existing.value = value;
                    existing.timestamp = timestamp;
                    existing.source = source.to_string();
                    existing.confidence = confidence;
                }
            })
            .or_insert_with(|| QuoteEntry {
                key: key.to_string(),
                value,
                timestamp,
                source: source.to_string(),
                confidence,
            });
        if stale {
            tracing::debug!("🕳️ [{}] Dropped stale write for {}", self.name, key);
        }
        !stale
    }

    pub fn get(&self, key: &str) -> Option<QuoteEntry> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn snapshot(&self) -> Vec<QuoteEntry> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named caches created on demand. Convention: "hot" for refresher output,
/// "warm"/"cold" for derived aggregates.
#[derive(Default)]
pub struct CacheBank {
    caches: DashMap<String, Arc<QuoteCache>>,
}

impl CacheBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self, name: &str) -> Arc<QuoteCache> {
        self.caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(QuoteCache::new(name)))
            .value()
            .clone()
    }

    pub fn hot(&self) -> Arc<QuoteCache> {
        self.cache("hot")
    }

    pub fn names(&self) -> Vec<String> {
        self.caches.iter().map(|c| c.key().clone()).collect()
    }
}
