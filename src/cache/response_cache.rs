//! In-memory LLM response cache with TTL expiry and FIFO eviction.
//!
//! Lookup key is a SHA-256 fingerprint of `(provider, model, prompt)`, so a
//! cached answer is never served across a provider or model switch. Entries
//! expire after a fixed TTL and are removed lazily on the access that finds
//! them expired. When the cache is full, the oldest-inserted entry is evicted
//! regardless of how recently it was read (FIFO, not LRU).
//!
//! The cache is process-scoped: nothing is persisted, and a restart starts
//! cold. It never fails: any internal inconsistency is treated as a miss.

use std::collections::{HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tracing::debug;

/// Default entry lifetime: 30 minutes.
pub const DEFAULT_TTL_SECS: u64 = 1800;

/// Default capacity.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// A single cached response.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The response text.
    response: String,
    /// Unix timestamp when the entry was written.
    written_at: u64,
}

/// Response cache with TTL expiry and FIFO eviction.
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest key at the front. Holds exactly the keys of
    /// `entries`; both structures are updated together.
    order: VecDeque<String>,
    ttl_secs: u64,
    max_entries: usize,
    hits: u64,
    misses: u64,
    expired: u64,
    evicted: u64,
}

impl ResponseCache {
    /// Create a cache with the given TTL and capacity.
    ///
    /// `max_entries` is clamped to a minimum of 1 to prevent infinite
    /// eviction loops.
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            ttl_secs,
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
            expired: 0,
            evicted: 0,
        }
    }

    /// Build a deterministic lookup key: SHA-256 of `(provider, model, prompt)`.
    ///
    /// Uses length-prefixed encoding to prevent separator collisions
    /// (e.g. `provider="a|b"` vs `provider="a", model="|b"`).
    pub fn fingerprint(provider: &str, model: &str, prompt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update((provider.len() as u64).to_le_bytes());
        hasher.update(provider.as_bytes());
        hasher.update((model.len() as u64).to_le_bytes());
        hasher.update(model.as_bytes());
        hasher.update((prompt.len() as u64).to_le_bytes());
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a cached response. Returns `None` when the fingerprint is
    /// absent or the entry has aged past the TTL.
    ///
    /// An entry found expired is removed on the spot rather than waiting for
    /// insertion pressure.
    pub fn get(&mut self, provider: &str, model: &str, prompt: &str) -> Option<String> {
        let key = Self::fingerprint(provider, model, prompt);
        let now = Self::now_secs();
        // Check expiry with an immutable borrow first to avoid overlapping borrows.
        let expired = self
            .entries
            .get(&key)
            .map(|e| now.saturating_sub(e.written_at) >= self.ttl_secs);
        match expired {
            Some(true) => {
                debug!(key = %&key[..8.min(key.len())], "cache entry expired, removing");
                self.entries.remove(&key);
                self.order.retain(|k| k != &key);
                self.expired += 1;
                self.misses += 1;
                None
            }
            Some(false) => {
                self.hits += 1;
                self.entries.get(&key).map(|e| e.response.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a response.
    ///
    /// Expired entries are swept first. If the cache is still at capacity and
    /// the fingerprint is new, the oldest-inserted entry is evicted to make
    /// room. Re-writing an existing fingerprint refreshes the value and
    /// timestamp but keeps its original place in the insertion order, and
    /// never evicts.
    pub fn put(&mut self, provider: &str, model: &str, prompt: &str, response: String) {
        let key = Self::fingerprint(provider, model, prompt);
        let now = Self::now_secs();
        self.evict_expired(now);

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.response = response;
            entry.written_at = now;
            return;
        }

        while self.entries.len() >= self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            debug!(key = %&oldest[..8.min(oldest.len())], "evicting oldest cache entry");
            self.entries.remove(&oldest);
            self.evicted += 1;
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                response,
                written_at: now,
            },
        );
        self.order.push_back(key);
    }

    /// Remove all entries. Hit/miss counters are lifetime totals and survive.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        debug!("response cache cleared");
    }

    /// Aggregate statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            expired: self.expired,
            evicted: self.evicted,
        }
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -- private helpers ---------------------------------------------------

    fn evict_expired(&mut self, now: u64) {
        let ttl = self.ttl_secs;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_sub(e.written_at) < ttl);
        if self.entries.len() != before {
            self.expired += (before - self.entries.len()) as u64;
            self.order.retain(|k| self.entries.contains_key(k));
        }
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS, DEFAULT_MAX_ENTRIES)
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing usable.
    pub misses: u64,
    /// Entries removed because they aged past the TTL.
    pub expired: u64,
    /// Entries removed to make room at capacity.
    pub evicted: u64,
}
