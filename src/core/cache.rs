//! Content-addressed result caching for the recognition pipeline.
//!
//! This module provides the digests that address cached outcomes
//! ([`ContentHash`] over image bytes, [`ParamsDigest`] over canonicalized
//! options) and the [`ResultCache`] itself: a bounded, TTL-expiring,
//! LRU-evicting map shared by all callers of a recognizer.
//!
//! Expired entries are purged lazily when a later `get` finds them, not by a
//! background sweep. The internal lock covers only the map operation; it is
//! never held across a processor or engine invocation.

use crate::core::traits::ProcessorOptions;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Deterministic digest of raw image bytes (blake3, 256-bit).
///
/// Equal byte sequences always produce equal hashes; distinct content
/// collides only with negligible probability.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Computes the digest of the given bytes.
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 hex chars are enough to tell entries apart in logs
        write!(f, "ContentHash({}…)", &self.to_hex()[..8])
    }
}

/// Stable digest over a canonicalized option map.
///
/// The digest hashes sorted `key=<json value>` lines, so it is insensitive to
/// insertion order and stable across process restarts; equality checks on it
/// remain valid for any persisted or cross-process use.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamsDigest([u8; 32]);

impl ParamsDigest {
    /// Computes the digest of the given option map.
    pub fn of(options: &ProcessorOptions) -> Self {
        let mut hasher = blake3::Hasher::new();
        // ProcessorOptions iterates in key order; nested maps serialize
        // key-sorted as well, so the byte stream is canonical.
        for (key, value) in options {
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(value.to_string().as_bytes());
            hasher.update(b"\n");
        }
        Self(*hasher.finalize().as_bytes())
    }
}

impl fmt::Debug for ParamsDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: String = self.0[..4].iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "ParamsDigest({hex}…)")
    }
}

/// Addresses one cached outcome line: image content plus challenge type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CacheKey {
    /// Digest of the image bytes.
    pub content_hash: ContentHash,
    /// The challenge type the result was computed under.
    pub captcha_type: String,
}

impl CacheKey {
    /// Creates a key from an image digest and a challenge type tag.
    pub fn new(content_hash: ContentHash, captcha_type: impl Into<String>) -> Self {
        Self {
            content_hash,
            captcha_type: captcha_type.into(),
        }
    }
}

/// One cached recognition outcome.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// The recognized result string.
    pub result: String,
    /// Digest of the options the result was computed under.
    pub params_digest: ParamsDigest,
    /// When the entry was created; never updated afterwards.
    pub created_at: Instant,
    /// When the entry was last returned by `get`.
    pub last_access_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Point-in-time cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently stored, expired ones included.
    pub total_entries: usize,
    /// Stored entries already past their TTL but not yet purged.
    pub expired_entries: usize,
    /// Stored entries still within their TTL.
    pub active_entries: usize,
    /// The configured capacity.
    pub max_size: usize,
    /// The configured time-to-live.
    pub ttl: Duration,
}

/// Bounded, TTL-expiring, LRU-evicting map from [`CacheKey`] to [`CacheEntry`].
///
/// All operations serialize on a single mutex held only for the duration of
/// the map operation. Capacity and TTL are fixed at construction.
#[derive(Debug)]
pub struct ResultCache {
    max_size: usize,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResultCache {
    /// Creates a cache with the given capacity and entry time-to-live.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum number of entries (> 0, validated by the
    ///   configuration layer).
    /// * `ttl` - Entry time-to-live.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            max_size,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up an entry, refreshing its access time on a hit.
    ///
    /// An absent or expired entry yields `None`; expired entries are removed
    /// on the spot.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut entries = self.lock_entries();

        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => entry.is_expired(self.ttl),
        };
        if expired {
            entries.remove(key);
            return None;
        }

        let entry = entries.get_mut(key)?;
        entry.last_access_at = Instant::now();
        Some(entry.clone())
    }

    /// Stores a recognition outcome under the given key.
    ///
    /// Inserting a new key at capacity first evicts exactly one entry, the
    /// one with the oldest access time. Storing under an existing key
    /// replaces it in place without eviction.
    pub fn put(&self, key: CacheKey, result: String, params_digest: ParamsDigest) {
        let mut entries = self.lock_entries();

        if !entries.contains_key(&key) && entries.len() >= self.max_size {
            Self::evict_lru(&mut entries);
        }

        let now = Instant::now();
        entries.insert(
            key,
            CacheEntry {
                result,
                params_digest,
                created_at: now,
                last_access_at: now,
            },
        );
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Returns whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Computes point-in-time statistics over the stored entries.
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock_entries();
        let total_entries = entries.len();
        let expired_entries = entries
            .values()
            .filter(|entry| entry.is_expired(self.ttl))
            .count();

        CacheStats {
            total_entries,
            expired_entries,
            active_entries: total_entries - expired_entries,
            max_size: self.max_size,
            ttl: self.ttl,
        }
    }

    /// Removes the entry with the oldest access time.
    fn evict_lru(entries: &mut HashMap<CacheKey, CacheEntry>) {
        let lru_key = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = lru_key {
            entries.remove(&key);
        }
    }

    /// Locks the entry map, recovering from poisoning.
    ///
    /// A caching failure must never abort the caller's request, so a
    /// poisoned lock hands back the inner state instead of propagating.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
