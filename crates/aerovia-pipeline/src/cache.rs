//! Read-through memoization of pipeline products.
//!
//! Entries are immutable once computed and shared by `Arc`; a cache is
//! invalidated only by using a different key, never by time. There is no
//! global state: callers own their cache instances.

use aerovia_traits::Result;
use aerovia_traits::types::Date;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

/// Key for memoized feature tables: the full provenance of the table.
///
/// The window parameters are spelled out; everything else that shapes the
/// output (model constants, input file paths) goes into `config_digest`
/// via [`FeatureCacheKey::digest`], so two runs that share a window but
/// differ in any generation parameter occupy distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureCacheKey {
    /// Generation seed.
    pub seed: u64,
    /// First date of the generation window.
    pub start: Date,
    /// Window length in days.
    pub days: usize,
    /// Gap-fill cap used during cleaning.
    pub max_gap_fill: usize,
    /// Digest of the remaining provenance, from [`FeatureCacheKey::digest`].
    pub config_digest: u64,
}

impl FeatureCacheKey {
    /// Digest an arbitrary serializable description of the table's
    /// provenance. An unserializable value digests to zero.
    #[must_use]
    pub fn digest<T: Serialize>(provenance: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        if let Ok(bytes) = serde_json::to_vec(provenance) {
            hasher.write(&bytes);
        }
        hasher.finish()
    }
}

/// Key for memoized analysis reports: the filter applied on top of a
/// feature table. The AQI ceiling is kept as a whole index value so the
/// key stays hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterCacheKey {
    /// Inclusive start of the date sub-range, if any.
    pub start: Option<Date>,
    /// Inclusive end of the date sub-range, if any.
    pub end: Option<Date>,
    /// AQI ceiling, if any.
    pub max_aqi: Option<u16>,
}

/// A read-through cache from keys to immutable shared values.
pub struct ResultCache<K, V> {
    entries: HashMap<K, Arc<V>>,
}

impl<K, V> fmt::Debug for ResultCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<K, V> Default for ResultCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ResultCache<K, V> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> ResultCache<K, V> {
    /// Look up a cached value.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).map(Arc::clone)
    }

    /// Return the cached value for `key`, computing and storing it on a
    /// miss. Repeated calls with the same key return the same `Arc`.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        Arc::clone(
            self.entries
                .entry(key)
                .or_insert_with(|| Arc::new(compute())),
        )
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    /// A failed computation stores nothing.
    ///
    /// # Errors
    ///
    /// Propagates the error from `compute`.
    pub fn try_get_or_compute(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V>,
    ) -> Result<Arc<V>> {
        if let Some(value) = self.entries.get(&key) {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(compute()?);
        self.entries.insert(key, Arc::clone(&value));
        Ok(value)
    }
}
