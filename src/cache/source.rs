//! Cached attribute source

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache_key::{CacheArgs, CacheKey, CacheKeyGenerator, CacheableOperation};
use crate::error::{AttrError, Result};
use crate::source::AttributeSource;
use crate::types::{AttributeMap, Person, Query};

/// Configuration for the caching decorator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live for cache entries
    pub ttl: Duration,

    /// Maximum number of entries kept
    ///
    /// Past this size expired entries are swept first, then the oldest live
    /// entries are dropped until the cache is back at the limit.
    pub max_entries: usize,

    /// Also cache "no opinion" answers
    pub cache_absent_results: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_entries: 10_000,
            cache_absent_results: false,
        }
    }
}

/// Cache statistics for monitoring performance
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone)]
enum CachedValue {
    Attributes(Option<AttributeMap>),
    Names(Option<HashSet<String>>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    expires_at: Instant,
}

/// Attribute source decorator that memoises resolutions and metadata
///
/// Calls for which the key generator yields no key bypass the cache. Errors
/// are passed through and never cached.
///
/// # Examples
///
/// ```rust
/// use persondir::cache::{CacheConfig, CachingSource};
/// use persondir::cache_key::{CacheKeyConfig, CacheKeyGenerator};
/// use persondir::{AttributeMap, AttributeSource, Query};
/// use std::collections::HashSet;
///
/// struct Directory;
///
/// impl AttributeSource for Directory {
///     fn resolve(&self, _query: &Query) -> anyhow::Result<Option<AttributeMap>> {
///         Ok(Some(AttributeMap::new().with("name", ["Eric"])))
///     }
///     fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
///         Ok(None)
///     }
///     fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
///         Ok(None)
///     }
/// }
///
/// let generator = CacheKeyGenerator::new(CacheKeyConfig::default()).unwrap();
/// let cached = CachingSource::new(Directory, generator, CacheConfig::default());
///
/// let query = Query::new().with("username", "edalquist");
/// cached.resolve(&query).unwrap();
/// cached.resolve(&query).unwrap();
/// assert_eq!(cached.stats().hit_count, 1);
/// ```
pub struct CachingSource<S> {
    inner: S,
    generator: CacheKeyGenerator,
    config: CacheConfig,
    entries: DashMap<CacheKey, CacheEntry>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl<S: AttributeSource> CachingSource<S> {
    pub fn new(inner: S, generator: CacheKeyGenerator, config: CacheConfig) -> Self {
        Self {
            inner,
            generator,
            config,
            entries: DashMap::new(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Resolves the person identified by `uid`, cached by identifier
    ///
    /// The inner source is queried with `{default_attribute: uid}` where the
    /// default attribute comes from the key generator configuration.
    pub fn resolve_person(&self, uid: &str) -> Result<Option<Person>> {
        if uid.is_empty() {
            return Err(AttrError::InvalidArgument(
                "person identifier cannot be empty".to_string(),
            ));
        }

        let key = self
            .generator
            .generate_key_for(CacheableOperation::ResolveById, &CacheArgs::Id(uid))?;
        let attributes = self.cached_attributes(key, || {
            let query = Query::new().with(self.generator.config().default_attribute.clone(), uid);
            self.inner
                .resolve(&query)
                .map_err(|err| AttrError::source_failure(self.inner.name(), err))
        })?;

        Ok(attributes.map(|attributes| Person::new(uid, attributes)))
    }

    /// Clears the cache and resets statistics
    pub fn clear(&self) {
        self.entries.clear();
        self.hit_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        let size = self.entries.len();
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            size,
            hit_count: hits,
            miss_count: misses,
            hit_rate,
        }
    }

    fn cached_attributes<E, F>(
        &self,
        key: Option<CacheKey>,
        load: F,
    ) -> std::result::Result<Option<AttributeMap>, E>
    where
        F: FnOnce() -> std::result::Result<Option<AttributeMap>, E>,
    {
        let Some(key) = key else {
            return load();
        };

        if let Some(CachedValue::Attributes(value)) = self.lookup(&key) {
            return Ok(value);
        }

        let value = load()?;
        if value.is_some() || self.config.cache_absent_results {
            self.store(key, CachedValue::Attributes(value.clone()));
        }
        Ok(value)
    }

    fn cached_names<F>(
        &self,
        operation: CacheableOperation,
        load: F,
    ) -> anyhow::Result<Option<HashSet<String>>>
    where
        F: FnOnce() -> anyhow::Result<Option<HashSet<String>>>,
    {
        let Some(key) = self.generator.generate_key_for(operation, &CacheArgs::None)? else {
            return load();
        };

        if let Some(CachedValue::Names(value)) = self.lookup(&key) {
            return Ok(value);
        }

        let value = load()?;
        if value.is_some() || self.config.cache_absent_results {
            self.store(key, CachedValue::Names(value.clone()));
        }
        Ok(value)
    }

    fn lookup(&self, key: &CacheKey) -> Option<CachedValue> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "attribute cache hit");
                return Some(entry.value.clone());
            }
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    fn store(&self, key: CacheKey, value: CachedValue) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.config.ttl,
            },
        );

        if self.entries.len() > self.config.max_entries {
            self.evict_expired_entries();
        }
        if self.entries.len() > self.config.max_entries {
            self.evict_oldest_entries();
        }
    }

    fn evict_expired_entries(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
        debug!(size = self.entries.len(), "evicted expired attribute cache entries");
    }

    // Every entry shares one TTL, so the earliest expiry is the oldest insert.
    fn evict_oldest_entries(&self) {
        let mut by_age: Vec<(CacheKey, Instant)> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().expires_at))
            .collect();
        let excess = by_age.len().saturating_sub(self.config.max_entries);
        if excess == 0 {
            return;
        }

        by_age.sort_by_key(|(_, expires_at)| *expires_at);
        for (key, _) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        debug!(
            evicted = excess,
            size = self.entries.len(),
            "evicted oldest attribute cache entries"
        );
    }
}

impl<S: AttributeSource> AttributeSource for CachingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn resolve(&self, query: &Query) -> anyhow::Result<Option<AttributeMap>> {
        let key = self
            .generator
            .generate_key_for(CacheableOperation::ResolveByQuery, &CacheArgs::Query(query))?;
        self.cached_attributes(key, || self.inner.resolve(query))
    }

    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
        self.cached_names(CacheableOperation::PossibleAttributeNames, || {
            self.inner.possible_attribute_names()
        })
    }

    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
        self.cached_names(CacheableOperation::AvailableQueryAttributes, || {
            self.inner.available_query_attributes()
        })
    }
}

impl<S: AttributeSource> std::fmt::Debug for CachingSource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingSource")
            .field("inner", &self.inner.name())
            .field("config", &self.config)
            .field("size", &self.entries.len())
            .finish()
    }
}
