//! Cache key generation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

use super::config::CacheKeyConfig;
use super::hashing::{entries_hash, RollingHash};
use super::operation::CacheableOperation;
use crate::error::{AttrError, Result};
use crate::types::{AttributeMap, Query, QueryValue};

/// Key for one memoised resolution call
///
/// Two keys are equal only when both the operation and the checksum/hash pair
/// match, so identical seeds never collide across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub operation: CacheableOperation,
    pub checksum: i64,
    pub hash: i32,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.operation, self.checksum, self.hash)
    }
}

/// Arguments of the call being keyed
#[derive(Debug, Clone, Copy)]
pub enum CacheArgs<'a> {
    /// Single identifier lookup
    Id(&'a str),
    /// Query with single or multi-valued terms
    Query(&'a Query),
    /// Multi-valued query given as an attribute map
    Attributes(&'a AttributeMap),
    /// No arguments (metadata calls)
    None,
}

/// Derives [`CacheKey`]s from an operation and its arguments
///
/// The generator is immutable after construction and can be shared freely.
#[derive(Debug, Clone)]
pub struct CacheKeyGenerator {
    config: CacheKeyConfig,
}

impl CacheKeyGenerator {
    /// Creates a generator
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidConfiguration`] if the default attribute is
    /// empty, or if an explicit key attribute set is empty or holds an empty name.
    pub fn new(config: CacheKeyConfig) -> Result<Self> {
        if config.default_attribute.is_empty() {
            return Err(AttrError::InvalidConfiguration(
                "cache key default attribute cannot be empty".to_string(),
            ));
        }
        if let Some(keys) = &config.key_attributes {
            if keys.is_empty() || keys.iter().any(String::is_empty) {
                return Err(AttrError::InvalidConfiguration(
                    "cache key attribute set must contain non-empty names".to_string(),
                ));
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &CacheKeyConfig {
        &self.config
    }

    /// Generates a key for a method named by its identity string
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::UnsupportedOperation`] when `method` is not one of
    /// the cacheable operations, and [`AttrError::InvalidArgument`] when the
    /// arguments do not fit the operation.
    pub fn generate_key(&self, method: &str, args: &CacheArgs<'_>) -> Result<Option<CacheKey>> {
        let operation: CacheableOperation = method.parse()?;
        self.generate_key_for(operation, args)
    }

    /// Generates a key for a known operation
    ///
    /// Returns `Ok(None)` when none of the selected attributes contribute a
    /// value; the caller must not cache such a call.
    pub fn generate_key_for(
        &self,
        operation: CacheableOperation,
        args: &CacheArgs<'_>,
    ) -> Result<Option<CacheKey>> {
        let sentinel = operation.sentinel_seed();
        let seed = match &sentinel {
            Some(seed) => Cow::Borrowed(seed),
            None => self.normalize(operation, args)?,
        };

        let mut key_entries: IndexMap<String, String> = IndexMap::new();
        for (name, value) in self.select(&seed, sentinel.is_some()) {
            if self.config.ignore_empty_attributes && value.is_empty() {
                debug!(attribute = name, "skipping empty cache key attribute");
                continue;
            }

            // keyed by name so equal values under different attributes stay distinct
            let digest = hex::encode(Sha512::digest(value.to_string().as_bytes()));
            key_entries.insert(name.to_string(), digest);
        }

        if key_entries.is_empty() {
            debug!(%operation, "no cache key attributes present, call will not be cached");
            return Ok(None);
        }

        let structural = entries_hash(
            key_entries
                .iter()
                .map(|(name, digest)| (name.as_str(), digest.as_str())),
        );
        let mut rolling = RollingHash::new();
        rolling.append(structural);

        Ok(Some(CacheKey {
            operation,
            checksum: rolling.checksum(),
            hash: rolling.hash(),
        }))
    }

    /// Turns the call arguments into a canonical seed
    fn normalize<'a>(
        &self,
        operation: CacheableOperation,
        args: &CacheArgs<'a>,
    ) -> Result<Cow<'a, Query>> {
        match (operation, args) {
            (CacheableOperation::ResolveById, CacheArgs::Id(uid)) => Ok(Cow::Owned(
                Query::new().with(self.config.default_attribute.clone(), *uid),
            )),
            (
                CacheableOperation::ResolveByQuery | CacheableOperation::ResolveByMultivaluedQuery,
                CacheArgs::Query(query),
            ) => Ok(Cow::Borrowed(*query)),
            (
                CacheableOperation::ResolveByQuery | CacheableOperation::ResolveByMultivaluedQuery,
                CacheArgs::Attributes(attributes),
            ) => Ok(Cow::Owned(Query::from(*attributes))),
            (operation, args) => Err(AttrError::InvalidArgument(format!(
                "{} cannot be keyed from {:?}",
                operation, args
            ))),
        }
    }

    /// Seed entries that participate in the key
    fn select<'s>(&self, seed: &'s Query, whole_seed: bool) -> Vec<(&'s str, &'s QueryValue)> {
        if whole_seed || self.config.use_all_attributes {
            return seed
                .iter()
                .map(|(name, value)| (name.as_str(), value))
                .collect();
        }

        match &self.config.key_attributes {
            Some(names) => names
                .iter()
                .filter_map(|name| seed.get_key_value(name))
                .map(|(name, value)| (name.as_str(), value))
                .collect(),
            None => seed
                .get_key_value(&self.config.default_attribute)
                .map(|(name, value)| vec![(name.as_str(), value)])
                .unwrap_or_default(),
        }
    }
}
