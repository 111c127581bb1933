//! # Cache Keys
//!
//! Stable keys for memoising resolution calls:
//! - A closed set of cacheable operations ([`CacheableOperation`])
//! - Seed normalisation (ids, queries, metadata sentinels)
//! - Attribute selection (all, configured set, or the default attribute)
//! - SHA-512 digests of the selected values, folded by a checksum/hash pair
//!
//! A `None` key means the call must not be cached.
//!
//! ## Example
//!
//! ```rust
//! use persondir::cache_key::{CacheArgs, CacheKeyConfig, CacheKeyGenerator};
//!
//! let generator = CacheKeyGenerator::new(CacheKeyConfig::default()).unwrap();
//!
//! let key = generator
//!     .generate_key("resolve_by_id", &CacheArgs::Id("edalquist"))
//!     .unwrap()
//!     .unwrap();
//! let again = generator
//!     .generate_key("resolve_by_id", &CacheArgs::Id("edalquist"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(key, again);
//! ```

mod config;
mod generator;
mod hashing;
mod operation;

pub use config::CacheKeyConfig;
pub use generator::{CacheArgs, CacheKey, CacheKeyGenerator};
pub use operation::CacheableOperation;
