//! # Person Directory (persondir)
//!
//! Person attribute resolution engine with support for:
//! - Aggregation of many attribute sources into one view
//! - Pluggable merge strategies
//! - Rule-driven conditional attributes
//! - Deterministic cache keys for memoising resolvers
//! - Thread-safe concurrent access
//!
//! ## Example
//!
//! ```rust
//! use persondir::{AggregatingResolver, AttributeMap, AttributeSource, Query};
//! use std::collections::HashSet;
//!
//! struct Jdbc;
//!
//! impl AttributeSource for Jdbc {
//!     fn resolve(&self, _query: &Query) -> anyhow::Result<Option<AttributeMap>> {
//!         Ok(Some(AttributeMap::new().with("name", ["Eric"])))
//!     }
//!     fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
//!         Ok(Some(HashSet::from(["name".to_string()])))
//!     }
//!     fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
//!         Ok(Some(HashSet::from(["username".to_string()])))
//!     }
//! }
//!
//! # fn example() -> persondir::Result<()> {
//! let resolver = AggregatingResolver::builder().source(Jdbc).build()?;
//!
//! let person = resolver.resolve_person("edalquist")?.unwrap();
//! assert_eq!(person.attributes().first_value("name").unwrap().as_str(), Some("Eric"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod aggregate;
pub mod cache;
pub mod cache_key;
pub mod error;
pub mod merge;
pub mod rules;
pub mod source;
pub mod telemetry;
pub mod types;

pub use aggregate::{AggregatingResolver, AggregatingResolverBuilder, AggregationConfig, QueryMode};
pub use cache::{CacheConfig, CacheStats, CachingSource};
pub use cache_key::{CacheKey, CacheKeyConfig, CacheKeyGenerator, CacheableOperation};
pub use error::{AttrError, Result};
pub use merge::{AttributeMerger, MergeStrategy};
pub use rules::{AttributeRule, RuleEvaluator, RuleSource};
pub use source::AttributeSource;
pub use types::{AttributeMap, AttributeValue, Person, Query, QueryValue};
