//! # Aggregating Resolver
//!
//! Combines the results of an ordered list of attribute sources into one
//! logical result:
//! - Sequential scan in configured order
//! - Pluggable merge strategy applied left to right
//! - Per-source failure recovery (`recover_exceptions`) or fail-fast
//! - Union of declared attribute names across sources
//!
//! ## Example
//!
//! ```rust
//! use persondir::aggregate::AggregatingResolver;
//! use persondir::{AttributeMap, AttributeSource, Query};
//! use std::collections::HashSet;
//!
//! struct Directory;
//!
//! impl AttributeSource for Directory {
//!     fn resolve(&self, _query: &Query) -> anyhow::Result<Option<AttributeMap>> {
//!         Ok(Some(AttributeMap::new().with("email", ["edalquist@example.com"])))
//!     }
//!     fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
//!         Ok(Some(HashSet::from(["email".to_string()])))
//!     }
//!     fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
//!         Ok(Some(HashSet::from(["username".to_string()])))
//!     }
//! }
//!
//! let resolver = AggregatingResolver::builder()
//!     .source(Directory)
//!     .build()
//!     .unwrap();
//!
//! let person = resolver.resolve_person("edalquist").unwrap().unwrap();
//! assert_eq!(person.id(), "edalquist");
//! ```

mod config;
mod resolver;

pub use config::{AggregationConfig, QueryMode};
pub use resolver::{AggregatingResolver, AggregatingResolverBuilder};
