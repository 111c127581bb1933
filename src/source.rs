//! The attribute source contract
//!
//! Concrete sources (LDAP, SQL, static lookups, request attributes) live
//! outside this crate. The engine only needs the four calls below.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{AttributeMap, Query};

/// A pluggable provider of person attributes
///
/// Every call distinguishes "no opinion" (`Ok(None)`) from "resolved, nothing
/// to report" (`Ok(Some(empty))`). Errors are whatever the source raises; the
/// aggregating resolver decides whether to swallow or propagate them.
///
/// Implementations must be immutable once constructed so a single instance can
/// be shared across threads.
///
/// # Examples
///
/// ```rust
/// use persondir::{AttributeMap, AttributeSource, Query};
/// use std::collections::HashSet;
///
/// struct Static;
///
/// impl AttributeSource for Static {
///     fn resolve(&self, _query: &Query) -> anyhow::Result<Option<AttributeMap>> {
///         Ok(Some(AttributeMap::new().with("affiliation", ["staff"])))
///     }
///
///     fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
///         Ok(Some(HashSet::from(["affiliation".to_string()])))
///     }
///
///     fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
///         Ok(None)
///     }
/// }
///
/// let attrs = Static.resolve(&Query::new()).unwrap().unwrap();
/// assert!(attrs.contains_key("affiliation"));
/// ```
pub trait AttributeSource: Send + Sync {
    /// Name used in logs and in [`crate::AttrError::SourceFailure`]
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Resolves attributes for the query
    fn resolve(&self, query: &Query) -> anyhow::Result<Option<AttributeMap>>;

    /// Every attribute name this source may return, `None` if unknown
    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>>;

    /// Attribute names this source can query on, `None` if unknown
    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>>;
}

impl<S: AttributeSource + ?Sized> AttributeSource for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(&self, query: &Query) -> anyhow::Result<Option<AttributeMap>> {
        (**self).resolve(query)
    }

    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
        (**self).possible_attribute_names()
    }

    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
        (**self).available_query_attributes()
    }
}
