//! The closed set of cacheable operations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AttrError;
use crate::types::Query;

/// Resolver operations whose results may be memoised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheableOperation {
    ResolveById,
    ResolveByQuery,
    ResolveByMultivaluedQuery,
    PossibleAttributeNames,
    AvailableQueryAttributes,
}

impl CacheableOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheableOperation::ResolveById => "resolve_by_id",
            CacheableOperation::ResolveByQuery => "resolve_by_query",
            CacheableOperation::ResolveByMultivaluedQuery => "resolve_by_multivalued_query",
            CacheableOperation::PossibleAttributeNames => "possible_attribute_names",
            CacheableOperation::AvailableQueryAttributes => "available_query_attributes",
        }
    }

    /// Fixed seed for the metadata operations
    ///
    /// Metadata results do not depend on any query, so each metadata operation
    /// is keyed by its own constant seed.
    pub(crate) fn sentinel_seed(&self) -> Option<Query> {
        match self {
            CacheableOperation::PossibleAttributeNames
            | CacheableOperation::AvailableQueryAttributes => {
                let marker = format!("{}_seed", self.as_str());
                Some(Query::new().with(marker.clone(), marker))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CacheableOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheableOperation {
    type Err = AttrError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method {
            "resolve_by_id" => Ok(CacheableOperation::ResolveById),
            "resolve_by_query" => Ok(CacheableOperation::ResolveByQuery),
            "resolve_by_multivalued_query" => Ok(CacheableOperation::ResolveByMultivaluedQuery),
            "possible_attribute_names" => Ok(CacheableOperation::PossibleAttributeNames),
            "available_query_attributes" => Ok(CacheableOperation::AvailableQueryAttributes),
            other => Err(AttrError::UnsupportedOperation(format!(
                "'{}' is not a cacheable operation",
                other
            ))),
        }
    }
}
