//! The merger trait and its configuration-facing selector

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::multivalued::MultivaluedAttributeMerger;
use super::simple::{
    NoncollidingAttributeMerger, ReplacingAttributeMerger, ReturnChangesAttributeMerger,
    ReturnOriginalAttributeMerger,
};
use crate::types::AttributeMap;

/// Combines two attribute maps into one
///
/// `to_consider` is only borrowed and is never modified. `to_modify` is owned
/// by the merger, which may change it in place and hand it back.
pub trait AttributeMerger: Send + Sync + std::fmt::Debug {
    /// Merges `to_consider` into `to_modify`
    fn merge(&self, to_modify: AttributeMap, to_consider: &AttributeMap) -> AttributeMap;

    /// Merges two attribute-name sets (union by default)
    fn merge_names(
        &self,
        mut to_modify: HashSet<String>,
        to_consider: &HashSet<String>,
    ) -> HashSet<String> {
        to_modify.extend(to_consider.iter().cloned());
        to_modify
    }
}

/// Named merge strategies, for selecting a merger from configuration
///
/// ```rust
/// use persondir::merge::MergeStrategy;
///
/// let strategy: MergeStrategy = serde_json::from_str(r#""noncolliding""#).unwrap();
/// assert_eq!(strategy, MergeStrategy::Noncolliding);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    #[default]
    Multivalued,
    MultivaluedDistinct,
    Replacing,
    Noncolliding,
    ReturnChanges,
    ReturnOriginal,
}

impl MergeStrategy {
    /// Builds the merger this strategy names
    pub fn into_merger(self) -> Arc<dyn AttributeMerger> {
        match self {
            MergeStrategy::Multivalued => Arc::new(MultivaluedAttributeMerger::new()),
            MergeStrategy::MultivaluedDistinct => Arc::new(MultivaluedAttributeMerger::distinct()),
            MergeStrategy::Replacing => Arc::new(ReplacingAttributeMerger),
            MergeStrategy::Noncolliding => Arc::new(NoncollidingAttributeMerger),
            MergeStrategy::ReturnChanges => Arc::new(ReturnChangesAttributeMerger),
            MergeStrategy::ReturnOriginal => Arc::new(ReturnOriginalAttributeMerger),
        }
    }
}
