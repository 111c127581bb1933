//! Rule sets exposed as attribute sources

use std::collections::HashSet;
use std::sync::Arc;

use super::evaluator::RuleEvaluator;
use crate::merge::{AttributeMerger, MultivaluedAttributeMerger};
use crate::source::AttributeSource;
use crate::types::{AttributeMap, Query};

/// Adapts a [`RuleEvaluator`] to the [`AttributeSource`] contract
///
/// The query becomes the rule seed. The people produced by the applicable rule
/// are folded, in id order, into one attribute map with the configured merger.
#[derive(Debug, Clone)]
pub struct RuleSource {
    name: String,
    evaluator: RuleEvaluator,
    merger: Arc<dyn AttributeMerger>,
}

impl RuleSource {
    pub fn new(name: impl Into<String>, evaluator: RuleEvaluator) -> Self {
        Self {
            name: name.into(),
            evaluator,
            merger: Arc::new(MultivaluedAttributeMerger::new()),
        }
    }

    /// Replaces the merger used to fold several people into one map
    pub fn with_merger(mut self, merger: Arc<dyn AttributeMerger>) -> Self {
        self.merger = merger;
        self
    }

    pub fn evaluator(&self) -> &RuleEvaluator {
        &self.evaluator
    }
}

impl AttributeSource for RuleSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &Query) -> anyhow::Result<Option<AttributeMap>> {
        let seed = query.to_attribute_map();
        let Some(people) = self.evaluator.evaluate(&seed)? else {
            return Ok(None);
        };

        let mut people: Vec<_> = people.into_iter().collect();
        people.sort_by(|a, b| a.id().cmp(b.id()));

        let merged = people.into_iter().fold(AttributeMap::new(), |acc, person| {
            self.merger.merge(acc, person.attributes())
        });
        Ok(Some(merged))
    }

    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
        Ok(Some(self.evaluator.possible_attribute_names()))
    }

    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
        Ok(Some(self.evaluator.available_query_attributes()))
    }
}
