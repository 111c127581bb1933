//! First-match rule evaluation

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::types::AttributeRule;
use crate::error::{AttrError, Result};
use crate::types::{AttributeMap, Person};

/// Ordered rule set that resolves at most one rule per seed
///
/// Rules are tried in configured order. The first rule whose `applies_to`
/// returns true is evaluated and its result returned; later rules are not
/// consulted. When nothing applies the evaluator has no opinion (`Ok(None)`).
#[derive(Clone)]
pub struct RuleEvaluator {
    rules: Vec<Arc<dyn AttributeRule>>,
}

impl RuleEvaluator {
    /// Creates an evaluator over a non-empty rule list
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidConfiguration`] if `rules` is empty.
    pub fn new(rules: Vec<Arc<dyn AttributeRule>>) -> Result<Self> {
        if rules.is_empty() {
            return Err(AttrError::InvalidConfiguration(
                "rule evaluator requires at least one rule".to_string(),
            ));
        }
        Ok(Self { rules })
    }

    /// Evaluates the first applicable rule
    pub fn evaluate(&self, seed: &AttributeMap) -> Result<Option<HashSet<Person>>> {
        for rule in &self.rules {
            if rule.applies_to(seed) {
                debug!(rule = rule.name(), "rule applies to seed");
                return rule.evaluate(seed).map(Some);
            }
        }

        debug!(rules = self.rules.len(), "no rule applies to seed");
        Ok(None)
    }

    /// Union of every rule's possible attribute names
    pub fn possible_attribute_names(&self) -> HashSet<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.possible_attribute_names())
            .collect()
    }

    /// Union of every rule's query attributes
    pub fn available_query_attributes(&self) -> HashSet<String> {
        self.rules
            .iter()
            .flat_map(|rule| rule.available_query_attributes())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEvaluator")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
