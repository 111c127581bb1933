//! The rule contract

use std::collections::HashSet;

use crate::error::Result;
use crate::types::{AttributeMap, Person};

/// A conditional, single-purpose attribute derivation
///
/// A rule is either applicable to a seed or not; there is no other state.
/// Callers must check [`applies_to`](AttributeRule::applies_to) before calling
/// [`evaluate`](AttributeRule::evaluate). Evaluating a seed the rule does not
/// apply to fails with [`crate::AttrError::InvalidState`].
pub trait AttributeRule: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Pure predicate over the seed
    fn applies_to(&self, seed: &AttributeMap) -> bool;

    /// Derives the people this rule produces for the seed
    fn evaluate(&self, seed: &AttributeMap) -> Result<HashSet<Person>>;

    /// Attribute names this rule can produce
    fn possible_attribute_names(&self) -> HashSet<String>;

    /// Attribute names this rule reads from the seed
    fn available_query_attributes(&self) -> HashSet<String>;
}
