//! # Attribute Rules
//!
//! Declarative, first-match attribute derivation:
//! - [`AttributeRule`]: a predicate (`applies_to`) plus a derivation (`evaluate`)
//! - [`RuleEvaluator`]: tries rules in order and evaluates at most one
//! - [`RegexAttributeRule`]: sets an attribute when a seed value matches a regex
//! - [`RuleSource`]: exposes a rule set as an [`crate::AttributeSource`]
//!
//! ## Example
//!
//! ```rust
//! use persondir::rules::{AttributeRule, RegexRuleDefinition, RuleEvaluator};
//! use persondir::AttributeMap;
//! use std::sync::Arc;
//!
//! let rule = RegexRuleDefinition {
//!     when_key: "email".to_string(),
//!     when_pattern: r".*@example\.com".to_string(),
//!     id_attribute: "username".to_string(),
//!     set_key: "affiliation".to_string(),
//!     set_value: "member".to_string(),
//! }
//! .compile()
//! .unwrap();
//!
//! let rules: Vec<Arc<dyn AttributeRule>> = vec![Arc::new(rule)];
//! let evaluator = RuleEvaluator::new(rules).unwrap();
//! let seed = AttributeMap::new()
//!     .with("username", ["edalquist"])
//!     .with("email", ["edalquist@example.com"]);
//!
//! let people = evaluator.evaluate(&seed).unwrap().unwrap();
//! assert_eq!(people.len(), 1);
//! ```

mod evaluator;
mod regex_rule;
mod source;
mod types;

pub use evaluator::RuleEvaluator;
pub use regex_rule::{RegexAttributeRule, RegexRuleDefinition};
pub use source::RuleSource;
pub use types::AttributeRule;

#[cfg(test)]
mod tests;
