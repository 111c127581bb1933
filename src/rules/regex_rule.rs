//! Regex-triggered attribute rule
//!
//! The serializable [`RegexRuleDefinition`] is what configuration carries; it
//! is validated and compiled once into a [`RegexAttributeRule`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::AttributeRule;
use crate::error::{AttrError, Result};
use crate::types::{AttributeMap, AttributeValue, Person};

/// Declarative form of a [`RegexAttributeRule`]
///
/// ## Fields
///
/// - `when_key`: seed attribute inspected by the rule
/// - `when_pattern`: regex that one of its values must match in full
/// - `id_attribute`: seed attribute holding the person identifier
/// - `set_key` / `set_value`: the attribute the rule produces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegexRuleDefinition {
    #[serde(rename = "whenKey")]
    pub when_key: String,

    #[serde(rename = "whenPattern")]
    pub when_pattern: String,

    #[serde(rename = "idAttribute")]
    pub id_attribute: String,

    #[serde(rename = "setKey")]
    pub set_key: String,

    #[serde(rename = "setValue")]
    pub set_value: String,
}

impl RegexRuleDefinition {
    /// Validates the definition
    ///
    /// # Validation Rules
    ///
    /// 1. `when_key`, `id_attribute` and `set_key` cannot be empty
    /// 2. `when_pattern` must be a valid regular expression
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("whenKey", &self.when_key),
            ("idAttribute", &self.id_attribute),
            ("setKey", &self.set_key),
        ] {
            if value.is_empty() {
                return Err(AttrError::InvalidConfiguration(format!(
                    "rule field '{}' cannot be empty",
                    field
                )));
            }
        }

        Self::compile_pattern(&self.when_pattern).map(|_| ())
    }

    /// Validates and compiles the definition into a rule
    pub fn compile(self) -> Result<RegexAttributeRule> {
        self.validate()?;
        let pattern = Self::compile_pattern(&self.when_pattern)?;
        let name = format!("{}~{}=>{}", self.when_key, self.when_pattern, self.set_key);

        Ok(RegexAttributeRule {
            definition: self,
            pattern,
            name,
        })
    }

    // Anchored so a value must match in full, not just contain a match.
    fn compile_pattern(pattern: &str) -> Result<Regex> {
        Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            AttrError::InvalidConfiguration(format!("invalid rule pattern '{}': {}", pattern, e))
        })
    }
}

/// Produces `{set_key: [set_value]}` for seeds whose `when_key` matches
#[derive(Debug, Clone)]
pub struct RegexAttributeRule {
    definition: RegexRuleDefinition,
    pattern: Regex,
    name: String,
}

impl RegexAttributeRule {
    pub fn definition(&self) -> &RegexRuleDefinition {
        &self.definition
    }

    fn person_id(&self, seed: &AttributeMap) -> Result<String> {
        match seed.first_value(&self.definition.id_attribute) {
            Some(AttributeValue::Null) | None => Err(AttrError::InvalidArgument(format!(
                "seed has no value for id attribute '{}'",
                self.definition.id_attribute
            ))),
            Some(value) => Ok(value.to_string()),
        }
    }
}

impl AttributeRule for RegexAttributeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, seed: &AttributeMap) -> bool {
        seed.get(&self.definition.when_key)
            .map(|values| {
                values
                    .iter()
                    .filter(|value| !value.is_null())
                    .any(|value| self.pattern.is_match(&value.to_string()))
            })
            .unwrap_or(false)
    }

    fn evaluate(&self, seed: &AttributeMap) -> Result<HashSet<Person>> {
        if !self.applies_to(seed) {
            return Err(AttrError::InvalidState(format!(
                "rule '{}' evaluated for a seed it does not apply to",
                self.name
            )));
        }

        let id = self.person_id(seed)?;
        let attributes = AttributeMap::new().with(
            self.definition.set_key.clone(),
            [self.definition.set_value.clone()],
        );

        Ok(HashSet::from([Person::new(id, attributes)]))
    }

    fn possible_attribute_names(&self) -> HashSet<String> {
        HashSet::from([self.definition.set_key.clone()])
    }

    fn available_query_attributes(&self) -> HashSet<String> {
        HashSet::from([self.definition.when_key.clone()])
    }
}
