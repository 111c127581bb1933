//! First-match semantics of rule sets

use super::*;
use crate::error::{AttrError, Result};
use crate::source::AttributeSource;
use crate::types::{AttributeMap, AttributeValue, Person, Query};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Rule with a fixed applicability that counts evaluations
struct CountingRule {
    applies: bool,
    produces: &'static str,
    evaluations: AtomicUsize,
}

impl CountingRule {
    fn new(applies: bool, produces: &'static str) -> Arc<Self> {
        Arc::new(Self {
            applies,
            produces,
            evaluations: AtomicUsize::new(0),
        })
    }
}

impl AttributeRule for CountingRule {
    fn applies_to(&self, _seed: &AttributeMap) -> bool {
        self.applies
    }

    fn evaluate(&self, seed: &AttributeMap) -> Result<HashSet<Person>> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        if !self.applies_to(seed) {
            return Err(AttrError::InvalidState("not applicable".to_string()));
        }
        Ok(HashSet::from([Person::new(
            self.produces,
            AttributeMap::new().with("producedBy", [self.produces]),
        )]))
    }

    fn possible_attribute_names(&self) -> HashSet<String> {
        HashSet::from(["producedBy".to_string()])
    }

    fn available_query_attributes(&self) -> HashSet<String> {
        HashSet::from([format!("{}Key", self.produces)])
    }
}

#[test]
fn test_first_applicable_rule_wins() {
    let r1 = CountingRule::new(false, "r1");
    let r2 = CountingRule::new(true, "r2");
    let r3 = CountingRule::new(true, "r3");

    let rules: Vec<Arc<dyn AttributeRule>> = vec![r1.clone(), r2.clone(), r3.clone()];
    let evaluator = RuleEvaluator::new(rules).unwrap();
    let people = evaluator.evaluate(&AttributeMap::new()).unwrap().unwrap();

    assert_eq!(people.len(), 1);
    assert_eq!(people.iter().next().unwrap().id(), "r2");
    assert_eq!(r1.evaluations.load(Ordering::SeqCst), 0);
    assert_eq!(r2.evaluations.load(Ordering::SeqCst), 1);
    assert_eq!(r3.evaluations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_no_applicable_rule_has_no_opinion() {
    let r1 = CountingRule::new(false, "r1");
    let rules: Vec<Arc<dyn AttributeRule>> = vec![r1.clone()];
    let evaluator = RuleEvaluator::new(rules).unwrap();

    assert!(evaluator.evaluate(&AttributeMap::new()).unwrap().is_none());
    assert_eq!(r1.evaluations.load(Ordering::SeqCst), 0);
}

#[test]
fn test_declared_names_are_unions() {
    let rules: Vec<Arc<dyn AttributeRule>> =
        vec![CountingRule::new(false, "r1"), CountingRule::new(true, "r2")];
    let evaluator = RuleEvaluator::new(rules).unwrap();

    assert_eq!(evaluator.possible_attribute_names().len(), 1);
    let query_attrs = evaluator.available_query_attributes();
    assert!(query_attrs.contains("r1Key"));
    assert!(query_attrs.contains("r2Key"));
}

#[test]
fn test_rule_source_resolves_attribute_map() {
    let staff = RegexRuleDefinition {
        when_key: "email".to_string(),
        when_pattern: r".*@staff\.example\.com".to_string(),
        id_attribute: "username".to_string(),
        set_key: "affiliation".to_string(),
        set_value: "staff".to_string(),
    }
    .compile()
    .unwrap();
    let student = RegexRuleDefinition {
        when_key: "email".to_string(),
        when_pattern: r".*@example\.com".to_string(),
        id_attribute: "username".to_string(),
        set_key: "affiliation".to_string(),
        set_value: "student".to_string(),
    }
    .compile()
    .unwrap();

    let rules: Vec<Arc<dyn AttributeRule>> = vec![Arc::new(staff), Arc::new(student)];
    let source = RuleSource::new("affiliation-rules", RuleEvaluator::new(rules).unwrap());
    assert_eq!(source.name(), "affiliation-rules");

    let query = Query::new()
        .with("username", "edalquist")
        .with("email", "edalquist@staff.example.com");
    let attrs = source.resolve(&query).unwrap().unwrap();
    assert_eq!(
        attrs.get("affiliation").unwrap(),
        &vec![AttributeValue::from("staff")]
    );

    let query = Query::new()
        .with("username", "jdoe")
        .with("email", "jdoe@example.com");
    let attrs = source.resolve(&query).unwrap().unwrap();
    assert_eq!(
        attrs.get("affiliation").unwrap(),
        &vec![AttributeValue::from("student")]
    );

    let query = Query::new().with("username", "guest").with("email", "guest@other.org");
    assert!(source.resolve(&query).unwrap().is_none());

    assert!(source
        .available_query_attributes()
        .unwrap()
        .unwrap()
        .contains("email"));
}

#[test]
fn test_rule_source_surfaces_rule_errors() {
    let rule = RegexRuleDefinition {
        when_key: "email".to_string(),
        when_pattern: ".*".to_string(),
        id_attribute: "username".to_string(),
        set_key: "affiliation".to_string(),
        set_value: "any".to_string(),
    }
    .compile()
    .unwrap();
    let rules: Vec<Arc<dyn AttributeRule>> = vec![Arc::new(rule)];
    let source = RuleSource::new("rules", RuleEvaluator::new(rules).unwrap());

    let err = source
        .resolve(&Query::new().with("email", "x@y.org"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AttrError>(),
        Some(AttrError::InvalidArgument(_))
    ));
}
