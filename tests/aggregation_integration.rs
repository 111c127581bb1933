//! End-to-end aggregation scenarios

mod common;

#[cfg(test)]
mod integration_tests {
    use super::common::{
        jdbc_source, ldap_source, ConnectionRefused, DirectorySource, OfflineSource,
    };
    use persondir::rules::RegexRuleDefinition;
    use persondir::{
        AggregatingResolver, AggregationConfig, AttrError, AttributeMap, AttributeRule,
        AttributeSource, AttributeValue, MergeStrategy, Query, QueryMode, RuleEvaluator, RuleSource,
    };
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_jdbc_and_ldap_merge() {
        let resolver = AggregatingResolver::builder()
            .source(jdbc_source())
            .source(ldap_source())
            .recover_exceptions(true)
            .build()
            .unwrap();

        let person = resolver.resolve_person("edalquist").unwrap().unwrap();

        let expected = AttributeMap::new()
            .with("name", ["Eric"])
            .with("email", ["edalquist@example.com"]);
        assert_eq!(person.id(), "edalquist");
        assert_eq!(person.attributes(), &expected);
    }

    #[test]
    fn test_outage_recovered() {
        let resolver = AggregatingResolver::builder()
            .source(OfflineSource)
            .source(jdbc_source())
            .source(ldap_source())
            .build()
            .unwrap();

        let attributes = resolver
            .resolve(&Query::new().with("username", "edalquist"))
            .unwrap()
            .unwrap();
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_outage_fails_fast() {
        let jdbc = Arc::new(jdbc_source());
        let resolver = AggregatingResolver::builder()
            .source(OfflineSource)
            .shared_source(jdbc.clone())
            .recover_exceptions(false)
            .build()
            .unwrap();

        let err = resolver.resolve_person("edalquist").unwrap_err();
        assert_eq!(err.failed_source(), Some("offline"));
        match err {
            AttrError::SourceFailure { error, .. } => {
                assert!(error.downcast_ref::<ConnectionRefused>().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(jdbc.calls(), 0);
    }

    #[test]
    fn test_nested_outage_fails_fast_with_original_error() {
        let inner = AggregatingResolver::builder()
            .name("inner")
            .source(OfflineSource)
            .recover_exceptions(false)
            .build()
            .unwrap();
        let outer = AggregatingResolver::builder()
            .name("outer")
            .source(inner)
            .source(ldap_source())
            .recover_exceptions(false)
            .build()
            .unwrap();

        let err = outer.resolve_person("edalquist").unwrap_err();
        assert_eq!(err.failed_source(), Some("offline"));
        match err {
            AttrError::SourceFailure { error, .. } => {
                assert!(error.downcast_ref::<ConnectionRefused>().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_person_is_absent() {
        let resolver = AggregatingResolver::builder()
            .source(jdbc_source())
            .source(ldap_source())
            .build()
            .unwrap();

        assert!(resolver.resolve_person("nobody").unwrap().is_none());
    }

    #[test]
    fn test_metadata_union() {
        let resolver = AggregatingResolver::builder()
            .source(jdbc_source())
            .source(ldap_source())
            .build()
            .unwrap();

        let names = resolver.possible_attribute_names().unwrap().unwrap();
        assert_eq!(
            names,
            HashSet::from(["name".to_string(), "email".to_string()])
        );

        let query_attrs = resolver.available_query_attributes().unwrap().unwrap();
        assert_eq!(query_attrs, HashSet::from(["username".to_string()]));
    }

    #[test]
    fn test_accumulated_query_chains_sources() {
        // the group directory is keyed by email, which only ldap knows
        let groups = DirectorySource::new("groups", "email").row(
            "edalquist@example.com",
            AttributeMap::new().with("memberOf", ["staff", "faculty"]),
        );

        let chained = AggregatingResolver::builder()
            .source(ldap_source())
            .source(groups)
            .query_mode(QueryMode::Accumulated)
            .build()
            .unwrap();

        let person = chained.resolve_person("edalquist").unwrap().unwrap();
        assert_eq!(person.attributes().get("memberOf").unwrap().len(), 2);

        let groups = DirectorySource::new("groups", "email").row(
            "edalquist@example.com",
            AttributeMap::new().with("memberOf", ["staff"]),
        );
        let isolated = AggregatingResolver::builder()
            .source(ldap_source())
            .source(groups)
            .build()
            .unwrap();

        let person = isolated.resolve_person("edalquist").unwrap().unwrap();
        assert!(!person.attributes().contains_key("memberOf"));
    }

    #[test]
    fn test_rules_inside_aggregate() {
        let staff_rule = RegexRuleDefinition {
            when_key: "username".to_string(),
            when_pattern: "ed.*".to_string(),
            id_attribute: "username".to_string(),
            set_key: "affiliation".to_string(),
            set_value: "staff".to_string(),
        }
        .compile()
        .unwrap();
        let guest_rule = RegexRuleDefinition {
            when_key: "username".to_string(),
            when_pattern: ".*".to_string(),
            id_attribute: "username".to_string(),
            set_key: "affiliation".to_string(),
            set_value: "guest".to_string(),
        }
        .compile()
        .unwrap();

        let rules: Vec<Arc<dyn AttributeRule>> = vec![Arc::new(staff_rule), Arc::new(guest_rule)];
        let evaluator = RuleEvaluator::new(rules).unwrap();

        let resolver = AggregatingResolver::builder()
            .source(jdbc_source())
            .source(RuleSource::new("affiliation-rules", evaluator))
            .build()
            .unwrap();

        let eric = resolver.resolve_person("edalquist").unwrap().unwrap();
        assert_eq!(
            eric.attributes().first_value("affiliation").unwrap().as_str(),
            Some("staff")
        );
        assert_eq!(eric.attributes().get("affiliation").unwrap().len(), 1);

        let jane = resolver.resolve_person("jdoe").unwrap().unwrap();
        assert_eq!(
            jane.attributes().first_value("affiliation").unwrap().as_str(),
            Some("guest")
        );
    }

    #[test]
    fn test_rule_definition_from_json() {
        let json = r#"{
            "whenKey": "username",
            "whenPattern": "ed.*",
            "idAttribute": "username",
            "setKey": "affiliation",
            "setValue": "staff"
        }"#;

        let definition: RegexRuleDefinition = serde_json::from_str(json).unwrap();
        let rule = definition.compile().unwrap();

        let seed = AttributeMap::new().with("username", ["edalquist"]);
        assert!(rule.applies_to(&seed));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "recover_exceptions": false,
            "query_mode": "accumulated",
            "username_attribute": "uid"
        }"#;
        let config: AggregationConfig = serde_json::from_str(json).unwrap();
        assert!(!config.recover_exceptions);
        assert_eq!(config.query_mode, QueryMode::Accumulated);
        assert!(!config.stop_on_success);

        let strategy: MergeStrategy = serde_json::from_str(r#""replacing""#).unwrap();

        let resolver = AggregatingResolver::builder()
            .source(DirectorySource::new("jdbc", "uid").row(
                "edalquist",
                AttributeMap::new().with("name", ["Eric"]),
            ))
            .source(DirectorySource::new("hr", "uid").row(
                "edalquist",
                AttributeMap::new().with("name", ["Eric Dalquist"]),
            ))
            .config(config)
            .merge_strategy(strategy)
            .build()
            .unwrap();

        let person = resolver.resolve_person("edalquist").unwrap().unwrap();
        assert_eq!(
            person.attributes().get("name").unwrap(),
            &vec![AttributeValue::from("Eric Dalquist")]
        );
    }

    #[test]
    fn test_nested_resolver_as_source() {
        let inner = AggregatingResolver::builder()
            .name("campus")
            .source(jdbc_source())
            .build()
            .unwrap();
        assert_eq!(AttributeSource::name(&inner), "campus");

        let outer = AggregatingResolver::builder()
            .source(inner)
            .source(ldap_source())
            .build()
            .unwrap();

        let person = outer.resolve_person("edalquist").unwrap().unwrap();
        assert_eq!(person.attributes().len(), 2);
    }
}
