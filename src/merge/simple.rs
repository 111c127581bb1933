//! Replacing, non-colliding and pass-through mergers

use super::merger::AttributeMerger;
use crate::types::AttributeMap;

/// Later sources overwrite earlier values wholesale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplacingAttributeMerger;

impl AttributeMerger for ReplacingAttributeMerger {
    fn merge(&self, mut to_modify: AttributeMap, to_consider: &AttributeMap) -> AttributeMap {
        for (name, values) in to_consider {
            to_modify.insert(name.clone(), values.clone());
        }
        to_modify
    }
}

/// First writer wins: only attributes missing so far are copied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoncollidingAttributeMerger;

impl AttributeMerger for NoncollidingAttributeMerger {
    fn merge(&self, mut to_modify: AttributeMap, to_consider: &AttributeMap) -> AttributeMap {
        for (name, values) in to_consider {
            if !to_modify.contains_key(name) {
                to_modify.insert(name.clone(), values.clone());
            }
        }
        to_modify
    }
}

/// Discards the accumulated map and keeps the incoming one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnChangesAttributeMerger;

impl AttributeMerger for ReturnChangesAttributeMerger {
    fn merge(&self, _to_modify: AttributeMap, to_consider: &AttributeMap) -> AttributeMap {
        to_consider.clone()
    }
}

/// Ignores the incoming map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnOriginalAttributeMerger;

impl AttributeMerger for ReturnOriginalAttributeMerger {
    fn merge(&self, to_modify: AttributeMap, _to_consider: &AttributeMap) -> AttributeMap {
        to_modify
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributeValue;

    fn original() -> AttributeMap {
        AttributeMap::new()
            .with("name", ["Eric"])
            .with("dept", ["it"])
    }

    fn changes() -> AttributeMap {
        AttributeMap::new()
            .with("dept", ["finance", "hr"])
            .with("email", ["edalquist@example.com"])
    }

    #[test]
    fn test_replacing_overwrites_collisions() {
        let merged = ReplacingAttributeMerger.merge(original(), &changes());

        assert_eq!(merged.get("name").unwrap(), &vec![AttributeValue::from("Eric")]);
        assert_eq!(merged.get("dept").unwrap().len(), 2);
        assert!(merged.contains_key("email"));
    }

    #[test]
    fn test_noncolliding_keeps_first_writer() {
        let merged = NoncollidingAttributeMerger.merge(original(), &changes());

        assert_eq!(merged.get("dept").unwrap(), &vec![AttributeValue::from("it")]);
        assert!(merged.contains_key("email"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_return_changes() {
        let merged = ReturnChangesAttributeMerger.merge(original(), &changes());
        assert_eq!(merged, changes());
    }

    #[test]
    fn test_return_original() {
        let merged = ReturnOriginalAttributeMerger.merge(original(), &changes());
        assert_eq!(merged, original());
    }
}
