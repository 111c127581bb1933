//! Additive merging

use std::cmp::Ordering;

use super::merger::AttributeMerger;
use crate::types::{AttributeMap, AttributeValue};

/// Unions attribute maps, concatenating value lists on collision
///
/// With `distinct_values` set, an incoming value is dropped when an equal value
/// is already in the list. Strings compare case-insensitively, other values of
/// the same kind compare by their natural ordering, and values of different
/// kinds (or `Null`) never compare equal, so they are always kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultivaluedAttributeMerger {
    pub distinct_values: bool,
}

impl MultivaluedAttributeMerger {
    /// Merger that keeps duplicates
    pub fn new() -> Self {
        Self {
            distinct_values: false,
        }
    }

    /// Merger that de-duplicates values on collision
    pub fn distinct() -> Self {
        Self {
            distinct_values: true,
        }
    }

    fn append(&self, existing: &mut Vec<AttributeValue>, incoming: &[AttributeValue]) {
        if !self.distinct_values {
            existing.extend_from_slice(incoming);
            return;
        }

        for value in incoming {
            if !existing.iter().any(|kept| values_equal(kept, value)) {
                existing.push(value.clone());
            }
        }
    }
}

impl AttributeMerger for MultivaluedAttributeMerger {
    fn merge(&self, mut to_modify: AttributeMap, to_consider: &AttributeMap) -> AttributeMap {
        for (name, values) in to_consider {
            match to_modify.get_mut(name) {
                Some(existing) => self.append(existing, values),
                None => {
                    to_modify.insert(name.clone(), values.clone());
                }
            }
        }
        to_modify
    }
}

/// Equality used for de-duplication
pub(crate) fn values_equal(a: &AttributeValue, b: &AttributeValue) -> bool {
    let ordering = match (a, b) {
        (AttributeValue::String(x), AttributeValue::String(y)) => {
            x.to_lowercase().cmp(&y.to_lowercase())
        }
        (AttributeValue::Integer(x), AttributeValue::Integer(y)) => x.cmp(y),
        (AttributeValue::Boolean(x), AttributeValue::Boolean(y)) => x.cmp(y),
        (AttributeValue::Bytes(x), AttributeValue::Bytes(y)) => x.cmp(y),
        _ => return false,
    };
    ordering == Ordering::Equal
}
