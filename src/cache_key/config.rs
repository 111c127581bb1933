//! Cache key settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration for [`super::CacheKeyGenerator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheKeyConfig {
    /// Attribute an id lookup is keyed by, and the fallback key attribute
    pub default_attribute: String,

    /// Explicit set of seed attributes that participate in the key
    pub key_attributes: Option<BTreeSet<String>>,

    /// Use every seed attribute (overrides `key_attributes`)
    pub use_all_attributes: bool,

    /// Skip null, empty-string and empty-list values
    pub ignore_empty_attributes: bool,
}

impl Default for CacheKeyConfig {
    fn default() -> Self {
        Self {
            default_attribute: "username".to_string(),
            key_attributes: None,
            use_all_attributes: false,
            ignore_empty_attributes: false,
        }
    }
}
