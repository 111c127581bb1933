//! Aggregation settings

use serde::{Deserialize, Serialize};

/// What each source receives as its query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Every source sees the caller's original query
    #[default]
    Original,

    /// Once a source has produced a result, later sources see the original
    /// query with the accumulated attributes laid over it
    Accumulated,
}

/// Configuration for the aggregating resolver
///
/// Supplied once at build time and frozen inside the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Log and skip failing sources instead of aborting the resolution
    pub recover_exceptions: bool,

    /// Per-source query construction
    pub query_mode: QueryMode,

    /// Stop after the first source that returns a result
    pub stop_on_success: bool,

    /// Give up when the first source has no opinion
    pub stop_if_first_absent: bool,

    /// Seed attribute that carries the person identifier
    pub username_attribute: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            recover_exceptions: true,
            query_mode: QueryMode::Original,
            stop_on_success: false,
            stop_if_first_absent: false,
            username_attribute: "username".to_string(),
        }
    }
}
