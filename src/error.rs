//! Error types for attribute resolution

use std::fmt;
use thiserror::Error;

/// Result type alias for attribute resolution operations
pub type Result<T> = std::result::Result<T, AttrError>;

/// Errors raised by the resolution engine
///
/// Source failures keep the source's own error untouched so callers can
/// `downcast_ref` it back to the concrete type the source raised.
#[derive(Debug, Error)]
pub enum AttrError {
    /// Malformed input to a pure function (seed, query, merge input)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration rejected when a resolver, rule or generator is built
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A single attribute source failed during resolve or a metadata call
    #[error("attribute source '{source_name}' failed: {error:#}")]
    SourceFailure {
        source_name: String,
        #[source]
        error: anyhow::Error,
    },

    /// A rule was evaluated without being applicable to the seed
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Cache key requested for a method outside the cacheable set
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Tags a source error leaving a nested resolver with the source that raised it
#[derive(Debug, Clone)]
struct FailedSource(String);

impl fmt::Display for FailedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nested source '{}'", self.0)
    }
}

impl AttrError {
    /// Wraps an error raised by the named source
    ///
    /// An error that already passed through a nested resolver keeps the name
    /// of the innermost failing source.
    pub fn source_failure(source_name: impl Into<String>, error: anyhow::Error) -> Self {
        let source_name = match error.downcast_ref::<FailedSource>() {
            Some(FailedSource(leaf)) => leaf.clone(),
            None => source_name.into(),
        };
        AttrError::SourceFailure { source_name, error }
    }

    /// Converts into the error channel of [`crate::AttributeSource`]
    ///
    /// A source failure hands back the source's own error, so `downcast_ref`
    /// on it still finds the concrete type after any number of nested
    /// resolvers.
    pub fn into_source_error(self) -> anyhow::Error {
        match self {
            AttrError::SourceFailure { source_name, error } => {
                error.context(FailedSource(source_name))
            }
            other => anyhow::Error::new(other),
        }
    }

    /// Name of the failing source, if this is a source failure
    pub fn failed_source(&self) -> Option<&str> {
        match self {
            AttrError::SourceFailure { source_name, .. } => Some(source_name),
            _ => None,
        }
    }
}
