//! Sequential multi-source resolution with merge and recovery policy

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::config::{AggregationConfig, QueryMode};
use crate::error::{AttrError, Result};
use crate::merge::{AttributeMerger, MergeStrategy, MultivaluedAttributeMerger};
use crate::source::AttributeSource;
use crate::types::{AttributeMap, Person, Query};

/// Resolves attributes by consulting every configured source in order
///
/// # Semantics
///
/// - The first non-absent source result seeds the accumulator; every later
///   one is merged into it with the configured [`AttributeMerger`].
/// - A source returning `None` contributes nothing.
/// - A failing source is logged and skipped when `recover_exceptions` is set,
///   otherwise resolution stops and the source's error is returned inside
///   [`AttrError::SourceFailure`].
/// - `Ok(None)` means no source had an opinion; `Ok(Some(empty))` means at
///   least one source answered with no attributes.
///
/// # Thread Safety
///
/// The resolver is immutable once built and can be shared across threads
/// behind an `Arc`.
#[derive(Clone)]
pub struct AggregatingResolver {
    name: String,
    sources: Vec<Arc<dyn AttributeSource>>,
    merger: Arc<dyn AttributeMerger>,
    config: AggregationConfig,
}

impl AggregatingResolver {
    /// Starts building a resolver
    pub fn builder() -> AggregatingResolverBuilder {
        AggregatingResolverBuilder::default()
    }

    /// Resolves and merges attributes for the query
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::SourceFailure`] for the first failing source when
    /// `recover_exceptions` is disabled. Later sources are not invoked.
    pub fn resolve(&self, query: &Query) -> Result<Option<AttributeMap>> {
        let mut accumulated: Option<AttributeMap> = None;

        for (index, source) in self.sources.iter().enumerate() {
            let source_query = match (self.config.query_mode, &accumulated) {
                (QueryMode::Accumulated, Some(so_far)) => Cow::Owned(query.overlay(so_far)),
                _ => Cow::Borrowed(query),
            };

            debug!(
                resolver = %self.name,
                source = source.name(),
                terms = source_query.len(),
                "querying attribute source"
            );

            let partial = match source.resolve(&source_query) {
                Ok(partial) => partial,
                Err(err) => {
                    self.handle_failure(source.as_ref(), "resolve", err)?;
                    None
                }
            };

            match partial {
                Some(partial) => {
                    accumulated = Some(match accumulated.take() {
                        None => partial,
                        Some(so_far) => self.merger.merge(so_far, &partial),
                    });

                    if self.config.stop_on_success {
                        debug!(source = source.name(), "stopping after first successful source");
                        break;
                    }
                }
                None if index == 0 && self.config.stop_if_first_absent => {
                    debug!(source = source.name(), "first source has no result, stopping");
                    return Ok(None);
                }
                None => {}
            }
        }

        debug!(
            resolver = %self.name,
            attributes = accumulated.as_ref().map(AttributeMap::len),
            "resolution complete"
        );
        Ok(accumulated)
    }

    /// Resolves the person identified by `uid`
    ///
    /// The seed is `{username_attribute: uid}`; the merged attributes are
    /// wrapped in a [`Person`] carrying `uid` as its id.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidArgument`] for an empty `uid`, otherwise
    /// fails like [`resolve`](Self::resolve).
    pub fn resolve_person(&self, uid: &str) -> Result<Option<Person>> {
        if uid.is_empty() {
            return Err(AttrError::InvalidArgument(
                "person identifier cannot be empty".to_string(),
            ));
        }

        let query = Query::new().with(self.config.username_attribute.clone(), uid);
        Ok(self
            .resolve(&query)?
            .map(|attributes| Person::new(uid, attributes)))
    }

    /// Union of the attribute names every source may return
    ///
    /// Sources that do not know their names contribute nothing; `None` is
    /// returned only when no source declares any names.
    pub fn possible_attribute_names(&self) -> Result<Option<HashSet<String>>> {
        self.collect_names("possible_attribute_names", |source| {
            source.possible_attribute_names()
        })
    }

    /// Union of the attribute names every source can be queried by
    pub fn available_query_attributes(&self) -> Result<Option<HashSet<String>>> {
        self.collect_names("available_query_attributes", |source| {
            source.available_query_attributes()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Names of the configured sources, in resolution order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    fn collect_names<F>(&self, operation: &str, fetch: F) -> Result<Option<HashSet<String>>>
    where
        F: Fn(&dyn AttributeSource) -> anyhow::Result<Option<HashSet<String>>>,
    {
        let mut names: Option<HashSet<String>> = None;

        for source in &self.sources {
            match fetch(source.as_ref()) {
                Ok(Some(declared)) => {
                    names = Some(match names.take() {
                        None => declared,
                        Some(so_far) => self.merger.merge_names(so_far, &declared),
                    });
                }
                Ok(None) => {}
                Err(err) => self.handle_failure(source.as_ref(), operation, err)?,
            }
        }

        Ok(names)
    }

    fn handle_failure(
        &self,
        source: &dyn AttributeSource,
        operation: &str,
        err: anyhow::Error,
    ) -> Result<()> {
        if self.config.recover_exceptions {
            warn!(
                resolver = %self.name,
                source = source.name(),
                operation,
                error = %err,
                "attribute source failed, continuing without it"
            );
            return Ok(());
        }

        error!(
            resolver = %self.name,
            source = source.name(),
            operation,
            error = %err,
            "attribute source failed, aborting"
        );
        Err(AttrError::source_failure(source.name(), err))
    }
}

impl AttributeSource for AggregatingResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &Query) -> anyhow::Result<Option<AttributeMap>> {
        AggregatingResolver::resolve(self, query).map_err(AttrError::into_source_error)
    }

    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
        AggregatingResolver::possible_attribute_names(self).map_err(AttrError::into_source_error)
    }

    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
        AggregatingResolver::available_query_attributes(self)
            .map_err(AttrError::into_source_error)
    }
}

impl std::fmt::Debug for AggregatingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatingResolver")
            .field("name", &self.name)
            .field("sources", &self.source_names())
            .field("merger", &self.merger)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`AggregatingResolver`]
///
/// Defaults: additive (multivalued) merge, [`AggregationConfig::default`].
#[derive(Default)]
pub struct AggregatingResolverBuilder {
    name: Option<String>,
    sources: Vec<Arc<dyn AttributeSource>>,
    merger: Option<Arc<dyn AttributeMerger>>,
    config: AggregationConfig,
}

impl AggregatingResolverBuilder {
    /// Name used in logs and when this resolver is nested in another
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a source; sources are consulted in the order they are added
    pub fn source<S: AttributeSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Appends an already shared source
    pub fn shared_source(mut self, source: Arc<dyn AttributeSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn merger(mut self, merger: Arc<dyn AttributeMerger>) -> Self {
        self.merger = Some(merger);
        self
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merger = Some(strategy.into_merger());
        self
    }

    /// Replaces the whole configuration
    pub fn config(mut self, config: AggregationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn recover_exceptions(mut self, recover: bool) -> Self {
        self.config.recover_exceptions = recover;
        self
    }

    pub fn query_mode(mut self, mode: QueryMode) -> Self {
        self.config.query_mode = mode;
        self
    }

    pub fn stop_on_success(mut self, stop: bool) -> Self {
        self.config.stop_on_success = stop;
        self
    }

    pub fn stop_if_first_absent(mut self, stop: bool) -> Self {
        self.config.stop_if_first_absent = stop;
        self
    }

    pub fn username_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config.username_attribute = attribute.into();
        self
    }

    /// Validates and freezes the configuration
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidConfiguration`] if no source was added or
    /// the username attribute is empty.
    pub fn build(self) -> Result<AggregatingResolver> {
        if self.sources.is_empty() {
            return Err(AttrError::InvalidConfiguration(
                "aggregating resolver requires at least one source".to_string(),
            ));
        }
        if self.config.username_attribute.is_empty() {
            return Err(AttrError::InvalidConfiguration(
                "username attribute cannot be empty".to_string(),
            ));
        }

        Ok(AggregatingResolver {
            name: self
                .name
                .unwrap_or_else(|| "aggregating-resolver".to_string()),
            sources: self.sources,
            merger: self
                .merger
                .unwrap_or_else(|| Arc::new(MultivaluedAttributeMerger::new())),
            config: self.config,
        })
    }
}
