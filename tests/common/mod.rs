//! Directory-like sources shared by the integration tests

#![allow(dead_code)]

use persondir::{AttributeMap, AttributeSource, Query};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory source keyed by the value of one query attribute
pub struct DirectorySource {
    name: &'static str,
    key_attribute: &'static str,
    rows: HashMap<String, AttributeMap>,
    calls: AtomicUsize,
}

impl DirectorySource {
    pub fn new(name: &'static str, key_attribute: &'static str) -> Self {
        Self {
            name,
            key_attribute,
            rows: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn row(mut self, key: &str, attributes: AttributeMap) -> Self {
        self.rows.insert(key.to_string(), attributes);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AttributeSource for DirectorySource {
    fn name(&self) -> &str {
        self.name
    }

    fn resolve(&self, query: &Query) -> anyhow::Result<Option<AttributeMap>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(key) = query.get(self.key_attribute) else {
            return Ok(None);
        };
        let found = key
            .values()
            .iter()
            .find_map(|value| self.rows.get(&value.to_string()));
        Ok(found.cloned())
    }

    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
        Ok(Some(
            self.rows
                .values()
                .flat_map(|row| row.keys().cloned())
                .collect(),
        ))
    }

    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
        Ok(Some(HashSet::from([self.key_attribute.to_string()])))
    }
}

/// Source whose backend is unreachable
pub struct OfflineSource;

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
pub struct ConnectionRefused;

impl AttributeSource for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    fn resolve(&self, _query: &Query) -> anyhow::Result<Option<AttributeMap>> {
        Err(ConnectionRefused.into())
    }

    fn possible_attribute_names(&self) -> anyhow::Result<Option<HashSet<String>>> {
        Err(ConnectionRefused.into())
    }

    fn available_query_attributes(&self) -> anyhow::Result<Option<HashSet<String>>> {
        Err(ConnectionRefused.into())
    }
}

pub fn jdbc_source() -> DirectorySource {
    DirectorySource::new("jdbc", "username")
        .row("edalquist", AttributeMap::new().with("name", ["Eric"]))
        .row("jdoe", AttributeMap::new().with("name", ["Jane"]))
}

pub fn ldap_source() -> DirectorySource {
    DirectorySource::new("ldap", "username").row(
        "edalquist",
        AttributeMap::new().with("email", ["edalquist@example.com"]),
    )
}
