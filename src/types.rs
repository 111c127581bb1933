//! Core data model: attribute values, attribute maps, queries and people

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single attribute value
///
/// There is deliberately no collection variant: multi-valued attributes are
/// always expressed as the value list of an [`AttributeMap`] entry.
/// `Null` marks an attribute that is present but has no value.
///
/// Serialized as the bare JSON value, except bytes which are written as
/// `{"bytes": "<hex>"}` so they never read back as a list of integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
}

mod hex_bytes {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Tagged<'a> {
        bytes: &'a str,
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Owned {
        bytes: String,
    }

    pub(super) fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        Tagged {
            bytes: &hex::encode(value),
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let Owned { bytes } = Owned::deserialize(deserializer)?;
        hex::decode(&bytes).map_err(D::Error::custom)
    }
}

impl AttributeValue {
    /// Returns the string payload, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Bytes(b) => write!(f, "{}", hex::encode(b)),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Bytes(value)
    }
}

/// Ordered mapping from attribute name to its value list
///
/// Insertion order is kept so output is deterministic, but equality ignores
/// key order. Each value list keeps its own order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(IndexMap<String, Vec<AttributeValue>>);

impl AttributeMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert, handy for literals
    ///
    /// ```rust
    /// use persondir::AttributeMap;
    ///
    /// let attrs = AttributeMap::new()
    ///     .with("name", ["Eric"])
    ///     .with("email", ["edalquist@example.com"]);
    /// assert_eq!(attrs.len(), 2);
    /// ```
    pub fn with<K, I, V>(mut self, name: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.insert(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Inserts a value list, returning the previous list for that name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<AttributeValue>,
    ) -> Option<Vec<AttributeValue>> {
        self.0.insert(name.into(), values)
    }

    pub fn get(&self, name: &str) -> Option<&Vec<AttributeValue>> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<AttributeValue>> {
        self.0.get_mut(name)
    }

    /// First value of the named attribute
    pub fn first_value(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name).and_then(|values| values.first())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Removes an attribute, keeping the order of the remaining entries
    pub fn remove(&mut self, name: &str) -> Option<Vec<AttributeValue>> {
        self.0.shift_remove(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<AttributeValue>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, Vec<AttributeValue>>> for AttributeMap {
    fn from(map: IndexMap<String, Vec<AttributeValue>>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Vec<AttributeValue>)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (String, Vec<AttributeValue>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, Vec<AttributeValue>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<AttributeValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a Vec<AttributeValue>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<AttributeValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A query term: one value or a list of candidate values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(AttributeValue),
    Multi(Vec<AttributeValue>),
}

impl QueryValue {
    /// The candidate values as a slice, a single value counting as one
    pub fn values(&self) -> &[AttributeValue] {
        match self {
            QueryValue::Single(value) => std::slice::from_ref(value),
            QueryValue::Multi(values) => values,
        }
    }

    /// Null, an empty string or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(AttributeValue::Null) => true,
            QueryValue::Single(AttributeValue::String(s)) => s.is_empty(),
            QueryValue::Single(_) => false,
            QueryValue::Multi(values) => values.is_empty(),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Single(value) => write!(f, "{}", value),
            QueryValue::Multi(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<AttributeValue> for QueryValue {
    fn from(value: AttributeValue) -> Self {
        QueryValue::Single(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.into())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value.into())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Single(value.into())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Single(value.into())
    }
}

impl From<Vec<AttributeValue>> for QueryValue {
    fn from(values: Vec<AttributeValue>) -> Self {
        QueryValue::Multi(values)
    }
}

/// Attribute query used to select people
///
/// An empty query is legal; sources decide what it means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(IndexMap<String, QueryValue>);

impl Query {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert of a single-valued term
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Builder-style insert of a multi-valued term
    pub fn with_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.0.insert(
            name.into(),
            QueryValue::Multi(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: QueryValue) -> Option<QueryValue> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.0.get(name)
    }

    pub fn get_key_value(&self, name: &str) -> Option<(&String, &QueryValue)> {
        self.0.get_key_value(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of this query with every attribute of `accumulated` laid over it
    ///
    /// An accumulated attribute replaces a query term of the same name.
    pub fn overlay(&self, accumulated: &AttributeMap) -> Query {
        let mut merged = self.clone();
        for (name, values) in accumulated {
            merged
                .0
                .insert(name.clone(), QueryValue::Multi(values.clone()));
        }
        merged
    }

    /// Multi-valued view of the query, single terms becoming singleton lists
    pub fn to_attribute_map(&self) -> AttributeMap {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.values().to_vec()))
            .collect()
    }
}

impl From<&AttributeMap> for Query {
    fn from(attributes: &AttributeMap) -> Self {
        Self(
            attributes
                .iter()
                .map(|(name, values)| (name.clone(), QueryValue::Multi(values.clone())))
                .collect(),
        )
    }
}

impl FromIterator<(String, QueryValue)> for Query {
    fn from_iter<T: IntoIterator<Item = (String, QueryValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = indexmap::map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A resolved person: an identifier plus an attribute snapshot
///
/// Identity is the id alone. Two snapshots of the same person compare equal
/// even when their attributes differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    id: String,
    attributes: AttributeMap,
}

impl Person {
    pub fn new(id: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn into_attributes(self) -> AttributeMap {
        self.attributes
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
