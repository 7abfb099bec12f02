//! Property types for graph entities
//!
//! Node and relationship property sets are open-ended, but every value is
//! drawn from a closed set of shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A property value as stored on nodes and relationships or bound as a
/// query parameter.
///
/// Serializes to and from plain JSON (`null`, `true`, `42`, `"x"`, `[..]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Null/missing value
    Null,

    /// Boolean value
    Boolean(bool),

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Sequence of scalars
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Returns true for every shape except `List`
    pub fn is_scalar(&self) -> bool {
        !self.is_list()
    }

    /// Returns true if the value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, PropertyValue::List(_))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::List(_) => "list",
        }
    }

    /// Convert a JSON value returned by the database.
    ///
    /// Objects have no property-value counterpart (the database only emits
    /// them for spatial values); they are kept as their compact JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PropertyValue::String(s.clone()),
            Value::Array(items) => {
                PropertyValue::List(items.iter().map(PropertyValue::from_json).collect())
            }
            Value::Object(_) => PropertyValue::String(value.to_string()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            // keeps the fractional part of whole numbers, e.g. `3.0`
            PropertyValue::Float(v) => write!(f, "{:?}", v),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// Convenience From implementations
impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Boolean(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Integer(v as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self {
        PropertyValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// An ordered property map, keyed by property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    inner: BTreeMap<String, PropertyValue>,
}

impl Properties {
    /// Create an empty property map
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Create with a single property
    pub fn with<K: Into<String>, V: Into<PropertyValue>>(key: K, value: V) -> Self {
        let mut props = Self::new();
        props.set(key, value);
        props
    }

    /// Set a property value
    pub fn set<K: Into<String>, V: Into<PropertyValue>>(&mut self, key: K, value: V) {
        self.inner.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.inner.get(key)
    }

    /// Check if a property exists
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Get the number of properties
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.inner.iter()
    }

    /// Build from a JSON object returned by the database
    pub fn from_json_map(map: &serde_json::Map<String, Value>) -> Self {
        map.iter()
            .map(|(k, v)| (k.clone(), PropertyValue::from_json(v)))
            .collect()
    }
}

impl IntoIterator for Properties {
    type Item = (String, PropertyValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
