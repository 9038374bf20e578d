//! Dynamic value representation for properties data.
//!
//! This module provides the [`Value`] enum, a nested view of a properties
//! file for when the structure isn't known at compile time.
//!
//! Everything in a properties file is text, so a [`Value`] has only four
//! shapes: absent, a text leaf, a map of named children, or a sequence of
//! indexed children.
//!
//! ## Usage Patterns
//!
//! ### Decoding Unknown Input
//!
//! ```rust
//! use serde_properties::{from_str, Value};
//!
//! let value: Value = from_str("server.host=localhost\nserver.ports[0]=80").unwrap();
//!
//! assert_eq!(value.pointer("server.host").and_then(Value::as_str), Some("localhost"));
//! assert_eq!(value.pointer("server.ports[0]").and_then(Value::as_str), Some("80"));
//! assert!(value.pointer("server.missing").is_none());
//! ```
//!
//! ### Converting from Rust Types
//!
//! ```rust
//! use serde_properties::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value = to_value(&Point { x: 10, y: 20 }).unwrap();
//! assert_eq!(value.as_map().map(|m| m.len()), Some(2));
//! assert_eq!(value.pointer("y").and_then(|v| v.parse::<i32>()), Some(20));
//! ```

use crate::{KeyPath, Properties, Segment};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A dynamically-typed properties value.
///
/// # Examples
///
/// ```rust
/// use serde_properties::Value;
///
/// let text = Value::from("hello");
/// assert!(text.is_string());
/// assert!(Value::Null.is_null());
/// assert!(Value::Seq(vec![]).is_seq());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Value {
    /// No entry at or below this key.
    #[default]
    Null,
    /// A leaf: the text after the separator.
    String(String),
    /// Named children (`key.child=...`), in first-seen order.
    Map(IndexMap<String, Value>),
    /// Indexed children (`key[n]=...`); gaps are `Null`.
    Seq(Vec<Value>),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    /// Parses a string leaf with `T`'s `FromStr`.
    ///
    /// Returns `None` for non-string values and for text that does not parse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Value;
    ///
    /// assert_eq!(Value::from("8080").parse::<u16>(), Some(8080));
    /// assert_eq!(Value::from("eighty").parse::<u16>(), None);
    /// ```
    #[must_use]
    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.as_str().and_then(|s| s.parse().ok())
    }

    /// Returns the named child of a map.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(name))
    }

    /// Looks up a nested value by key path, e.g. `"servers[1].host"`.
    ///
    /// The empty path returns the value itself. Malformed paths return `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::{properties, from_properties, Value};
    ///
    /// let props = properties! {
    ///     "servers[0].host" => "alpha",
    ///     "servers[1].host" => "beta",
    /// };
    /// let value: Value = from_properties(&props).unwrap();
    ///
    /// assert_eq!(value.pointer("servers[1].host"), Some(&Value::from("beta")));
    /// assert_eq!(value.pointer(""), Some(&value));
    /// assert_eq!(value.pointer("servers[x]"), None);
    /// ```
    #[must_use]
    pub fn pointer(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return Some(self);
        }
        KeyPath::parse(key)?
            .iter()
            .try_fold(self, |node, segment| match (node, segment) {
                (Value::Map(map), Segment::Name(name)) => map.get(name.as_str()),
                (Value::Seq(seq), Segment::Index(index)) => seq.get(*index),
                _ => None,
            })
    }

    /// Encodes the value back to flat properties.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Shape`](crate::Error::Shape) when a map key cannot
    /// be written as a key segment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::{from_str, Value};
    /// use indexmap::IndexMap;
    ///
    /// let value: Value = from_str("x.y=1\nx.z=2").unwrap();
    /// assert_eq!(value.to_properties().unwrap().to_string(), "x.y=1\nx.z=2\n");
    ///
    /// let mut map = IndexMap::new();
    /// map.insert("a.b".to_string(), Value::from("x"));
    /// assert!(Value::Map(map).to_properties().unwrap_err().is_shape());
    /// ```
    pub fn to_properties(&self) -> crate::Result<Properties> {
        crate::to_properties(self)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
            Value::Seq(seq) => {
                use serde::ser::SerializeSeq;
                let mut state = serializer.serialize_seq(Some(seq.len()))?;
                for element in seq {
                    state.serialize_element(element)?;
                }
                state.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a properties value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Seq(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Seq(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
