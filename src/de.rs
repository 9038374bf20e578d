//! Properties deserialization.
//!
//! This module provides the [`Deserializer`] that folds a flat [`Properties`]
//! mapping into Rust data structures.
//!
//! ## Overview
//!
//! Decoding is driven by the destination type. Every node of the destination
//! is addressed by a [`KeyPath`]; the node looks at the flat keys at or below
//! its path and nothing else:
//!
//! - **Structs** visit their declared fields, each at `path.field`
//! - **Maps** collect the distinct first segments below `path`
//! - **Sequences** size themselves by the largest `path[n]` present
//! - **Scalars** convert the value stored at exactly `path`
//!
//! Nodes with no matching line are filled with their kind's zero value, so a
//! sparse file decodes into a fully populated value.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_properties::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, tags: Vec<String> }
//!
//! let data: Data = from_str("x=1\ntags[1]=b").unwrap();
//! assert_eq!(data, Data { x: 1, tags: vec!["".into(), "b".into()] });
//! ```
//!
//! ## Direct Deserializer Usage
//!
//! ```rust
//! use serde_properties::{Deserializer, Options, Properties};
//! use serde::Deserialize;
//! use std::collections::BTreeMap;
//!
//! let props = Properties::parse("a=1\nb=2\nc=3");
//! let mut de = Deserializer::with_options(&props, Options::strict());
//! let map = BTreeMap::<String, u8>::deserialize(&mut de).unwrap();
//! de.end().unwrap();
//! assert_eq!(map.len(), 3);
//! ```

use crate::options::MissingFields;
use crate::path::{descend, first_segment, Descent};
use crate::scalar::{self, TextDeserializer};
use crate::{Error, KeyPath, Options, Properties, Result};
use indexmap::IndexSet;
use serde::de::{self, Deserializer as _};
use std::cell::RefCell;

/// The properties deserializer.
///
/// Borrows a parsed [`Properties`] mapping and records which of its entries
/// were consumed, so that [`Deserializer::end`] can report leftovers in strict
/// mode.
pub struct Deserializer<'de> {
    props: &'de Properties,
    options: Options,
    consumed: RefCell<Vec<bool>>,
}

impl<'de> Deserializer<'de> {
    pub fn new(props: &'de Properties) -> Self {
        Self::with_options(props, Options::default())
    }

    pub fn with_options(props: &'de Properties, options: Options) -> Self {
        Deserializer {
            props,
            options,
            consumed: RefCell::new(vec![false; props.len()]),
        }
    }

    /// Finishes decoding.
    ///
    /// In strict mode, fails with [`Error::UnmatchedKey`] naming the first entry
    /// no destination field consumed. Otherwise leftovers are only logged.
    pub fn end(&self) -> Result<()> {
        let consumed = self.consumed.borrow();
        let mut unmatched = consumed
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(index, _)| self.props.describe(index));

        if !self.options.strict {
            for (line, text) in unmatched {
                tracing::trace!(line, text = %text, "ignoring unmatched property");
            }
            return Ok(());
        }

        match unmatched.next() {
            Some((line, text)) => {
                tracing::debug!(line, text = %text, "strict decode found an unmatched property");
                Err(Error::unmatched(line, &text))
            }
            None => Ok(()),
        }
    }

    fn root(&self) -> Node<'_, 'de> {
        Node {
            de: self,
            path: KeyPath::root(),
        }
    }

    /// The value stored at exactly `path`, marking it consumed.
    fn lookup(&self, path: &KeyPath) -> Option<&'de str> {
        let props: &'de Properties = self.props;
        let (index, value) = props.get_full(path.as_str())?;
        if let Some(used) = self.consumed.borrow_mut().get_mut(index) {
            *used = true;
        }
        Some(value)
    }

    /// Whether any entry sits at or below `path`.
    fn is_present(&self, path: &KeyPath) -> bool {
        self.props.contains_key(path.as_str())
            || self
                .props
                .keys()
                .any(|key| descend(key, path.as_str()).is_some())
    }

    /// `max index + 1` over the `path[n]` keys, or `None` when there are none.
    ///
    /// Fails when that length exceeds [`Options::max_sequence_len`].
    fn sequence_len(&self, path: &KeyPath) -> Result<Option<usize>> {
        let max = self
            .props
            .keys()
            .filter_map(|key| match descend(key, path.as_str()) {
                Some(Descent::Indexed(index, _)) => Some(index),
                _ => None,
            })
            .max();

        let Some(max) = max else {
            return Ok(None);
        };
        match max.checked_add(1) {
            Some(len) if len <= self.options.max_sequence_len => Ok(Some(len)),
            _ => Err(Error::shape(
                path.index(max).as_str(),
                "sequence index out of range",
            )),
        }
    }

    /// The distinct named segments directly below `path`, in first-seen order.
    fn named_children(&self, path: &KeyPath) -> IndexSet<&'de str> {
        let props: &'de Properties = self.props;
        let mut names = IndexSet::new();
        for key in props.keys() {
            if let Some(Descent::Named(rest)) = descend(key, path.as_str()) {
                let Some(name) = first_segment(rest) else {
                    tracing::trace!(key, "skipping key with a malformed index");
                    continue;
                };
                // An empty segment at the root would address the root itself.
                if name.is_empty() && path.is_root() {
                    continue;
                }
                names.insert(name);
            }
        }
        names
    }
}

macro_rules! forward_to_root {
    ($($method:ident($($arg:ident: $ty:ty),*);)*) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                self.root().$method($($arg,)* visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    forward_to_root! {
        deserialize_any();
        deserialize_bool();
        deserialize_i8();
        deserialize_i16();
        deserialize_i32();
        deserialize_i64();
        deserialize_i128();
        deserialize_u8();
        deserialize_u16();
        deserialize_u32();
        deserialize_u64();
        deserialize_u128();
        deserialize_f32();
        deserialize_f64();
        deserialize_char();
        deserialize_str();
        deserialize_string();
        deserialize_bytes();
        deserialize_byte_buf();
        deserialize_option();
        deserialize_unit();
        deserialize_unit_struct(name: &'static str);
        deserialize_newtype_struct(name: &'static str);
        deserialize_seq();
        deserialize_tuple(len: usize);
        deserialize_tuple_struct(name: &'static str, len: usize);
        deserialize_map();
        deserialize_struct(name: &'static str, fields: &'static [&'static str]);
        deserialize_enum(name: &'static str, variants: &'static [&'static str]);
        deserialize_identifier();
        deserialize_ignored_any();
    }
}

/// One node of the destination value, addressed by its key path.
struct Node<'a, 'de> {
    de: &'a Deserializer<'de>,
    path: KeyPath,
}

impl<'a, 'de> Node<'a, 'de> {
    fn child(&self, path: KeyPath) -> Self {
        Node { de: self.de, path }
    }

    fn key(&self) -> &str {
        self.path.as_str()
    }

    fn value(&self) -> Option<&'de str> {
        self.de.lookup(&self.path)
    }

    fn text<V>(&self, text: &'de str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor
            .visit_borrowed_str::<Error>(text)
            .map_err(|e| e.at(self.key(), text))
    }

    /// Visits the node as a sequence. `fixed` is the declared length of tuples.
    fn sequence<V>(self, fixed: Option<usize>, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let indexed = self.de.sequence_len(&self.path)?;

        if indexed.is_none() {
            if let Some(delimiter) = self.de.options.inline_delimiter() {
                if let Some(text) = self.value() {
                    let items = if text.is_empty() {
                        Vec::new()
                    } else {
                        text.split(delimiter).map(str::trim).collect()
                    };
                    return visitor.visit_seq(InlineSeq {
                        path: &self.path,
                        items: items.into_iter(),
                        index: 0,
                    });
                }
            }
        }

        let len = match (fixed, indexed) {
            (Some(fixed), Some(found)) => fixed.max(found),
            (Some(fixed), None) => fixed,
            (None, found) => found.unwrap_or(0),
        };
        visitor.visit_seq(IndexedSeq {
            de: self.de,
            parent: &self.path,
            index: 0,
            len,
        })
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.value() {
                    Some(text) => visitor.$visit(scalar::parse(self.key(), text)?),
                    None => visitor.$visit(Default::default()),
                }
            }
        )*
    };
}

impl<'a, 'de> de::Deserializer<'de> for Node<'a, 'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.de.sequence_len(&self.path)?.is_some() {
            return self.deserialize_seq(visitor);
        }
        if !self.de.named_children(&self.path).is_empty() {
            return self.deserialize_map(visitor);
        }
        match self.value() {
            Some(text) => self.text(text, visitor),
            None => visitor.visit_unit(),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(text) => visitor.visit_bool(scalar::parse_bool(self.key(), text)?),
            None => visitor.visit_bool(false),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(text) => visitor.visit_char(scalar::parse_char(self.key(), text)?),
            None => visitor.visit_char('\0'),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.value().unwrap_or("");
        self.text(text, visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = self.value().unwrap_or("");
        visitor
            .visit_borrowed_bytes::<Error>(text.as_bytes())
            .map_err(|e| e.at(self.key(), text))
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.de.is_present(&self.path) {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.value();
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.sequence(None, visitor)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.sequence(Some(len), visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.sequence(Some(len), visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let names = self.de.named_children(&self.path);
        visitor.visit_map(MapEntries {
            de: self.de,
            parent: &self.path,
            names: names.into_iter(),
            current: None,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let fields: Vec<&'static str> = match self.de.options.missing_fields {
            MissingFields::Zero => fields.to_vec(),
            MissingFields::Skip => fields
                .iter()
                .copied()
                .filter(|field| self.de.is_present(&self.path.field(field)))
                .collect(),
        };
        visitor.visit_map(StructFields {
            de: self.de,
            parent: &self.path,
            fields: fields.into_iter(),
            current: None,
        })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // A plain value names a unit variant.
        if let Some(text) = self.value() {
            let variant = de::value::BorrowedStrDeserializer::<Error>::new(text);
            return visitor
                .visit_enum(variant)
                .map_err(|e| e.at(self.key(), text));
        }

        let named = self.de.named_children(&self.path).first().copied();
        let variant = match named.or_else(|| variants.first().copied()) {
            Some(variant) => variant,
            None => return Err(Error::shape(self.key(), "enum has no variants")),
        };
        visitor.visit_enum(Variant {
            node: self,
            variant,
        })
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct IndexedSeq<'a, 'de> {
    de: &'a Deserializer<'de>,
    parent: &'a KeyPath,
    index: usize,
    len: usize,
}

impl<'a, 'de> de::SeqAccess<'de> for IndexedSeq<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.index >= self.len {
            return Ok(None);
        }
        let node = Node {
            de: self.de,
            path: self.parent.index(self.index),
        };
        self.index += 1;
        seed.deserialize(node).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

/// Items of a single `key=a,b,c` line.
struct InlineSeq<'a, 'de> {
    path: &'a KeyPath,
    items: std::vec::IntoIter<&'de str>,
    index: usize,
}

impl<'a, 'de> de::SeqAccess<'de> for InlineSeq<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        let Some(item) = self.items.next() else {
            return Ok(None);
        };
        let key = self.path.index(self.index);
        self.index += 1;
        seed.deserialize(TextDeserializer::new(key.as_str(), item))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct MapEntries<'a, 'de> {
    de: &'a Deserializer<'de>,
    parent: &'a KeyPath,
    names: indexmap::set::IntoIter<&'de str>,
    current: Option<KeyPath>,
}

impl<'a, 'de> de::MapAccess<'de> for MapEntries<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(name) = self.names.next() else {
            return Ok(None);
        };
        let path = self.parent.field(name);
        let key = seed.deserialize(TextDeserializer::new(path.as_str(), name))?;
        self.current = Some(path);
        Ok(Some(key))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let path = self
            .current
            .take()
            .ok_or_else(|| Error::custom("map value requested before its key"))?;
        seed.deserialize(Node { de: self.de, path })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.names.len())
    }
}

struct StructFields<'a, 'de> {
    de: &'a Deserializer<'de>,
    parent: &'a KeyPath,
    fields: std::vec::IntoIter<&'static str>,
    current: Option<KeyPath>,
}

impl<'a, 'de> de::MapAccess<'de> for StructFields<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(field) = self.fields.next() else {
            return Ok(None);
        };
        self.current = Some(self.parent.field(field));
        seed.deserialize(de::value::BorrowedStrDeserializer::<Error>::new(field))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let path = self
            .current
            .take()
            .ok_or_else(|| Error::custom("field value requested before its name"))?;
        seed.deserialize(Node { de: self.de, path })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// An enum whose variant is spelled as a child segment: `mode.Tcp.port=80`.
struct Variant<'a, 'de> {
    node: Node<'a, 'de>,
    variant: &'de str,
}

impl<'a, 'de> Variant<'a, 'de> {
    fn content(&self) -> Node<'a, 'de> {
        self.node.child(self.node.path.field(self.variant))
    }
}

impl<'a, 'de> de::EnumAccess<'de> for Variant<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name = de::value::BorrowedStrDeserializer::<Error>::new(self.variant);
        let value = seed
            .deserialize(name)
            .map_err(|e| e.at(self.node.key(), self.variant))?;
        Ok((value, self))
    }
}

impl<'a, 'de> de::VariantAccess<'de> for Variant<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        self.content().value();
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.content())
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.content().deserialize_tuple(len, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.content().deserialize_struct("", fields, visitor)
    }
}
