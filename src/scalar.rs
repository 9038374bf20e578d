//! Conversion between property text and primitive values.
//!
//! Everything in a properties file is text; this module is the single place
//! where that text meets typed values. The encoder uses [`ScalarSerializer`] to
//! render leaves and map keys, the decoder uses [`parse`] / [`parse_bool`] and
//! [`TextDeserializer`] for leaves, map keys and inline list items.
//!
//! Types with their own text form (anything whose serde impl goes through
//! `serialize_str` / `deserialize_str`, such as `chrono::DateTime`) pass through
//! here untouched and are treated as opaque scalars.

use crate::{Error, Result};
use serde::de;
use serde::ser::{self, Impossible};
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// Parses `text` found at `key` with `T`'s `FromStr`, attributing failures to the key.
pub(crate) fn parse<T>(key: &str, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    text.parse::<T>().map_err(|e| Error::parse(key, text, e))
}

/// Parses a boolean literal.
///
/// Accepted, ignoring ASCII case: `true`/`false`, `t`/`f`, `1`/`0`,
/// `yes`/`no`, `on`/`off`.
pub(crate) fn parse_bool(key: &str, text: &str) -> Result<bool> {
    const TRUTHY: [&str; 5] = ["true", "t", "1", "yes", "on"];
    const FALSY: [&str; 5] = ["false", "f", "0", "no", "off"];

    if TRUTHY.iter().any(|lit| text.eq_ignore_ascii_case(lit)) {
        Ok(true)
    } else if FALSY.iter().any(|lit| text.eq_ignore_ascii_case(lit)) {
        Ok(false)
    } else {
        Err(Error::parse(key, text, "invalid boolean literal"))
    }
}

pub(crate) fn parse_char(key: &str, text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::parse(key, text, "expected a single character")),
    }
}

/// Renders a single leaf value to its property text.
///
/// Composite values (sequences, maps, structs) are rejected with a
/// [`Error::Shape`] naming `key`; the caller decides whether that is fatal.
pub(crate) struct ScalarSerializer<'k> {
    key: &'k str,
}

impl<'k> ScalarSerializer<'k> {
    pub(crate) fn new(key: &'k str) -> Self {
        ScalarSerializer { key }
    }

    fn composite(&self, kind: &str) -> Error {
        Error::shape(self.key, format!("{} is not a scalar", kind))
    }
}

/// Renders `value` as leaf text, or fails with a shape error for composites.
pub(crate) fn to_text<T>(key: &str, value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    value.serialize(ScalarSerializer::new(key))
}

impl<'k> ser::Serializer for ScalarSerializer<'k> {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(if v { "true" } else { "false" }.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    // Rendered at native width so that 0.1f32 stays "0.1".
    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(self.composite("byte array"))
    }

    fn serialize_none(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.composite("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.composite("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.composite("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.composite("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.composite("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.composite("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.composite(&format!("struct `{}`", name)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.composite("struct variant"))
    }

    fn collect_str<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Display,
    {
        Ok(value.to_string())
    }
}

/// Deserializes one piece of text that sits at a known key.
///
/// Used for map keys (`ports.8080=http` into a `HashMap<u16, String>`) and for
/// the items of an inline list. Composite destinations are shape errors.
pub(crate) struct TextDeserializer<'de, 'k> {
    key: &'k str,
    text: &'de str,
}

impl<'de, 'k> TextDeserializer<'de, 'k> {
    pub(crate) fn new(key: &'k str, text: &'de str) -> Self {
        TextDeserializer { key, text }
    }

    fn composite(&self, kind: &str) -> Error {
        Error::shape(self.key, format!("{} cannot be read from a single value", kind))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(parse(self.key, self.text)?)
            }
        )*
    };
}

impl<'de, 'k> de::Deserializer<'de> for TextDeserializer<'de, 'k> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    deserialize_parsed! {
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
        visitor.visit_bool(parse_bool(self.key, self.text)?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_char(parse_char(self.key, self.text)?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor
            .visit_borrowed_str::<Error>(self.text)
            .map_err(|e| e.at(self.key, self.text))
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
        visitor
            .visit_borrowed_bytes::<Error>(self.text.as_bytes())
            .map_err(|e| e.at(self.key, self.text))
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
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.composite("a sequence"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.composite("a tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.composite(&format!("tuple struct `{}`", name)))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.composite("a map"))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.composite(&format!("struct `{}`", name)))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant = de::value::BorrowedStrDeserializer::<Error>::new(self.text);
        visitor
            .visit_enum(variant)
            .map_err(|e| e.at(self.key, self.text))
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
