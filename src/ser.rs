//! Properties serialization.
//!
//! This module provides the [`Serializer`] that unfolds Rust data structures
//! into a flat [`Properties`] mapping, one entry per leaf.
//!
//! ## Overview
//!
//! The serializer walks the value depth-first, keeping the key path of the
//! node it is visiting:
//!
//! - **Structs** descend into each field as `path.field`
//! - **Maps** render each key as text and descend as `path.key`
//! - **Sequences** descend into each element as `path[i]`
//! - **Scalars** emit one `path=value` entry
//! - **`None`** emits nothing, so the field is simply absent
//!
//! Entries appear in traversal order: declared field order for structs, the
//! map's own iteration order for maps.
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_properties::{Options, Serializer};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Server { host: String, ports: Vec<u16> }
//!
//! let server = Server { host: "localhost".into(), ports: vec![80, 443] };
//!
//! let mut serializer = Serializer::new(Options::new());
//! server.serialize(&mut serializer).unwrap();
//!
//! let props = serializer.into_inner();
//! assert_eq!(props.to_string(), "host=localhost\nports[0]=80\nports[1]=443\n");
//! ```

use crate::scalar::{self, ScalarSerializer};
use crate::{Error, KeyPath, Options, Properties, Result};
use serde::{ser, Serialize};

/// The properties serializer.
///
/// Collects entries into a [`Properties`] mapping; retrieve it with
/// [`Serializer::into_inner`].
pub struct Serializer {
    output: Properties,
    options: Options,
    path: KeyPath,
}

impl Serializer {
    pub fn new(options: Options) -> Self {
        Serializer {
            output: Properties::new(),
            options,
            path: KeyPath::root(),
        }
    }

    pub fn into_inner(self) -> Properties {
        self.output
    }

    fn emit(&mut self, value: String) {
        if self.output.insert(self.path.as_str(), value).is_some() {
            tracing::trace!(key = self.path.as_str(), "overwriting earlier property");
        }
    }

    /// Why `key` cannot name a map entry below the current path, if it cannot.
    ///
    /// Rejected keys would be split, trimmed or skipped when the output is
    /// parsed again.
    fn map_key_problem(&self, key: &str) -> Option<&'static str> {
        if key.contains(['.', '[']) {
            Some("contains `.` or `[`")
        } else if key.contains(['=', ':']) || key.contains(self.options.separators.as_slice()) {
            Some("contains a key/value separator")
        } else if key.contains(['\n', '\r']) {
            Some("contains a line break")
        } else if key.trim() != key {
            Some("has surrounding whitespace")
        } else if self.path.is_root() && key.is_empty() {
            Some("is empty at the top level")
        } else if self.path.is_root() && self.options.is_comment(key) {
            Some("starts with a comment marker")
        } else {
            None
        }
    }

    fn leaf(&self) -> ScalarSerializer<'_> {
        ScalarSerializer::new(self.path.as_str())
    }
}

macro_rules! serialize_leaf {
    ($($method:ident($ty:ty);)*) => {
        $(
            fn $method(self, v: $ty) -> Result<()> {
                let text = self.leaf().$method(v)?;
                self.emit(text);
                Ok(())
            }
        )*
    };
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = SeqSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructSerializer<'a>;

    serialize_leaf! {
        serialize_bool(bool);
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_i128(i128);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_u128(u128);
        serialize_f32(f32);
        serialize_f64(f64);
        serialize_char(char);
        serialize_str(&str);
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Error::shape(self.path.as_str(), "byte arrays have no text form"))
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.emit(String::new());
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        ser::Serializer::serialize_unit(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.emit(variant.to_string());
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.path.push_field(variant);
        value.serialize(&mut *self)?;
        self.path.pop();
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer::new(self, false))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.path.push_field(variant);
        Ok(SeqSerializer::new(self, true))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            ser: self,
            variant: false,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.path.push_field(variant);
        Ok(StructSerializer {
            ser: self,
            variant: true,
        })
    }
}

/// Serializes sequences, tuples and tuple variants.
///
/// With an inline list format, scalar elements are buffered and written as one
/// delimited entry when the sequence ends. The first composite element spills
/// the buffer back into indexed entries.
pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
    index: usize,
    inline: Option<Vec<String>>,
    variant: bool,
}

impl<'a> SeqSerializer<'a> {
    fn new(ser: &'a mut Serializer, variant: bool) -> Self {
        let inline = ser.options.inline_delimiter().map(|_| Vec::new());
        SeqSerializer {
            ser,
            index: 0,
            inline,
            variant,
        }
    }

    fn spill(&mut self, items: Vec<String>) {
        for (index, text) in items.into_iter().enumerate() {
            self.ser.path.push_index(index);
            self.ser.emit(text);
            self.ser.path.pop();
        }
    }

    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(mut items) = self.inline.take() {
            match scalar::to_text(self.ser.path.as_str(), value) {
                Ok(text) if self.fits_inline(&text) => {
                    items.push(text);
                    self.inline = Some(items);
                    self.index += 1;
                    return Ok(());
                }
                _ => self.spill(items),
            }
        }

        self.ser.path.push_index(self.index);
        value.serialize(&mut *self.ser)?;
        self.ser.path.pop();
        self.index += 1;
        Ok(())
    }

    /// Whether `text` reads back unchanged as one item of a delimited line.
    fn fits_inline(&self, text: &str) -> bool {
        let Some(delimiter) = self.ser.options.inline_delimiter() else {
            return false;
        };
        !text.is_empty()
            && text.trim() == text
            && !text.contains(delimiter)
            && !text.contains(['\n', '\r'])
    }

    fn finish(self) -> Result<()> {
        if let Some(items) = self.inline {
            if let Some(delimiter) = self.ser.options.inline_delimiter() {
                if !items.is_empty() {
                    self.ser.emit(items.join(delimiter.to_string().as_str()));
                }
            }
        }
        if self.variant {
            self.ser.path.pop();
        }
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeTupleVariant for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Serializes maps. Keys must render as scalar text without `.` or `[`.
pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    key: Option<String>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let text = key.serialize(ScalarSerializer::new(self.ser.path.as_str()))?;
        if let Some(problem) = self.ser.map_key_problem(&text) {
            return Err(Error::shape(
                self.ser.path.as_str(),
                format!("map key {:?} {}", text, problem),
            ));
        }
        self.key = Some(text);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("map value serialized before its key"))?;
        self.ser.path.push_field(&key);
        value.serialize(&mut *self.ser)?;
        self.ser.path.pop();
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
    variant: bool,
}

impl<'a> StructSerializer<'a> {
    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.ser.path.push_field(key);
        value.serialize(&mut *self.ser)?;
        self.ser.path.pop();
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.variant {
            self.ser.path.pop();
        }
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeStructVariant for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Delimiter, ListFormat};
    use indexmap::IndexMap;
    use std::collections::BTreeMap;

    fn encode<T: Serialize>(value: &T, options: Options) -> Result<String> {
        let mut serializer = Serializer::new(options);
        value.serialize(&mut serializer)?;
        Ok(serializer.into_inner().to_string())
    }

    #[derive(Serialize, Debug)]
    struct Address {
        street: String,
        city: String,
    }

    #[derive(Serialize, Debug)]
    struct Person {
        name: String,
        #[serde(rename = "years")]
        age: u32,
        #[serde(skip)]
        #[allow(dead_code)]
        secret: String,
        address: Address,
        nickname: Option<String>,
    }

    #[test]
    fn test_struct_in_declared_order() {
        let person = Person {
            name: "Ann".into(),
            age: 41,
            secret: "hidden".into(),
            address: Address {
                street: "Main".into(),
                city: "Springfield".into(),
            },
            nickname: None,
        };
        assert_eq!(
            encode(&person, Options::new()).unwrap(),
            "name=Ann\nyears=41\naddress.street=Main\naddress.city=Springfield\n"
        );
    }

    #[test]
    fn test_sequences_of_structs() {
        let items = vec![
            Address {
                street: "a".into(),
                city: "b".into(),
            },
            Address {
                street: "c".into(),
                city: "d".into(),
            },
        ];
        assert_eq!(
            encode(&items, Options::new()).unwrap(),
            "[0].street=a\n[0].city=b\n[1].street=c\n[1].city=d\n"
        );
    }

    #[test]
    fn test_nested_sequences_and_maps() {
        let mut map = IndexMap::new();
        map.insert("grid", vec![vec![1, 2], vec![3]]);
        assert_eq!(
            encode(&map, Options::new()).unwrap(),
            "grid[0][0]=1\ngrid[0][1]=2\ngrid[1][0]=3\n"
        );
    }

    #[test]
    fn test_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(443u16, "https");
        map.insert(80u16, "http");
        assert_eq!(encode(&map, Options::new()).unwrap(), "80=http\n443=https\n");

        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        assert!(encode(&map, Options::new()).unwrap_err().is_shape());

        let mut map = BTreeMap::new();
        map.insert("a.b", "x");
        assert!(encode(&map, Options::new()).unwrap_err().is_shape());
    }

    #[test]
    fn test_empty_map_key_leaves_trailing_dot() {
        #[derive(Serialize, Debug)]
        struct Holder {
            props: BTreeMap<String, String>,
        }

        let mut props = BTreeMap::new();
        props.insert(String::new(), "v".to_string());
        assert_eq!(encode(&Holder { props }, Options::new()).unwrap(), "props.=v\n");
    }

    #[test]
    fn test_enums() {
        #[derive(Serialize, Debug)]
        enum Transport {
            Stdio,
            Tcp { host: String, port: u16 },
            Pipe(String),
            Pair(u8, u8),
        }

        let all = vec![
            Transport::Stdio,
            Transport::Tcp {
                host: "h".into(),
                port: 1,
            },
            Transport::Pipe("p".into()),
            Transport::Pair(1, 2),
        ];
        assert_eq!(
            encode(&all, Options::new()).unwrap(),
            "[0]=Stdio\n[1].Tcp.host=h\n[1].Tcp.port=1\n[2].Pipe=p\n[3].Pair[0]=1\n[3].Pair[1]=2\n"
        );
    }

    #[test]
    fn test_root_scalar_and_unit() {
        assert_eq!(encode(&7, Options::new()).unwrap(), "=7\n");
        assert_eq!(encode(&(), Options::new()).unwrap(), "=\n");
        assert_eq!(encode(&None::<u8>, Options::new()).unwrap(), "");
    }

    #[test]
    fn test_inline_lists() {
        let options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Pipe));

        let mut map = IndexMap::new();
        map.insert("ports", vec![80, 443]);
        map.insert("none", vec![]);
        assert_eq!(encode(&map, options.clone()).unwrap(), "ports=80|443\n");

        let mixed: Vec<Vec<u8>> = vec![vec![1], vec![2, 3]];
        assert_eq!(encode(&mixed, options).unwrap(), "[0]=1\n[1]=2|3\n");
    }

    #[test]
    fn test_inline_spills_on_composite() {
        #[derive(Serialize, Debug)]
        #[serde(untagged)]
        enum Item {
            Plain(u8),
            Nested { x: u8 },
        }

        let options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Comma));
        let items = vec![Item::Plain(1), Item::Nested { x: 2 }, Item::Plain(3)];
        assert_eq!(encode(&items, options).unwrap(), "[0]=1\n[1].x=2\n[2]=3\n");
    }

    #[test]
    fn test_bytes_are_rejected() {
        struct Raw;

        impl Serialize for Raw {
            fn serialize<S: ser::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_bytes(b"raw")
            }
        }

        assert!(encode(&Raw, Options::new()).unwrap_err().is_shape());
    }

    #[test]
    fn test_map_keys_that_would_not_parse_back() {
        let nested = |key: &str| {
            let mut inner = BTreeMap::new();
            inner.insert(key.to_string(), "v");
            let mut outer = BTreeMap::new();
            outer.insert("m", inner);
            encode(&outer, Options::new())
        };

        for key in ["a=b", "c:d", "line\nbreak", "cr\r", " padded", "padded ", "a[0]"] {
            let err = nested(key).unwrap_err();
            assert!(err.is_shape(), "{key:?} should be rejected");
            assert_eq!(err.key(), Some("m"));
        }
        assert_eq!(nested("#tag").unwrap(), "m.#tag=v\n");
        assert_eq!(nested("").unwrap(), "m.=v\n");

        let root = |key: &str| {
            let mut map = BTreeMap::new();
            map.insert(key.to_string(), "v");
            encode(&map, Options::new())
        };
        assert!(root("#tag").unwrap_err().is_shape());
        assert!(root("!tag").unwrap_err().is_shape());
        assert!(root("").unwrap_err().is_shape());
    }

    #[test]
    fn test_inline_spills_items_that_would_not_parse_back() {
        let options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Comma));

        let mut map = IndexMap::new();
        map.insert("tags", vec!["a,b", "c"]);
        assert_eq!(
            encode(&map, options.clone()).unwrap(),
            "tags[0]=a,b\ntags[1]=c\n"
        );

        let mut map = IndexMap::new();
        map.insert("tags", vec!["x", " padded"]);
        assert_eq!(
            encode(&map, options.clone()).unwrap(),
            "tags[0]=x\ntags[1]= padded\n"
        );

        let mut map = IndexMap::new();
        map.insert("tags", vec![""]);
        assert_eq!(encode(&map, options.clone()).unwrap(), "tags[0]=\n");

        let mut map = IndexMap::new();
        map.insert("opt", vec![Some(1), None, Some(3)]);
        assert_eq!(encode(&map, options).unwrap(), "opt[0]=1\nopt[2]=3\n");
    }
}
