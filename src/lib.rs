//! # serde_properties
//!
//! A Serde-compatible codec for flat `key=value` properties files.
//!
//! ## What does it do?
//!
//! Properties files are flat: one `key=value` per line. This crate spells
//! nesting inside the keys, with dots for named children and brackets for
//! sequence elements, so any serde data structure can be written to and read
//! back from the format:
//!
//! ```text
//! name=web
//! server.host=localhost
//! server.ports[0]=80
//! server.ports[1]=443
//! labels.team=infra
//! ```
//!
//! ## Key Features
//!
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]`;
//!   `rename`, `skip` and `skip_serializing_if` control keys and output
//! - **Unambiguous Keys**: a field named `name` never picks up `nameExtra`
//! - **Forgiving Reads**: absent keys decode as zero values, sequence gaps are filled
//! - **Strict Mode**: optionally reject lines that no field consumed
//! - **Opaque Scalars**: any type with a text form can be a single value
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_properties = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_properties::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     ports: Vec<u16>,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Config {
//!     name: String,
//!     server: Server,
//! }
//!
//! let config = Config {
//!     name: "web".to_string(),
//!     server: Server { host: "localhost".to_string(), ports: vec![80, 443] },
//! };
//!
//! let text = to_string(&config).unwrap();
//! assert_eq!(
//!     text,
//!     "name=web\nserver.host=localhost\nserver.ports[0]=80\nserver.ports[1]=443\n"
//! );
//!
//! let back: Config = from_str(&text).unwrap();
//! assert_eq!(config, back);
//! ```
//!
//! ### Strict Decoding
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_properties::{from_str, from_str_strict};
//!
//! #[derive(Deserialize, Debug)]
//! struct Config { port: u16 }
//!
//! let text = "port=8080\nprot=9090";
//! assert!(from_str::<Config>(text).is_ok());
//! assert!(from_str_strict::<Config>(text).unwrap_err().is_unmatched());
//! ```
//!
//! ## Format
//!
//! See the [`format`] module for the complete description of the text format
//! and the key grammar.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - encoding and decoding a nested configuration
//! - **`custom_options.rs`** - separators, inline lists, strict mode and missing fields
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod empty;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
mod scalar;
pub mod ser;
pub mod text;
pub mod value;

pub use de::Deserializer;
pub use empty::{is_empty, IsEmpty};
pub use error::{Error, Result};
pub use map::{Origin, Properties};
pub use num_complex::Complex64;
pub use options::{Delimiter, ListFormat, MissingFields, Options};
pub use path::{KeyPath, Segment};
pub use ser::Serializer;
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Serialize any `T: Serialize` to a flat [`Properties`] mapping.
///
/// # Examples
///
/// ```rust
/// use serde_properties::to_properties;
/// use std::collections::BTreeMap;
///
/// let mut limits = BTreeMap::new();
/// limits.insert("cpu", 2);
/// limits.insert("memory", 512);
///
/// let props = to_properties(&limits).unwrap();
/// assert_eq!(props.get("memory"), Some("512"));
/// ```
///
/// # Errors
///
/// Returns an error if the value has no properties representation, such as a
/// map with composite keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_properties<T>(value: &T) -> Result<Properties>
where
    T: ?Sized + Serialize,
{
    to_properties_with_options(value, Options::default())
}

/// Serialize any `T: Serialize` to a flat [`Properties`] mapping with custom options.
///
/// # Errors
///
/// Returns an error if the value has no properties representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_properties_with_options<T>(value: &T, options: Options) -> Result<Properties>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    let props = serializer.into_inner();
    tracing::debug!(entries = props.len(), "encoded properties");
    Ok(props)
}

/// Serialize any `T: Serialize` to properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// assert_eq!(to_string(&point).unwrap(), "x=1\ny=2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no properties representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Serialize any `T: Serialize` to properties text with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_properties::{to_string_with_options, Delimiter, ListFormat, Options};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Post { title: String, tags: Vec<String> }
///
/// let post = Post { title: "Hello".into(), tags: vec!["go".into(), "rust".into()] };
/// let options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Comma));
/// assert_eq!(to_string_with_options(&post, options).unwrap(), "title=Hello\ntags=go,rust\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no properties representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_properties_with_options(value, options).map(|props| props.to_string())
}

/// Serialize any `T: Serialize` to a writer as properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(buffer, b"x=1\ny=2\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Options::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Serialize any `T: Serialize` and overwrite the file at `path` with the result.
///
/// Nothing is written if serialization fails.
///
/// # Errors
///
/// Returns an error if serialization fails, or [`Error::Io`] if the file cannot
/// be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file<P, T>(path: P, value: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize,
{
    let path = path.as_ref();
    let text = to_string(value)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "writing properties file");
    fs::write(path, text)?;
    Ok(())
}

/// Convert any `T: Serialize` to a dynamic [`Value`].
///
/// The value is encoded to properties and folded back, so the result is
/// exactly what decoding the encoded text into a `Value` would give.
///
/// # Examples
///
/// ```rust
/// use serde_properties::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.get("x"), Some(&Value::from("1")));
/// ```
///
/// # Errors
///
/// Returns an error if the value has no properties representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    let props = to_properties(value)?;
    from_properties(&props)
}

/// Deserialize an instance of type `T` from a parsed [`Properties`] mapping.
///
/// String fields may borrow from `props`.
///
/// # Examples
///
/// ```rust
/// use serde_properties::{from_properties, properties};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point<'a> { x: i32, label: &'a str }
///
/// let props = properties! { "x" => 3, "label" => "origin" };
/// let point: Point = from_properties(&props).unwrap();
/// assert_eq!(point, Point { x: 3, label: "origin" });
/// ```
///
/// # Errors
///
/// Returns an error if a value cannot be converted to its destination type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_properties<'de, T>(props: &'de Properties) -> Result<T>
where
    T: Deserialize<'de>,
{
    from_properties_with_options(props, Options::default())
}

/// Deserialize an instance of type `T` from a parsed [`Properties`] mapping
/// with custom options.
///
/// # Errors
///
/// Returns an error if a value cannot be converted, or, in strict mode, if an
/// entry was not consumed by any field.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_properties_with_options<'de, T>(props: &'de Properties, options: Options) -> Result<T>
where
    T: Deserialize<'de>,
{
    tracing::debug!(entries = props.len(), strict = options.strict, "decoding properties");
    let mut deserializer = Deserializer::with_options(props, options);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Deserialize an instance of type `T` from properties text.
///
/// Lines that no field consumes are ignored.
///
/// # Examples
///
/// ```rust
/// use serde_properties::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("# origin\nx = 1\ny: 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if a value cannot be converted to its destination type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, Options::default())
}

/// Deserialize an instance of type `T` from properties text, failing on any
/// line that no field consumes.
///
/// # Errors
///
/// Returns [`Error::UnmatchedKey`] for the first unconsumed line, or an error
/// if a value cannot be converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_strict<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, Options::strict())
}

/// Deserialize an instance of type `T` from properties text with custom options.
///
/// # Errors
///
/// Returns an error if a value cannot be converted, or, in strict mode, if a
/// line was not consumed by any field.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: Options) -> Result<T>
where
    T: DeserializeOwned,
{
    let props = Properties::parse_with_options(s, &options);
    from_properties_with_options(&props, options)
}

/// Deserialize an instance of type `T` from bytes of properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::from_slice;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_slice(b"x=1\ny=2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or cannot be deserialized
/// to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Deserialize an instance of type `T` from an I/O stream of properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x=1\ny=2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the data cannot be deserialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader.read_to_string(&mut string)?;
    from_str(&string)
}

/// Read the file at `path` and deserialize an instance of type `T` from it.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read (a missing file reports
/// [`io::ErrorKind::NotFound`]), or an error if decoding fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_file<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    from_file_with_options(path, Options::default())
}

/// Read the file at `path` and deserialize it with custom options.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or an error if decoding fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_file_with_options<P, T>(path: P, options: Options) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading properties file");
    let text = fs::read_to_string(path)?;
    from_str_with_options(&text, options)
}
