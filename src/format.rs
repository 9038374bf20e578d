//! The properties text format, as read and written by this library.
//!
//! # Lines
//!
//! Input is split into lines (`\n` or `\r\n`) and each line is trimmed.
//!
//! - Blank lines are ignored.
//! - Lines starting with `#` or `!` are comments and are ignored.
//! - Other lines are split at the **first** `=` or `:`. Key and value are
//!   trimmed; everything after the separator, including further `=` and `:`,
//!   belongs to the value.
//! - Lines with no separator are ignored.
//! - When a key repeats, the last value wins.
//!
//! ```text
//! # connection settings
//! ! legacy comment style
//! url = http://example.com:8080/?a=b
//! timeout: 30
//! this line has no separator and is skipped
//! ```
//!
//! Output always uses `key=value\n`, one entry per line, with no comments,
//! blank lines, quoting or escaping. Comment markers and separators can be
//! changed with [`Options`](crate::Options).
//!
//! # Keys
//!
//! ```text
//! key     = segment ( "." segment | "[" digits "]" )*
//! segment = field name | map key | variant name
//! ```
//!
//! | Rust shape | Key | Example |
//! |---|---|---|
//! | struct field | `parent.field` | `server.host=localhost` |
//! | map entry | `parent.key` | `labels.team=infra` |
//! | sequence element | `parent[i]` | `ports[0]=80` |
//! | unit enum variant | value is the variant name | `level=Debug` |
//! | other enum variants | `parent.Variant...` | `auth.Token=abc` |
//! | top-level scalar | empty key | `=42` |
//!
//! A key belongs to a node only when it equals the node's key or continues it
//! with `.` or a well-formed `[digits]`. A field `name` therefore never reads
//! the line `nameExtra=x`.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_properties::from_str;
//!
//! #[derive(Deserialize, Debug)]
//! struct Names {
//!     name: String,
//!     #[serde(rename = "nameExtra")]
//!     extra: String,
//! }
//!
//! let names: Names = from_str("nameExtra=x").unwrap();
//! assert_eq!(names.name, "");
//! assert_eq!(names.extra, "x");
//! ```
//!
//! Map keys end at the next `.` or `[`, so they cannot contain those
//! characters. Nor can they contain a separator or a line break, or start or
//! end with whitespace; at the top level they also cannot be empty or start
//! with a comment marker. The encoder rejects such keys with a shape error.
//! The empty string is a valid map key below the top level and renders as a
//! trailing dot:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_properties::from_str;
//! use std::collections::HashMap;
//!
//! #[derive(Deserialize)]
//! struct Holder { props: HashMap<String, String> }
//!
//! let holder: Holder = from_str("props.=v").unwrap();
//! assert_eq!(holder.props[""], "v");
//! ```
//!
//! # Values
//!
//! | Type | Accepted on input | Written as |
//! |---|---|---|
//! | `bool` | `true`/`false`, `t`/`f`, `1`/`0`, `yes`/`no`, `on`/`off`, any case | `true` / `false` |
//! | integers | base-10 within the type's range | base-10 |
//! | floats | decimal or scientific notation | shortest round-tripping decimal |
//! | `char` | exactly one character | the character |
//! | `String` | anything | verbatim |
//! | `Complex64` (via [`text`](crate::text)) | `a+bi` | `a+bi` |
//! | `()` and unit structs | anything | empty |
//! | `Option<T>` | `Some` when any key is at or below the node | `None` writes nothing |
//!
//! Types whose serde impls go through strings (timestamps, addresses, ...)
//! are single values, whatever their internal shape.
//!
//! # Absent values
//!
//! A node with no line at or below its key decodes as its zero value: `""`,
//! `0`, `false`, `'\0'`, `None`, an empty collection, a struct of zero values,
//! or an enum's first variant. Sequences are as long as their largest index
//! plus one; missing indexes are zero values.
//!
//! ```rust
//! use serde_properties::from_str;
//!
//! let tags: Vec<String> = from_str("[0]=a\n[2]=c").unwrap();
//! assert_eq!(tags, vec!["a", "", "c"]);
//! ```
//!
//! # Round trips
//!
//! Decoding what the encoder wrote gives back the original value, provided
//! map keys avoid `.` and `[`, strings have no surrounding whitespace or line
//! breaks, and `Some` of an empty collection is not used. Raw text does not
//! round trip: comments, blank lines and original order are not kept.
