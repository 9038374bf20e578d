//! Error types for properties serialization and deserialization.
//!
//! Every failure aborts the whole call. Errors raised while converting a single
//! line carry the key path of that line, so a message always points at the
//! offending entry in the input.
//!
//! ## Error Categories
//!
//! - **Parse errors**: a value could not be converted to the destination type
//! - **Shape errors**: the destination (or source) kind cannot be expressed as
//!   properties, e.g. a struct used as a map key
//! - **Unmatched keys**: strict decoding found a line no field consumed
//! - **I/O errors**: file, reader or writer failures, passed through unchanged
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_properties::{from_str, Error};
//!
//! #[derive(Deserialize, Debug)]
//! struct Person { age: u32 }
//!
//! let err = from_str::<Person>("age=invalid").unwrap_err();
//! assert!(err.is_parse());
//! assert_eq!(err.key(), Some("age"));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding properties.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error during reading or writing.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A value could not be converted to the destination type.
    #[error("cannot convert {value:?} at key `{key}`: {msg}")]
    Parse {
        key: String,
        value: String,
        msg: String,
    },

    /// The node kind at `key` cannot be represented as properties.
    #[error("unsupported shape at key `{key}`: {msg}")]
    Shape { key: String, msg: String },

    /// Strict decoding left a line unconsumed.
    #[error("property failed to be assigned{}: {text:?}", .line.map(|n| format!(" (line {})", n)).unwrap_or_default())]
    UnmatchedKey { line: Option<usize>, text: String },

    /// Custom error raised outside of any key context.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a conversion error for `value` found at `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Error;
    ///
    /// let err = Error::parse("server.port", "eighty", "invalid digit found in string");
    /// assert!(err.to_string().contains("server.port"));
    /// ```
    pub fn parse(key: &str, value: &str, msg: impl fmt::Display) -> Self {
        Error::Parse {
            key: key.to_string(),
            value: value.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a node kind that has no properties representation.
    pub fn shape(key: &str, msg: impl fmt::Display) -> Self {
        Error::Shape {
            key: key.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unmatched(line: Option<usize>, text: &str) -> Self {
        Error::UnmatchedKey {
            line,
            text: text.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert_eq!(err.to_string(), "something went wrong");
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Attributes a context-free error to the leaf at `key` holding `value`.
    ///
    /// Visitors of opaque types report failures through `serde::de::Error::custom`,
    /// which knows nothing about key paths.
    pub(crate) fn at(self, key: &str, value: &str) -> Self {
        match self {
            Error::Custom(msg) => Error::parse(key, value, msg),
            other => other,
        }
    }

    /// The key path the error refers to, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::Parse { key, .. } | Error::Shape { key, .. } => Some(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(self, Error::Shape { .. })
    }

    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Error::UnmatchedKey { .. })
    }

    /// The kind of the underlying I/O error, for `Error::Io` only.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Error;
    /// use std::io;
    ///
    /// let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    /// assert_eq!(err.io_error_kind(), Some(io::ErrorKind::NotFound));
    /// ```
    #[must_use]
    pub fn io_error_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_errors_pick_up_key() {
        let err = Error::custom("premature end of input").at("created", "2024-");
        assert!(err.is_parse());
        assert_eq!(err.key(), Some("created"));
        assert!(err.to_string().contains("\"2024-\""));
    }

    #[test]
    fn test_keyed_errors_keep_their_key() {
        let err = Error::shape("inner", "struct map key").at("outer", "x");
        assert_eq!(err.key(), Some("inner"));
    }

    #[test]
    fn test_unmatched_display() {
        let err = Error::unmatched(Some(3), "nonexistent=field");
        assert_eq!(
            err.to_string(),
            "property failed to be assigned (line 3): \"nonexistent=field\""
        );

        let err = Error::unmatched(None, "x=1");
        assert_eq!(err.to_string(), "property failed to be assigned: \"x=1\"");
    }
}
