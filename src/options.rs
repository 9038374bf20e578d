//! Configuration options for reading and writing properties.
//!
//! - [`Options`]: main configuration struct, built with `with_*` methods
//! - [`ListFormat`]: indexed (`tags[0]=a`) or inline (`tags=a,b`) sequences
//! - [`Delimiter`]: separator for inline sequences
//! - [`MissingFields`]: how absent struct fields are filled
//!
//! ## Examples
//!
//! ```rust
//! use serde_properties::{to_string_with_options, Delimiter, ListFormat, Options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { tags: Vec<&'static str> }
//!
//! let data = Data { tags: vec!["a", "b"] };
//!
//! let indexed = to_string_with_options(&data, Options::new()).unwrap();
//! assert_eq!(indexed, "tags[0]=a\ntags[1]=b\n");
//!
//! let options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Comma));
//! let inline = to_string_with_options(&data, options).unwrap();
//! assert_eq!(inline, "tags=a,b\n");
//! ```

/// Delimiter joining the items of an inline sequence.
///
/// # Examples
///
/// ```rust
/// use serde_properties::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

/// How sequences are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ListFormat {
    /// One line per element: `tags[0]=a`, `tags[1]=b`.
    #[default]
    Indexed,
    /// Sequences of scalars on a single line: `tags=a,b`.
    ///
    /// Sequences containing composite elements are still written indexed, and
    /// indexed lines are still accepted when decoding. Items are trimmed on
    /// input, so a sequence with an empty item, a padded item or an item
    /// containing the delimiter is written indexed as well.
    Inline(Delimiter),
}

/// What the decoder does with struct fields that have no line in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MissingFields {
    /// Fill the field with its kind's zero value: `""`, `0`, `false`, `None`,
    /// an empty collection, or a struct of zero values.
    #[default]
    Zero,
    /// Leave the field out and let serde decide, so `#[serde(default)]` and
    /// `Option` handling apply and other absent fields are reported as missing.
    Skip,
}

/// Configuration for parsing, decoding and encoding.
///
/// # Examples
///
/// ```rust
/// use serde_properties::Options;
///
/// let options = Options::new();
/// assert_eq!(options.comment_markers, vec!['#', '!']);
/// assert_eq!(options.separators, vec!['=', ':']);
/// assert!(!options.strict);
///
/// let options = Options::strict().with_separators(&['=']);
/// assert!(options.strict);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Characters that start a comment line.
    pub comment_markers: Vec<char>,
    /// Characters that split a line into key and value; the first one found wins.
    pub separators: Vec<char>,
    /// Fail when a line is not consumed by any destination field.
    pub strict: bool,
    pub list_format: ListFormat,
    pub missing_fields: MissingFields,
    /// Largest sequence the decoder will build. A `key[n]` line asks for
    /// `n + 1` elements; longer sequences fail with a shape error.
    pub max_sequence_len: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            comment_markers: vec!['#', '!'],
            separators: vec!['=', ':'],
            strict: false,
            list_format: ListFormat::default(),
            missing_fields: MissingFields::default(),
            max_sequence_len: 1 << 20,
        }
    }
}

impl Options {
    /// Creates default options: `#`/`!` comments, `=`/`:` separators,
    /// permissive decoding, indexed sequences, zero-filled missing fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates default options with strict decoding enabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::{from_str_with_options, Options};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize, Debug)]
    /// struct Config { name: String }
    ///
    /// let result = from_str_with_options::<Config>("nmae=typo", Options::strict());
    /// assert!(result.unwrap_err().is_unmatched());
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        Options {
            strict: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replaces the set of comment markers.
    #[must_use]
    pub fn with_comment_markers(mut self, markers: &[char]) -> Self {
        self.comment_markers = markers.to_vec();
        self
    }

    /// Replaces the set of key/value separators.
    ///
    /// Only affects parsing; output always uses `=`.
    #[must_use]
    pub fn with_separators(mut self, separators: &[char]) -> Self {
        self.separators = separators.to_vec();
        self
    }

    #[must_use]
    pub fn with_list_format(mut self, list_format: ListFormat) -> Self {
        self.list_format = list_format;
        self
    }

    #[must_use]
    pub fn with_missing_fields(mut self, missing_fields: MissingFields) -> Self {
        self.missing_fields = missing_fields;
        self
    }

    /// Caps the length of decoded sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::{from_str_with_options, Options};
    ///
    /// let options = Options::new().with_max_sequence_len(4);
    /// let err = from_str_with_options::<Vec<u8>>("[9]=1", options).unwrap_err();
    /// assert!(err.is_shape());
    /// assert_eq!(err.key(), Some("[9]"));
    /// ```
    #[must_use]
    pub fn with_max_sequence_len(mut self, max_sequence_len: usize) -> Self {
        self.max_sequence_len = max_sequence_len;
        self
    }

    pub(crate) fn is_comment(&self, line: &str) -> bool {
        line.starts_with(self.comment_markers.as_slice())
    }

    pub(crate) fn inline_delimiter(&self) -> Option<char> {
        match self.list_format {
            ListFormat::Indexed => None,
            ListFormat::Inline(delimiter) => Some(delimiter.as_char()),
        }
    }
}
