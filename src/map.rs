//! The flat mapping: parsed `key=value` lines.
//!
//! [`Properties`] is an ordered map of keys to text values backed by
//! [`IndexMap`], so output is deterministic and follows insertion order.
//! It is what the line parser produces, what the decoder folds into nested
//! values, and what the encoder unfolds them into.
//!
//! ## Parsing rules
//!
//! - Lines are trimmed; blank lines and lines starting with a comment marker
//!   (`#` or `!` by default) are skipped.
//! - The line is split at the first separator (`=` or `:` by default); key and
//!   value are trimmed. Lines with no separator are skipped.
//! - A repeated key overwrites the earlier value and keeps its position.
//!
//! ## Examples
//!
//! ```rust
//! use serde_properties::Properties;
//!
//! let props = Properties::parse("# settings\nname = Alice\nage: 30\nname=Bob\n");
//! assert_eq!(props.len(), 2);
//! assert_eq!(props.get("name"), Some("Bob"));
//! assert_eq!(props.to_string(), "name=Bob\nage=30\n");
//! ```

use crate::Options;
use indexmap::IndexMap;
use std::fmt;

/// Where a parsed entry came from: its 1-based line number and the trimmed line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    pub line: usize,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    value: String,
    origin: Option<Origin>,
}

/// An ordered map of flat property keys to text values.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    entries: IndexMap<String, Entry>,
}

impl Properties {
    /// Creates an empty `Properties`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Properties;
    ///
    /// let props = Properties::new();
    /// assert!(props.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Properties {
            entries: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Properties {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Parses text with the default comment markers and separators.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_with_options(text, &Options::default())
    }

    /// Parses text using the comment markers and separators in `options`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::{Options, Properties};
    ///
    /// let options = Options::new().with_separators(&['=']);
    /// let props = Properties::parse_with_options("url=http://example.com\nno separator here", &options);
    /// assert_eq!(props.get("url"), Some("http://example.com"));
    /// assert_eq!(props.len(), 1);
    /// ```
    #[must_use]
    pub fn parse_with_options(text: &str, options: &Options) -> Self {
        let mut props = Properties::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || options.is_comment(line) {
                continue;
            }

            let Some(split) = line.find(options.separators.as_slice()) else {
                tracing::trace!(line = index + 1, text = line, "skipping line without separator");
                continue;
            };
            let key = line[..split].trim();
            let separator_len = line[split..].chars().next().map_or(1, char::len_utf8);
            let value = line[split + separator_len..].trim();

            props.entries.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    origin: Some(Origin {
                        line: index + 1,
                        text: line.to_string(),
                    }),
                },
            );
        }

        props
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Properties;
    ///
    /// let mut props = Properties::new();
    /// assert!(props.insert("port", "80").is_none());
    /// assert_eq!(props.insert("port", "8080").as_deref(), Some("80"));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries
            .insert(
                key.into(),
                Entry {
                    value: value.into(),
                    origin: None,
                },
            )
            .map(|entry| entry.value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.value.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Where the entry for `key` was parsed from, if it was parsed at all.
    #[must_use]
    pub fn origin(&self, key: &str) -> Option<&Origin> {
        self.entries.get(key).and_then(|entry| entry.origin.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over key-value pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.value.as_str()))
    }

    pub(crate) fn get_full(&self, key: &str) -> Option<(usize, &str)> {
        self.entries
            .get_full(key)
            .map(|(index, _, entry)| (index, entry.value.as_str()))
    }

    /// The line to report for the entry at `index`: the source line when the
    /// entry was parsed, otherwise its `key=value` rendering.
    pub(crate) fn describe(&self, index: usize) -> (Option<usize>, String) {
        match self.entries.get_index(index) {
            Some((_, Entry { origin: Some(origin), .. })) => (Some(origin.line), origin.text.clone()),
            Some((key, entry)) => (None, format!("{}={}", key, entry.value)),
            None => (None, String::new()),
        }
    }
}

/// Entries compare by key and value only; where they were parsed from is ignored.
impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for Properties {}

/// Renders one `key=value` line per entry, each terminated by `\n`.
impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut props = Properties::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

impl<K, V> Extend<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

/// An owning iterator over the entries of a [`Properties`], in order.
pub struct IntoIter {
    inner: indexmap::map::IntoIter<String, Entry>,
}

impl Iterator for IntoIter {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, entry)| (key, entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {}
