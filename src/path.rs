//! Key paths: how nesting is spelled in a flat properties key.
//!
//! A key path is a sequence of segments rendered left to right. Named
//! segments (struct fields, map keys, enum variants) are joined with `.`,
//! sequence indexes attach directly to their parent as `[n]`:
//!
//! ```text
//! server.listeners[0].port=8080
//! ^^^^^^ ^^^^^^^^^ ^^^ ^^^^
//! field  field  index field
//! ```
//!
//! The root has an empty path, so the first named segment carries no leading dot.
//!
//! ## Prefix boundaries
//!
//! A flat key belongs to the node at path `p` only when it equals `p`, or
//! continues it with `.` or with a well-formed `[n]`. A field named `name` therefore
//! never claims the key `nameExtra`.
//!
//! ```rust
//! use serde_properties::{KeyPath, Segment};
//!
//! let path = KeyPath::root().field("server").field("listeners").index(0).field("port");
//! assert_eq!(path.as_str(), "server.listeners[0].port");
//!
//! let segments = KeyPath::parse("server.listeners[0].port").unwrap();
//! assert_eq!(segments[2], Segment::Index(0));
//! ```

use std::fmt;

/// One step of a key path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Descent into a struct field, map entry or enum variant.
    Name(String),
    /// Descent into a sequence element.
    Index(usize),
}

/// A rendered key path.
///
/// Paths are built incrementally while walking a value. The encoder grows and
/// shrinks a single path in place with [`KeyPath::push_field`] /
/// [`KeyPath::push_index`] / [`KeyPath::pop`]; the decoder derives child paths
/// with [`KeyPath::field`] / [`KeyPath::index`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    rendered: String,
    marks: Vec<usize>,
}

impl KeyPath {
    /// The empty path of the top-level value.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.rendered.is_empty() && self.marks.is_empty()
    }

    /// Returns the path of the named child `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        let mut child = self.clone();
        child.push_field(name);
        child
    }

    /// Returns the path of element `index`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.push_index(index);
        child
    }

    pub fn push_field(&mut self, name: &str) {
        if !self.marks.is_empty() {
            self.marks.push(self.rendered.len());
            self.rendered.push('.');
        } else {
            self.marks.push(0);
        }
        self.rendered.push_str(name);
    }

    pub fn push_index(&mut self, index: usize) {
        self.marks.push(self.rendered.len());
        self.rendered.push('[');
        self.rendered.push_str(&index.to_string());
        self.rendered.push(']');
    }

    /// Removes the last segment. Popping the root is a no-op.
    pub fn pop(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.rendered.truncate(mark);
        }
    }

    /// Decomposes a flat key into its segments.
    ///
    /// Returns `None` when a bracket is not a well-formed `[digits]` index or a
    /// name segment is followed by anything other than `.`, `[` or the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::{KeyPath, Segment};
    ///
    /// assert_eq!(
    ///     KeyPath::parse("props.").unwrap(),
    ///     vec![Segment::Name("props".into()), Segment::Name("".into())]
    /// );
    /// assert!(KeyPath::parse("tags[x]").is_none());
    /// ```
    #[must_use]
    pub fn parse(key: &str) -> Option<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut rest = key;

        if !rest.starts_with('[') {
            let end = name_end(rest);
            segments.push(Segment::Name(rest[..end].to_string()));
            rest = &rest[end..];
        }

        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let end = name_end(after_dot);
                segments.push(Segment::Name(after_dot[..end].to_string()));
                rest = &after_dot[end..];
            } else {
                let (index, after) = split_index(rest)?;
                segments.push(Segment::Index(index));
                rest = after;
            }
        }

        Some(segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Where a flat key sits relative to some node's path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Descent<'k> {
    /// The key addresses a named child; holds everything after the joining dot.
    Named(&'k str),
    /// The key addresses element `index`; holds what follows the brackets.
    Indexed(usize, &'k str),
}

/// Locates `key` strictly beneath `parent`, enforcing the prefix boundary.
///
/// At the root every non-empty key is a descendant: bracketed keys are indexed,
/// everything else is named.
pub(crate) fn descend<'k>(key: &'k str, parent: &str) -> Option<Descent<'k>> {
    let rest = key.strip_prefix(parent)?;
    if rest.is_empty() {
        return None;
    }
    if rest.starts_with('[') {
        return split_index(rest).map(|(index, after)| Descent::Indexed(index, after));
    }
    if parent.is_empty() {
        return Some(Descent::Named(rest));
    }
    rest.strip_prefix('.').map(Descent::Named)
}

/// The first named segment of a remainder: everything before the next `.` or `[`.
///
/// `None` when the segment is followed by a malformed index such as `[b]`.
pub(crate) fn first_segment(rest: &str) -> Option<&str> {
    let end = name_end(rest);
    let tail = &rest[end..];
    if tail.is_empty() || tail.starts_with('.') || split_index(tail).is_some() {
        Some(&rest[..end])
    } else {
        None
    }
}

fn name_end(s: &str) -> usize {
    s.find(['.', '[']).unwrap_or(s.len())
}

/// Splits a leading `[digits]` off `s`. What remains must be empty or start a
/// new segment.
fn split_index(s: &str) -> Option<(usize, &str)> {
    let inner = s.strip_prefix('[')?;
    let close = inner.find(']')?;
    let digits = &inner[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse().ok()?;
    let after = &inner[close + 1..];
    if after.is_empty() || after.starts_with('.') || after.starts_with('[') {
        Some((index, after))
    } else {
        None
    }
}
