//! Treat a type as an opaque text scalar through its `Display` / `FromStr` impls.
//!
//! Use with `#[serde(with = "serde_properties::text")]` on fields whose type
//! has a text form but no suitable serde impl of its own. Empty text decodes
//! to the type's `Default`, so absent fields stay valid.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_properties::Complex64;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Signal {
//!     #[serde(with = "serde_properties::text")]
//!     phase: Complex64,
//!     gain: f64,
//! }
//!
//! let signal = Signal { phase: Complex64::new(1.5, -2.0), gain: 0.5 };
//! let text = serde_properties::to_string(&signal).unwrap();
//! assert_eq!(text, "phase=1.5-2i\ngain=0.5\n");
//!
//! let back: Signal = serde_properties::from_str(&text).unwrap();
//! assert_eq!(back, signal);
//!
//! let empty: Signal = serde_properties::from_str("gain=1").unwrap();
//! assert_eq!(empty.phase, Complex64::new(0.0, 0.0));
//! ```

use serde::{de, Deserializer, Serializer};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: ?Sized + Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr + Default,
    T::Err: Display,
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(TextVisitor(PhantomData))
}

struct TextVisitor<T>(PhantomData<T>);

impl<'de, T> de::Visitor<'de> for TextVisitor<T>
where
    T: FromStr + Default,
    T::Err: Display,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a value in its text form")
    }

    fn visit_str<E>(self, value: &str) -> Result<T, E>
    where
        E: de::Error,
    {
        if value.is_empty() {
            return Ok(T::default());
        }
        value.parse().map_err(E::custom)
    }
}
