//! Emptiness checks for omitting fields from output.
//!
//! Pair [`is_empty`] with serde's `skip_serializing_if` to leave a field out
//! when it holds its kind's zero value:
//!
//! ```rust
//! use serde::Serialize;
//! use std::collections::BTreeMap;
//!
//! #[derive(Serialize)]
//! struct Config {
//!     name: String,
//!     #[serde(skip_serializing_if = "serde_properties::is_empty")]
//!     retries: u32,
//!     #[serde(skip_serializing_if = "serde_properties::is_empty")]
//!     labels: BTreeMap<String, String>,
//! }
//!
//! let config = Config { name: "job".into(), retries: 0, labels: BTreeMap::new() };
//! assert_eq!(serde_properties::to_string(&config).unwrap(), "name=job\n");
//! ```
//!
//! Structs have no notion of emptiness, so a nested struct is
//! never omitted this way.

use crate::{Properties, Value};
use indexmap::{IndexMap, IndexSet};
use num_complex::Complex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Values with a zero or empty state.
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

/// Returns `true` when `value` holds its kind's zero value.
///
/// Meant for `#[serde(skip_serializing_if = "serde_properties::is_empty")]`.
pub fn is_empty<T>(value: &T) -> bool
where
    T: ?Sized + IsEmpty,
{
    value.is_empty_value()
}

macro_rules! zero_is_empty {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl IsEmpty for $ty {
                fn is_empty_value(&self) -> bool {
                    *self == $zero
                }
            }
        )*
    };
}

zero_is_empty! {
    bool => false,
    char => '\0',
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    i128 => 0,
    isize => 0,
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    u128 => 0,
    usize => 0,
    f32 => 0.0,
    f64 => 0.0,
}

macro_rules! len_is_empty {
    ($($ty:ty $(, $param:ident)*;)*) => {
        $(
            impl<$($param),*> IsEmpty for $ty {
                fn is_empty_value(&self) -> bool {
                    self.is_empty()
                }
            }
        )*
    };
}

len_is_empty! {
    str;
    String;
    Vec<T>, T;
    [T], T;
    VecDeque<T>, T;
    BTreeSet<T>, T;
    HashSet<T, S>, T, S;
    BTreeMap<K, V>, K, V;
    HashMap<K, V, S>, K, V, S;
    IndexMap<K, V, S>, K, V, S;
    IndexSet<T, S>, T, S;
    Properties;
}

impl<T, const N: usize> IsEmpty for [T; N] {
    fn is_empty_value(&self) -> bool {
        N == 0
    }
}

impl<T> IsEmpty for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized + IsEmpty> IsEmpty for &T {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: ?Sized + IsEmpty> IsEmpty for Box<T> {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: IsEmpty> IsEmpty for Complex<T> {
    fn is_empty_value(&self) -> bool {
        self.re.is_empty_value() && self.im.is_empty_value()
    }
}

impl IsEmpty for Value {
    fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Seq(seq) => seq.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_scalars() {
        assert!(is_empty(&0u8));
        assert!(is_empty(&0.0f64));
        assert!(is_empty(&false));
        assert!(is_empty(&'\0'));
        assert!(!is_empty(&-1i64));
        assert!(!is_empty(&true));
        assert!(!is_empty(&f64::NAN));
    }

    #[test]
    fn test_collections() {
        assert!(is_empty(""));
        assert!(is_empty(&String::new()));
        assert!(is_empty(&Vec::<u8>::new()));
        assert!(is_empty(&HashMap::<String, u8>::new()));
        assert!(!is_empty(&vec![0]));
        assert!(is_empty(&[0u8; 0]));
        assert!(!is_empty(&[0u8; 2]));
    }

    #[test]
    fn test_option_and_complex() {
        assert!(is_empty(&None::<u8>));
        assert!(!is_empty(&Some(0u8)));
        assert!(is_empty(&Complex64::new(0.0, 0.0)));
        assert!(!is_empty(&Complex64::new(0.0, 1.0)));
    }
}
