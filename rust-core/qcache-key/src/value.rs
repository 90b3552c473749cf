// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Bound parameter values.
//!
//! A [`ParamValue`] is whatever the query pipeline bound to a placeholder.
//! Sequence-typed values (byte strings, float vectors, nested arrays) compare
//! and hash element by element, so two independently built bindings with the
//! same contents always land on the same cache entry.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash;

/// A value bound to a named or positional query parameter.
///
/// Equality is structural and type-aware:
///
/// - values of different variants are never equal (`Int(1) != Float(1.0)`);
/// - floats compare by bit pattern, so `NaN` equals itself and `0.0` does not
///   equal `-0.0`, which keeps `Eq` lawful;
/// - `Bytes`, `Vector` and `Array` compare element-wise, recursing into
///   nested arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// An explicit SQL-style NULL, also used for unbound slots.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string value.
    String(String),
    /// An entity or row identifier.
    Uuid(Uuid),
    /// A point in time.
    Timestamp(DateTime<Utc>),
    /// A raw byte string.
    Bytes(Vec<u8>),
    /// A vector of 32-bit floats (e.g. an embedding).
    Vector(Vec<f32>),
    /// A general array or collection, possibly nested.
    Array(Vec<ParamValue>),
}

impl ParamValue {
    /// Short type tag, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::String(_) => "string",
            ParamValue::Uuid(_) => "uuid",
            ParamValue::Timestamp(_) => "timestamp",
            ParamValue::Bytes(_) => "bytes",
            ParamValue::Vector(_) => "vector",
            ParamValue::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Deep, process-independent hash of this value.
    ///
    /// `Null` hashes to 0. Sequences use an ordered ×31 combination seeded
    /// with 1 and recurse into nested arrays. Equal values always produce
    /// equal hashes.
    pub fn structural_hash(&self) -> u64 {
        match self {
            ParamValue::Null => 0,
            ParamValue::Bool(b) => hash::hash_bool(*b),
            ParamValue::Int(i) => *i as u64,
            ParamValue::Float(f) => f.to_bits(),
            ParamValue::String(s) => hash::hash_str(s),
            ParamValue::Uuid(u) => hash::hash_bytes(u.as_bytes()),
            ParamValue::Timestamp(ts) => hash::mix(
                ts.timestamp() as u64,
                u64::from(ts.timestamp_subsec_nanos()),
            ),
            ParamValue::Bytes(b) => hash::ordered(b.iter().map(|byte| u64::from(*byte))),
            ParamValue::Vector(v) => hash::ordered(v.iter().map(|f| u64::from(f.to_bits()))),
            ParamValue::Array(items) => hash::ordered(items.iter().map(ParamValue::structural_hash)),
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Null, ParamValue::Null) => true,
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a == b,
            (ParamValue::Int(a), ParamValue::Int(b)) => a == b,
            (ParamValue::Float(a), ParamValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ParamValue::String(a), ParamValue::String(b)) => a == b,
            (ParamValue::Uuid(a), ParamValue::Uuid(b)) => a == b,
            (ParamValue::Timestamp(a), ParamValue::Timestamp(b)) => a == b,
            (ParamValue::Bytes(a), ParamValue::Bytes(b)) => a == b,
            (ParamValue::Vector(a), ParamValue::Vector(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (ParamValue::Array(a), ParamValue::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ParamValue {}

impl Hash for ParamValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::String(s) => write!(f, "\"{}\"", s),
            ParamValue::Uuid(u) => write!(f, "{}", u),
            ParamValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            ParamValue::Bytes(b) => write!(f, "bytes[{}]", b.len()),
            ParamValue::Vector(v) => {
                write!(f, "vec[")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", x)?;
                }
                write!(f, "]")
            }
            ParamValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<Uuid> for ParamValue {
    fn from(u: Uuid) -> Self {
        ParamValue::Uuid(u)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(ts: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(ts)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(b: Vec<u8>) -> Self {
        ParamValue::Bytes(b)
    }
}

impl From<Vec<f32>> for ParamValue {
    fn from(v: Vec<f32>) -> Self {
        ParamValue::Vector(v)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(items: Vec<ParamValue>) -> Self {
        ParamValue::Array(items)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(ParamValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(last: i64) -> ParamValue {
        ParamValue::Array(vec![
            ParamValue::Int(1),
            ParamValue::Array(vec![ParamValue::Int(2), ParamValue::Int(last)]),
        ])
    }

    #[test]
    fn test_nested_arrays_compare_deeply() {
        assert_eq!(nested(3), nested(3));
        assert_eq!(nested(3).structural_hash(), nested(3).structural_hash());
        assert_ne!(nested(3), nested(4));
    }

    #[test]
    fn test_type_mismatch_is_not_equal() {
        assert_ne!(ParamValue::Int(1), ParamValue::Float(1.0));
        assert_ne!(
            ParamValue::Array(vec![ParamValue::Int(1)]),
            ParamValue::Int(1)
        );
        assert_ne!(ParamValue::Bytes(vec![1, 2]), ParamValue::Vector(vec![1.0, 2.0]));
    }

    #[test]
    fn test_null_equals_only_null() {
        assert_eq!(ParamValue::Null, ParamValue::Null);
        assert_ne!(ParamValue::Null, ParamValue::Int(0));
        assert_eq!(ParamValue::Null.structural_hash(), 0);
    }

    #[test]
    fn test_float_bitwise_equality() {
        assert_eq!(ParamValue::Float(f64::NAN), ParamValue::Float(f64::NAN));
        assert_ne!(ParamValue::Float(0.0), ParamValue::Float(-0.0));
        assert_eq!(
            ParamValue::Vector(vec![f32::NAN, 1.5]),
            ParamValue::Vector(vec![f32::NAN, 1.5])
        );
    }

    #[test]
    fn test_sequence_hash_is_order_sensitive() {
        let a = ParamValue::Bytes(vec![1, 2, 3]);
        let b = ParamValue::Bytes(vec![3, 2, 1]);
        assert_ne!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn test_display_renders_deeply() {
        assert_eq!(nested(3).to_string(), "[1, [2, 3]]");
        assert_eq!(ParamValue::from("x").to_string(), "\"x\"");
        assert_eq!(ParamValue::Vector(vec![0.5, 1.0]).to_string(), "vec[0.5, 1]");
        assert_eq!(ParamValue::Null.to_string(), "null");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some(7i64)), ParamValue::Int(7));
    }

    #[test]
    fn test_usable_as_hash_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(nested(3), "hit");
        assert_eq!(map.get(&nested(3)), Some(&"hit"));
        assert_eq!(map.get(&nested(4)), None);
    }

    #[test]
    fn test_serde_roundtrip_preserves_equality() {
        let values = vec![
            ParamValue::Null,
            ParamValue::Bool(true),
            ParamValue::Int(-42),
            ParamValue::String("hello".to_string()),
            ParamValue::Uuid(Uuid::new_v4()),
            ParamValue::Bytes(vec![0, 255]),
            nested(9),
        ];
        for value in &values {
            let json = serde_json::to_string(value).unwrap();
            let parsed: ParamValue = serde_json::from_str(&json).unwrap();
            assert_eq!(&parsed, value);
        }
    }
}
