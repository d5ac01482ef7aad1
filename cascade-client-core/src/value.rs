//! The Cascade value model.
//!
//! A document field holds exactly one of the variants below. Base
//! variants map one-to-one onto wire value fields; extension variants
//! (`MinKey`, `MaxKey`, `Int32`, `Decimal128`, `ObjectId`,
//! `LogicalTimestamp`, `Binary`, `Regex`, `Vector`) arrive as reserved-key
//! maps and are unwrapped during classification (see [`crate::wire`]).
//!
//! ## Ordering
//! Values order by [`TypeRank`] first; equal ranks use variant-specific
//! rules (numbers on one combined line, strings in UTF-8 byte order,
//! maps by sorted keys). `Ord` and `PartialEq` follow the comparator, so
//! `Int64(1) == Double(1.0)` and `Null == MinKey`; use pattern matching
//! when variant identity matters.
//!
//! ## Sentinels
//! `MinKey` shares the lowest rank with `Null` and `MaxKey` owns the
//! highest, so the two sentinels bracket every other value.

use std::cmp::Ordering;
use std::fmt;

use crate::compare::compare_values;
use crate::path::ResourcePath;

// === Component types ===

/// Wall-clock instant: whole seconds since the Unix epoch plus a
/// nanosecond remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Timestamp { seconds, nanos }
    }
}

/// Extension-typed timestamp: whole seconds plus an increment ordinal
/// disambiguating events within the same second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalTimestamp {
    pub seconds: i64,
    pub increment: i64,
}

impl LogicalTimestamp {
    pub fn new(seconds: i64, increment: i64) -> Self {
        LogicalTimestamp { seconds, increment }
    }
}

/// Arbitrary-precision decimal carried as its literal string. Parsing
/// happens lazily at comparison time (see [`crate::numeric`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal128(String);

impl Decimal128 {
    pub fn new(literal: impl Into<String>) -> Self {
        Decimal128(literal.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extension binary payload with its subtype tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryData {
    pub subtype: u8,
    pub bytes: Vec<u8>,
}

impl BinaryData {
    pub fn new(subtype: u8, bytes: Vec<u8>) -> Self {
        BinaryData { subtype, bytes }
    }
}

/// Object identifier carried as its canonical hex string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(hex: impl Into<String>) -> Self {
        ObjectId(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Geographic point in degrees.
#[derive(Clone, Copy, Debug)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }
}

/// Regular expression pattern plus option flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Regex {
    pub pattern: String,
    pub options: String,
}

impl Regex {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Regex {
            pattern: pattern.into(),
            options: options.into(),
        }
    }
}

// === Value ===

/// A document field value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    MinKey,
    MaxKey,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal128(Decimal128),
    Timestamp(Timestamp),
    LogicalTimestamp(LogicalTimestamp),
    String(String),
    Bytes(Vec<u8>),
    Binary(BinaryData),
    Reference(Box<ResourcePath>),
    ObjectId(ObjectId),
    GeoPoint(GeoPoint),
    Regex(Regex),
    Array(Vec<Value>),
    Vector(Vec<f64>),
    /// Map fields in insertion order; comparison sorts a key view, so
    /// storage order never affects ordering.
    Map(Vec<(String, Value)>),
}

/// Primary sort bucket per variant. The order of these ranks is part of
/// the backend contract and must remain fixed.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeRank {
    Null = 0,
    Bool = 1,
    Number = 2,
    Timestamp = 3,
    LogicalTimestamp = 4,
    String = 5,
    Bytes = 6,
    Binary = 7,
    Reference = 8,
    ObjectId = 9,
    GeoPoint = 10,
    Regex = 11,
    Array = 12,
    Vector = 13,
    Map = 14,
    MaxKey = 15,
}

impl Value {
    /// Rank deciding cross-variant order. `Null` and `MinKey` share the
    /// lowest bucket; every numeric width shares [`TypeRank::Number`].
    pub fn type_rank(&self) -> TypeRank {
        match self {
            Value::Null | Value::MinKey => TypeRank::Null,
            Value::Bool(_) => TypeRank::Bool,
            Value::Int32(_) | Value::Int64(_) | Value::Double(_) | Value::Decimal128(_) => {
                TypeRank::Number
            }
            Value::Timestamp(_) => TypeRank::Timestamp,
            Value::LogicalTimestamp(_) => TypeRank::LogicalTimestamp,
            Value::String(_) => TypeRank::String,
            Value::Bytes(_) => TypeRank::Bytes,
            Value::Binary(_) => TypeRank::Binary,
            Value::Reference(_) => TypeRank::Reference,
            Value::ObjectId(_) => TypeRank::ObjectId,
            Value::GeoPoint(_) => TypeRank::GeoPoint,
            Value::Regex(_) => TypeRank::Regex,
            Value::Array(_) => TypeRank::Array,
            Value::Vector(_) => TypeRank::Vector,
            Value::Map(_) => TypeRank::Map,
            Value::MaxKey => TypeRank::MaxKey,
        }
    }

    /// Variant name as it appears in wire-facing error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::MinKey => "minKey",
            Value::MaxKey => "maxKey",
            Value::Bool(_) => "boolean",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Double(_) => "double",
            Value::Decimal128(_) => "decimal128",
            Value::Timestamp(_) => "timestamp",
            Value::LogicalTimestamp(_) => "logicalTimestamp",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Binary(_) => "binary",
            Value::Reference(_) => "reference",
            Value::ObjectId(_) => "objectId",
            Value::GeoPoint(_) => "geoPoint",
            Value::Regex(_) => "regex",
            Value::Array(_) => "array",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int32(_) | Value::Int64(_) | Value::Double(_) | Value::Decimal128(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; `Int32` widens losslessly.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(i) => Some(i64::from(*i)),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Floating view over the fixed-width numerics (`Int64` above 2^53
    /// rounds).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(i) => Some(f64::from(*i)),
            Value::Int64(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ResourcePath> {
        match self {
            Value::Reference(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

// === Conversions ===

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<ResourcePath> for Value {
    fn from(v: ResourcePath) -> Self {
        Value::Reference(Box::new(v))
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<GeoPoint> for Value {
    fn from(v: GeoPoint) -> Self {
        Value::GeoPoint(v)
    }
}

// === Ordering ===

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        compare_values(self, other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_values(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::MinKey => f.write_str("minKey"),
            Value::MaxKey => f.write_str("maxKey"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Decimal128(d) => write!(f, "decimal128({})", d.as_str()),
            Value::Timestamp(t) => write!(f, "timestamp({}.{:09})", t.seconds, t.nanos),
            Value::LogicalTimestamp(t) => {
                write!(f, "logicalTimestamp({}, {})", t.seconds, t.increment)
            }
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "bytes(len {})", b.len()),
            Value::Binary(b) => write!(f, "binary(subtype {}, len {})", b.subtype, b.bytes.len()),
            Value::Reference(path) => write!(f, "{path}"),
            Value::ObjectId(o) => write!(f, "objectId({})", o.as_str()),
            Value::GeoPoint(g) => write!(f, "geo({}, {})", g.latitude, g.longitude),
            Value::Regex(r) => write!(f, "/{}/{}", r.pattern, r.options),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Vector(v) => write!(f, "vector(len {})", v.len()),
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order_is_fixed() {
        assert!(TypeRank::Null < TypeRank::Bool);
        assert!(TypeRank::Bool < TypeRank::Number);
        assert!(TypeRank::Number < TypeRank::Timestamp);
        assert!(TypeRank::Timestamp < TypeRank::LogicalTimestamp);
        assert!(TypeRank::LogicalTimestamp < TypeRank::String);
        assert!(TypeRank::String < TypeRank::Bytes);
        assert!(TypeRank::Bytes < TypeRank::Binary);
        assert!(TypeRank::Binary < TypeRank::Reference);
        assert!(TypeRank::Reference < TypeRank::ObjectId);
        assert!(TypeRank::ObjectId < TypeRank::GeoPoint);
        assert!(TypeRank::GeoPoint < TypeRank::Regex);
        assert!(TypeRank::Regex < TypeRank::Array);
        assert!(TypeRank::Array < TypeRank::Vector);
        assert!(TypeRank::Vector < TypeRank::Map);
        assert!(TypeRank::Map < TypeRank::MaxKey);
    }

    #[test]
    fn test_sentinels_share_and_own_ranks() {
        assert_eq!(Value::Null.type_rank(), TypeRank::Null);
        assert_eq!(Value::MinKey.type_rank(), TypeRank::Null);
        assert_eq!(Value::MaxKey.type_rank(), TypeRank::MaxKey);
    }

    #[test]
    fn test_numeric_widths_share_a_rank() {
        let values = [
            Value::Int32(1),
            Value::Int64(1),
            Value::Double(1.0),
            Value::Decimal128(Decimal128::new("1")),
        ];
        for value in &values {
            assert_eq!(value.type_rank(), TypeRank::Number);
            assert!(value.is_numeric());
        }
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int32(5).as_i64(), Some(5));
        assert_eq!(Value::Int64(5).as_f64(), Some(5.0));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Null.as_i64(), None);
        let arr = Value::from(vec![Value::Int64(1)]);
        assert_eq!(arr.as_array().map(<[Value]>::len), Some(1));
    }

    #[test]
    fn test_comparator_equality() {
        assert_eq!(Value::Int64(1), Value::Double(1.0));
        assert_eq!(Value::Null, Value::MinKey);
        assert_ne!(Value::Null, Value::MaxKey);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(
            Value::Array(vec![Value::Int64(1), Value::Bool(false)]).to_string(),
            "[1, false]"
        );
        assert_eq!(
            Value::Map(vec![("a".to_string(), Value::Int64(1))]).to_string(),
            "{a: 1}"
        );
    }
}
