//! Backend wire records and their classification into [`Value`]s.
//!
//! A wire value is externally tagged: exactly one variant field is
//! populated (`nullValue`, `integerValue`, `mapValue`, ...). Extension
//! variants ride inside `mapValue` under reserved keys; [`classify`]
//! unwraps them by consulting a single ordered key table, and anything
//! that matches no known shape is a hard [`Error::UnrecognizedValueShape`]
//! rather than a defaulted value.
//!
//! This layer only consumes: the transport collaborator owns encoding.

use std::fmt;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::path::ResourcePath;
use crate::value::{
    BinaryData, Decimal128, GeoPoint, LogicalTimestamp, ObjectId, Regex, Timestamp, Value,
};

// === Reserved extension keys ===

pub const KEY_MIN: &str = "__min__";
pub const KEY_MAX: &str = "__max__";
pub const KEY_INT32: &str = "__int__";
pub const KEY_DECIMAL128: &str = "__decimal128__";
pub const KEY_OBJECT_ID: &str = "__oid__";
pub const KEY_LOGICAL_TIMESTAMP: &str = "__timestamp__";
pub const KEY_BINARY: &str = "__binary__";
pub const KEY_REGEX: &str = "__regex__";
pub const KEY_VECTOR_TYPE: &str = "__type__";
pub const KEY_VECTOR_VALUE: &str = "value";
pub const VECTOR_TYPE_NAME: &str = "__vector__";

#[derive(Clone, Copy, Debug)]
enum ExtensionKind {
    MinKey,
    MaxKey,
    Int32,
    Decimal128,
    ObjectId,
    LogicalTimestamp,
    Binary,
    Regex,
}

/// Extension variants detectable from a single reserved map key, in
/// detection order. Adding a variant is one row here plus one payload
/// arm in [`classify_reserved`].
const EXTENSION_KEYS: &[(&str, ExtensionKind)] = &[
    (KEY_MIN, ExtensionKind::MinKey),
    (KEY_MAX, ExtensionKind::MaxKey),
    (KEY_INT32, ExtensionKind::Int32),
    (KEY_DECIMAL128, ExtensionKind::Decimal128),
    (KEY_OBJECT_ID, ExtensionKind::ObjectId),
    (KEY_LOGICAL_TIMESTAMP, ExtensionKind::LogicalTimestamp),
    (KEY_BINARY, ExtensionKind::Binary),
    (KEY_REGEX, ExtensionKind::Regex),
];

// === Wire records ===

/// One backend value record: exactly one populated variant field.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(WireInt64),
    DoubleValue(WireDouble),
    TimestampValue(WireTimestamp),
    StringValue(String),
    BytesValue(WireBytes),
    ReferenceValue(String),
    GeoPointValue(WireGeoPoint),
    ArrayValue(WireArray),
    MapValue(WireMap),
}

impl WireValue {
    /// Wire field name of the populated variant.
    pub fn field_name(&self) -> &'static str {
        match self {
            WireValue::NullValue(_) => "nullValue",
            WireValue::BooleanValue(_) => "booleanValue",
            WireValue::IntegerValue(_) => "integerValue",
            WireValue::DoubleValue(_) => "doubleValue",
            WireValue::TimestampValue(_) => "timestampValue",
            WireValue::StringValue(_) => "stringValue",
            WireValue::BytesValue(_) => "bytesValue",
            WireValue::ReferenceValue(_) => "referenceValue",
            WireValue::GeoPointValue(_) => "geoPointValue",
            WireValue::ArrayValue(_) => "arrayValue",
            WireValue::MapValue(_) => "mapValue",
        }
    }
}

/// Int64 wire field. Proto JSON carries 64-bit integers as decimal
/// strings; plain numbers are accepted too.
#[derive(Clone, Copy, Debug, Default)]
pub struct WireInt64(pub i64);

impl<'de> Deserialize<'de> for WireInt64 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Int64Visitor;

        impl Visitor<'_> for Int64Visitor {
            type Value = WireInt64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a decimal string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<WireInt64, E> {
                Ok(WireInt64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<WireInt64, E> {
                i64::try_from(v)
                    .map(WireInt64)
                    .map_err(|_| E::custom("integer out of i64 range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<WireInt64, E> {
                v.parse::<i64>()
                    .map(WireInt64)
                    .map_err(|_| E::custom(format!("invalid int64 literal {v:?}")))
            }
        }

        deserializer.deserialize_any(Int64Visitor)
    }
}

/// Double wire field. Accepts numbers, integers, and the literals
/// `"NaN"`, `"Infinity"`, `"-Infinity"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WireDouble(pub f64);

impl<'de> Deserialize<'de> for WireDouble {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DoubleVisitor;

        impl Visitor<'_> for DoubleVisitor {
            type Value = WireDouble;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a float literal string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<WireDouble, E> {
                Ok(WireDouble(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<WireDouble, E> {
                Ok(WireDouble(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<WireDouble, E> {
                Ok(WireDouble(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<WireDouble, E> {
                match v {
                    "NaN" => Ok(WireDouble(f64::NAN)),
                    "Infinity" => Ok(WireDouble(f64::INFINITY)),
                    "-Infinity" => Ok(WireDouble(f64::NEG_INFINITY)),
                    _ => Err(E::custom(format!("invalid double literal {v:?}"))),
                }
            }
        }

        deserializer.deserialize_any(DoubleVisitor)
    }
}

/// `timestampValue` payload; zero fields are omitted on the wire.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireTimestamp {
    pub seconds: WireInt64,
    pub nanos: i32,
}

/// Base64-encoded bytes field (standard alphabet, padded or not).
#[derive(Clone, Debug, Default)]
pub struct WireBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for WireBytes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BytesVisitor;

        impl Visitor<'_> for BytesVisitor {
            type Value = WireBytes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a base64 string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<WireBytes, E> {
                STANDARD
                    .decode(v)
                    .or_else(|_| STANDARD_NO_PAD.decode(v))
                    .map(WireBytes)
                    .map_err(|err| E::custom(format!("invalid base64: {err}")))
            }
        }

        deserializer.deserialize_str(BytesVisitor)
    }
}

/// `geoPointValue` payload; zero coordinates are omitted on the wire.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireGeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// `arrayValue` payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WireArray {
    #[serde(default)]
    pub values: Vec<WireValue>,
}

/// `mapValue` payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WireMap {
    #[serde(default)]
    pub fields: WireFields,
}

/// Map fields in wire order. Order is preserved because it is the
/// storage order of [`Value::Map`].
#[derive(Clone, Debug, Default)]
pub struct WireFields(pub Vec<(String, WireValue)>);

impl<'de> Deserialize<'de> for WireFields {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = WireFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<WireFields, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, WireValue>()? {
                    entries.push((name, value));
                }
                Ok(WireFields(entries))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

// === Classification ===

/// Converts a wire record into a [`Value`].
///
/// Total over well-formed backend output; anything else surfaces as
/// [`Error::UnrecognizedValueShape`] (or [`Error::InvalidPath`] for a
/// malformed `referenceValue`).
pub fn classify(wire: WireValue) -> Result<Value> {
    match wire {
        WireValue::NullValue(()) => Ok(Value::Null),
        WireValue::BooleanValue(b) => Ok(Value::Bool(b)),
        WireValue::IntegerValue(i) => Ok(Value::Int64(i.0)),
        WireValue::DoubleValue(d) => Ok(Value::Double(d.0)),
        WireValue::TimestampValue(ts) => {
            Ok(Value::Timestamp(Timestamp::new(ts.seconds.0, ts.nanos)))
        }
        WireValue::StringValue(s) => Ok(Value::String(s)),
        WireValue::BytesValue(b) => Ok(Value::Bytes(b.0)),
        WireValue::ReferenceValue(raw) => {
            Ok(Value::Reference(Box::new(ResourcePath::parse(&raw)?)))
        }
        WireValue::GeoPointValue(g) => Ok(Value::GeoPoint(GeoPoint::new(g.latitude, g.longitude))),
        WireValue::ArrayValue(array) => {
            let mut values = Vec::with_capacity(array.values.len());
            for value in array.values {
                values.push(classify(value)?);
            }
            Ok(Value::Array(values))
        }
        WireValue::MapValue(map) => classify_map(map.fields.0),
    }
}

/// Classifies a JSON value record.
///
/// A record that deserializes into no known variant field is an
/// unrecognized shape, not a JSON error.
pub fn classify_json(raw: serde_json::Value) -> Result<Value> {
    let wire: WireValue = serde_json::from_value(raw)
        .map_err(|err| Error::shape(format!("not a value record: {err}")))?;
    classify(wire)
}

/// Classifies a JSON string. Malformed JSON text is a [`Error::Json`];
/// well-formed JSON of the wrong shape is an unrecognized shape.
pub fn classify_json_str(raw: &str) -> Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(raw)?;
    classify_json(parsed)
}

fn classify_map(fields: Vec<(String, WireValue)>) -> Result<Value> {
    if let Some(extension) = classify_extension(&fields)? {
        return Ok(extension);
    }
    let mut entries = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        entries.push((name, classify(value)?));
    }
    Ok(Value::Map(entries))
}

/// Extension detection: single-entry reserved keys, or the two-entry
/// vector shape. `Ok(None)` means an ordinary map.
fn classify_extension(fields: &[(String, WireValue)]) -> Result<Option<Value>> {
    match fields {
        [(key, payload)] => {
            for (reserved, kind) in EXTENSION_KEYS {
                if key == reserved {
                    return classify_reserved(*kind, key, payload).map(Some);
                }
            }
            Ok(None)
        }
        [first, second] => classify_vector_shape(first, second),
        _ => Ok(None),
    }
}

fn classify_reserved(kind: ExtensionKind, key: &str, payload: &WireValue) -> Result<Value> {
    match (kind, payload) {
        (ExtensionKind::MinKey, WireValue::NullValue(())) => Ok(Value::MinKey),
        (ExtensionKind::MaxKey, WireValue::NullValue(())) => Ok(Value::MaxKey),
        (ExtensionKind::Int32, WireValue::IntegerValue(i)) => i32::try_from(i.0)
            .map(Value::Int32)
            .map_err(|_| Error::shape(format!("{key} payload {} outside i32 range", i.0))),
        (ExtensionKind::Decimal128, WireValue::StringValue(s)) => {
            Ok(Value::Decimal128(Decimal128::new(s.clone())))
        }
        (ExtensionKind::ObjectId, WireValue::StringValue(s)) => {
            Ok(Value::ObjectId(ObjectId::new(s.clone())))
        }
        (ExtensionKind::LogicalTimestamp, WireValue::MapValue(map)) => {
            classify_logical_timestamp(&map.fields.0)
        }
        (ExtensionKind::Binary, WireValue::BytesValue(bytes)) => match bytes.0.split_first() {
            Some((subtype, payload)) => {
                Ok(Value::Binary(BinaryData::new(*subtype, payload.to_vec())))
            }
            None => Err(Error::shape(format!(
                "{key} payload is empty; the subtype byte is mandatory"
            ))),
        },
        (ExtensionKind::Regex, WireValue::MapValue(map)) => classify_regex(&map.fields.0),
        _ => Err(Error::shape(format!(
            "reserved key {key} with {} payload",
            payload.field_name()
        ))),
    }
}

fn classify_logical_timestamp(fields: &[(String, WireValue)]) -> Result<Value> {
    let mut seconds = None;
    let mut increment = None;
    for (name, value) in fields {
        match (name.as_str(), value) {
            ("seconds", WireValue::IntegerValue(i)) => seconds = Some(i.0),
            ("increment", WireValue::IntegerValue(i)) => increment = Some(i.0),
            _ => {
                return Err(Error::shape(format!(
                    "unexpected field {name:?} in {KEY_LOGICAL_TIMESTAMP} payload"
                )))
            }
        }
    }
    match (seconds, increment) {
        (Some(seconds), Some(increment)) => Ok(Value::LogicalTimestamp(LogicalTimestamp::new(
            seconds, increment,
        ))),
        _ => Err(Error::shape(format!(
            "{KEY_LOGICAL_TIMESTAMP} payload requires seconds and increment"
        ))),
    }
}

fn classify_regex(fields: &[(String, WireValue)]) -> Result<Value> {
    let mut pattern = None;
    let mut options = None;
    for (name, value) in fields {
        match (name.as_str(), value) {
            ("pattern", WireValue::StringValue(s)) => pattern = Some(s.clone()),
            ("options", WireValue::StringValue(s)) => options = Some(s.clone()),
            _ => {
                return Err(Error::shape(format!(
                    "unexpected field {name:?} in {KEY_REGEX} payload"
                )))
            }
        }
    }
    match (pattern, options) {
        (Some(pattern), Some(options)) => Ok(Value::Regex(Regex::new(pattern, options))),
        _ => Err(Error::shape(format!(
            "{KEY_REGEX} payload requires pattern and options"
        ))),
    }
}

fn classify_vector_shape(
    first: &(String, WireValue),
    second: &(String, WireValue),
) -> Result<Option<Value>> {
    let (type_field, value_field) = match (first.0.as_str(), second.0.as_str()) {
        (KEY_VECTOR_TYPE, KEY_VECTOR_VALUE) => (&first.1, &second.1),
        (KEY_VECTOR_VALUE, KEY_VECTOR_TYPE) => (&second.1, &first.1),
        _ => return Ok(None),
    };
    let WireValue::StringValue(type_name) = type_field else {
        return Ok(None);
    };
    if type_name != VECTOR_TYPE_NAME {
        // A user map may legitimately carry a __type__ key.
        return Ok(None);
    }
    let WireValue::ArrayValue(array) = value_field else {
        return Err(Error::shape(format!(
            "{VECTOR_TYPE_NAME} value payload must be an array of numbers"
        )));
    };
    let mut elements = Vec::with_capacity(array.values.len());
    for value in &array.values {
        match value {
            WireValue::DoubleValue(d) => elements.push(d.0),
            WireValue::IntegerValue(i) => elements.push(i.0 as f64),
            other => {
                return Err(Error::shape(format!(
                    "{VECTOR_TYPE_NAME} element has {} payload, expected a number",
                    other.field_name()
                )))
            }
        }
    }
    Ok(Some(Value::Vector(elements)))
}
