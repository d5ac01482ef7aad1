//! Core value model and ordering for the Cascade document database
//! client.
//!
//! Everything here is pure and synchronous: wire records classify into
//! [`Value`]s, values order under one backend-faithful total order, and
//! the query layer builds cursors and partitions on top. The comparator
//! must reproduce the server's ordering exactly; range queries,
//! pagination cursors, and client-side resorts all ride on it.
//!
//! # Example
//!
//! ```
//! use cascade_client_core::{classify_json, Value};
//! use serde_json::json;
//!
//! let value = classify_json(json!({"integerValue": "42"}))?;
//! assert_eq!(value, Value::Int64(42));
//! assert!(value < Value::from("any string"));
//! # Ok::<(), cascade_client_core::Error>(())
//! ```

pub mod compare;
pub mod error;
pub mod numeric;
pub mod path;
pub mod text_order;
pub mod value;
pub mod wire;

pub use compare::compare_values;
pub use error::{Error, Result};
pub use numeric::compare_numeric;
pub use path::{FieldPath, ResourcePath, DEFAULT_DATABASE, DOCUMENT_KEY_FIELD, PROJECT_PLACEHOLDER};
pub use text_order::compare_utf8_order;
pub use value::{
    BinaryData, Decimal128, GeoPoint, LogicalTimestamp, ObjectId, Regex, Timestamp, TypeRank,
    Value,
};
pub use wire::{classify, classify_json, classify_json_str, WireValue};

/// Common imports for working with the value model.
pub mod prelude {
    pub use crate::compare::compare_values;
    pub use crate::error::{Error, Result};
    pub use crate::path::{FieldPath, ResourcePath};
    pub use crate::value::{TypeRank, Value};
    pub use crate::wire::{classify, classify_json};
}
