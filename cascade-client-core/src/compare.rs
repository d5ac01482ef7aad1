//! Recursive total order over [`Value`].
//!
//! Rank decides first; equal ranks fall through to variant rules. The
//! public entry point is total over every variant pairing, which is what
//! lets `Value` implement `Ord` and back range cursors, client-side
//! resorts, and partition ordering with one comparator.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::numeric::{cmp_doubles, compare_numeric};
use crate::text_order::compare_utf8_order;
use crate::value::Value;

/// Compares two values in the backend's total order.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let rank = a.type_rank().cmp(&b.type_rank());
    if rank != Ordering::Equal {
        return rank;
    }
    match cmp_same_rank(a, b) {
        Ok(ord) => ord,
        Err(err) => {
            // Ranks already matched, so the mismatch arm below is
            // unreachable unless the rank table and this match disagree.
            debug_assert!(false, "comparator defect: {err}");
            Ordering::Equal
        }
    }
}

/// Variant-specific comparison for equal-ranked values. The catch-all
/// arm is the `ComparisonTypeMismatch` invariant check.
pub(crate) fn cmp_same_rank(a: &Value, b: &Value) -> Result<Ordering> {
    use Value::*;
    let ord = match (a, b) {
        // Null and the min sentinel share a rank and are interchangeable
        // for ordering.
        (Null | MinKey, Null | MinKey) => Ordering::Equal,
        (MaxKey, MaxKey) => Ordering::Equal,
        (Bool(x), Bool(y)) => x.cmp(y),
        _ if a.is_numeric() && b.is_numeric() => compare_numeric(a, b)
            .ok_or_else(|| Error::type_mismatch(a.type_name(), b.type_name()))?,
        (Timestamp(x), Timestamp(y)) => x.cmp(y),
        (LogicalTimestamp(x), LogicalTimestamp(y)) => x.cmp(y),
        (String(x), String(y)) => compare_utf8_order(x, y),
        (Bytes(x), Bytes(y)) => x.as_slice().cmp(y.as_slice()),
        // Subtype is metadata, not sort key: payloads with equal bytes
        // but different subtypes compare equal. This matches the server
        // comparator; changing it locally would corrupt pagination.
        (Binary(x), Binary(y)) => x.bytes.as_slice().cmp(y.bytes.as_slice()),
        (Reference(x), Reference(y)) => x.cmp(y),
        (ObjectId(x), ObjectId(y)) => compare_utf8_order(x.as_str(), y.as_str()),
        (GeoPoint(x), GeoPoint(y)) => cmp_doubles(x.latitude, y.latitude)
            .then_with(|| cmp_doubles(x.longitude, y.longitude)),
        (Regex(x), Regex(y)) => compare_utf8_order(&x.pattern, &y.pattern)
            .then_with(|| compare_utf8_order(&x.options, &y.options)),
        (Array(x), Array(y)) => cmp_arrays(x, y),
        (Vector(x), Vector(y)) => cmp_vectors(x, y),
        (Map(x), Map(y)) => cmp_maps(x, y),
        _ => return Err(Error::type_mismatch(a.type_name(), b.type_name())),
    };
    Ok(ord)
}

fn cmp_arrays(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = compare_values(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

// Backend vector order is length-first, unlike arrays.
fn cmp_vectors(a: &[f64], b: &[f64]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        for (x, y) in a.iter().zip(b.iter()) {
            let ord = cmp_doubles(*x, *y);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    })
}

/// Sorted-key comparison: key text decides before the matched values,
/// and a map whose sorted keys are a prefix of the other's sorts first.
fn cmp_maps(a: &[(String, Value)], b: &[(String, Value)]) -> Ordering {
    let mut left: Vec<&(String, Value)> = a.iter().collect();
    let mut right: Vec<&(String, Value)> = b.iter().collect();
    left.sort_by(|x, y| compare_utf8_order(&x.0, &y.0));
    right.sort_by(|x, y| compare_utf8_order(&x.0, &y.0));

    for (x, y) in left.iter().zip(right.iter()) {
        let ord = compare_utf8_order(&x.0, &y.0);
        if ord != Ordering::Equal {
            return ord;
        }
        let ord = compare_values(&x.1, &y.1);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}
