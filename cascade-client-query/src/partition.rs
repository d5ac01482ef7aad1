//! Partition boundaries and range splitting.
//!
//! A partition query returns split points in a collection-group
//! keyspace as bare cursor fragments. Turning those fragments into
//! usable ranges is the client's job: sort the boundaries under value
//! order and chain them into N+1 contiguous ranges where each interior
//! boundary closes one range and opens the next.
//!
//! Boundary values arrive as wire records and are classified without
//! narrowing: a 64-bit integer boundary keeps all of its bits, since a
//! float intermediate would silently shift range edges.

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::debug;

use cascade_client_core::wire::WireValue;
use cascade_client_core::{classify, compare_values, Value};

use crate::cursor::Cursor;
use crate::error::Result;

/// One contiguous sub-range of a partitioned query.
///
/// `start_at = None` means the range is unbounded below, `end_before =
/// None` unbounded above. Both bounds carry `before = true`: a range
/// covers `[start_at, end_before)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionRange {
    pub start_at: Option<Cursor>,
    pub end_before: Option<Cursor>,
}

/// Sorts raw boundaries and chains them into N+1 contiguous ranges.
///
/// The backend guarantees boundary uniqueness, so no deduplication
/// happens here. The first range has no lower bound and the last no
/// upper bound; each interior boundary is the upper bound of one range
/// and the lower bound of the next.
pub fn split_into_ranges(mut boundaries: Vec<Vec<Value>>) -> Vec<PartitionRange> {
    boundaries.sort_by(|a, b| cmp_boundary(a, b));
    debug!(
        boundaries = boundaries.len(),
        ranges = boundaries.len() + 1,
        "splitting partition boundaries"
    );
    let mut ranges = Vec::with_capacity(boundaries.len() + 1);
    let mut lower: Option<Cursor> = None;
    for boundary in boundaries {
        let cursor = Cursor::new(boundary, true);
        ranges.push(PartitionRange {
            start_at: lower.take(),
            end_before: Some(cursor.clone()),
        });
        lower = Some(cursor);
    }
    ranges.push(PartitionRange {
        start_at: lower,
        end_before: None,
    });
    ranges
}

/// Boundaries compare element-wise under value order; a shorter
/// boundary that prefixes a longer one sorts first.
fn cmp_boundary(a: &[Value], b: &[Value]) -> Ordering {
    for (left, right) in a.iter().zip(b.iter()) {
        let ord = compare_values(left, right);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

// === Wire shapes ===

/// One fragment of a partition-query response stream: split-point
/// values only, no `before` flag.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WirePartitionFragment {
    #[serde(default)]
    pub values: Vec<WireValue>,
}

/// Classifies a stream of wire fragments and splits them into ranges.
pub fn from_wire_fragments(fragments: Vec<WirePartitionFragment>) -> Result<Vec<PartitionRange>> {
    let mut boundaries = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let mut values = Vec::with_capacity(fragment.values.len());
        for value in fragment.values {
            values.push(classify(value)?);
        }
        boundaries.push(values);
    }
    Ok(split_into_ranges(boundaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_client_core::ResourcePath;

    fn reference(relative: &str) -> Value {
        let path = ResourcePath::root("p", "(default)").append(relative).unwrap();
        Value::Reference(Box::new(path))
    }

    #[test]
    fn test_no_boundaries_yields_one_unbounded_range() {
        let ranges = split_into_ranges(vec![]);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start_at, None);
        assert_eq!(ranges[0].end_before, None);
    }

    #[test]
    fn test_ranges_chain_contiguously() {
        let ranges = split_into_ranges(vec![
            vec![reference("rooms/c/messages/m")],
            vec![reference("rooms/a/messages/m")],
            vec![reference("rooms/b/messages/m")],
        ]);
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[0].start_at, None);
        assert_eq!(ranges[3].end_before, None);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end_before, pair[1].start_at);
        }
        // Sorted by path, regardless of arrival order.
        let uppers: Vec<&Cursor> = ranges[..3]
            .iter()
            .map(|r| r.end_before.as_ref().unwrap())
            .collect();
        assert_eq!(uppers[0].values[0], reference("rooms/a/messages/m"));
        assert_eq!(uppers[1].values[0], reference("rooms/b/messages/m"));
        assert_eq!(uppers[2].values[0], reference("rooms/c/messages/m"));
        assert!(uppers.iter().all(|c| c.before));
    }

    #[test]
    fn test_prefix_boundary_sorts_first() {
        let ranges = split_into_ranges(vec![
            vec![reference("rooms/a/messages/m"), Value::Int64(2)],
            vec![reference("rooms/a/messages/m")],
        ]);
        let first = ranges[0].end_before.as_ref().unwrap();
        assert_eq!(first.values.len(), 1);
    }

    fn exact_i64(value: &Value) -> i64 {
        match value {
            Value::Int64(v) => *v,
            other => panic!("expected Int64, got {other:?}"),
        }
    }

    #[test]
    fn test_large_integers_survive_the_split() {
        // 2^53 + 1 has no exact 64-bit float representation, so a
        // comparator-level equality check could not detect narrowing;
        // assert on the raw bits instead.
        let big = (1_i64 << 53) + 1;
        let ranges = split_into_ranges(vec![vec![Value::Int64(big)]]);
        assert_eq!(
            exact_i64(&ranges[0].end_before.as_ref().unwrap().values[0]),
            big
        );
        assert_eq!(
            exact_i64(&ranges[1].start_at.as_ref().unwrap().values[0]),
            big
        );
    }

    #[test]
    fn test_wire_fragments_classify_and_split() {
        let fragments: Vec<WirePartitionFragment> = serde_json::from_str(
            r#"[
                {"values": [{"referenceValue":
                    "projects/p/databases/(default)/documents/rooms/b/messages/m"}]},
                {"values": [{"referenceValue":
                    "projects/p/databases/(default)/documents/rooms/a/messages/m"}]}
            ]"#,
        )
        .unwrap();
        let ranges = from_wire_fragments(fragments).unwrap();
        assert_eq!(ranges.len(), 3);
        let first_upper = ranges[0].end_before.as_ref().unwrap();
        assert_eq!(first_upper.values[0], reference("rooms/a/messages/m"));
    }

    #[test]
    fn test_wire_integer_boundary_keeps_precision() {
        let fragments: Vec<WirePartitionFragment> =
            serde_json::from_str(r#"[{"values": [{"integerValue": "9007199254740993"}]}]"#)
                .unwrap();
        let ranges = from_wire_fragments(fragments).unwrap();
        assert_eq!(
            exact_i64(&ranges[0].end_before.as_ref().unwrap().values[0]),
            9007199254740993
        );
    }
}
