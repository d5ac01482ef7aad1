//! Ordering specifications and implicit-ordering resolution.
//!
//! A query's result order must be fully determined before cursors can
//! bound it. Callers spell out explicit orders; inequality filters and
//! the document-key tiebreak are implied, and [`OrderingSpec::resolve`]
//! completes the list the same way the backend does.

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::debug;

use cascade_client_core::FieldPath;

use crate::error::Result;

/// Sort direction for one ordered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Applies the direction to an ascending comparison result.
    #[inline]
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// One (field, direction) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOrder {
    pub field: FieldPath,
    pub direction: Direction,
}

impl FieldOrder {
    pub fn new(field: FieldPath, direction: Direction) -> Self {
        FieldOrder { field, direction }
    }

    /// Ascending order on a field.
    pub fn asc(field: FieldPath) -> Self {
        FieldOrder::new(field, Direction::Ascending)
    }

    /// Descending order on a field.
    pub fn desc(field: FieldPath) -> Self {
        FieldOrder::new(field, Direction::Descending)
    }
}

/// The fully determined ordering: explicit orders, implied inequality
/// tiebreakers, and the trailing document-key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderingSpec {
    orders: Vec<FieldOrder>,
}

impl OrderingSpec {
    /// Ordering from an already-complete list. `resolve` is the normal
    /// entry point; this exists for callers that carry a resolved list
    /// across the wire.
    pub fn new(orders: Vec<FieldOrder>) -> Self {
        OrderingSpec { orders }
    }

    /// Resolves the effective ordering from explicit orders and the
    /// inequality-filtered fields.
    ///
    /// Inequality fields not already ordered are appended in
    /// lexicographic path order, each with the inherited direction (the
    /// last explicit direction, or ascending); the document-key order is
    /// appended last with that same direction unless already present.
    pub fn resolve(explicit: &[FieldOrder], inequality_fields: &[FieldPath]) -> OrderingSpec {
        let mut orders: Vec<FieldOrder> = explicit.to_vec();
        let inherited = explicit
            .last()
            .map(|order| order.direction)
            .unwrap_or(Direction::Ascending);

        let mut implied: Vec<&FieldPath> = inequality_fields
            .iter()
            .filter(|field| !field.is_document_key())
            .filter(|field| !orders.iter().any(|order| &order.field == *field))
            .collect();
        implied.sort();
        implied.dedup();
        for field in implied {
            orders.push(FieldOrder::new(field.clone(), inherited));
        }

        if !orders.iter().any(|order| order.field.is_document_key()) {
            orders.push(FieldOrder::new(FieldPath::document_key(), inherited));
        }

        debug!(fields = orders.len(), "resolved effective ordering");
        OrderingSpec { orders }
    }

    pub fn orders(&self) -> &[FieldOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Every direction flipped. Used to run a reversed range query for
    /// last-N results, which are then re-sorted client-side.
    pub fn reversed(&self) -> OrderingSpec {
        OrderingSpec {
            orders: self
                .orders
                .iter()
                .map(|order| FieldOrder::new(order.field.clone(), order.direction.reversed()))
                .collect(),
        }
    }
}

// === Wire shapes ===

/// Wire shape of one ordering clause.
#[derive(Clone, Debug, Deserialize)]
pub struct WireFieldOrder {
    pub field: WireFieldReference,
    pub direction: WireDirection,
}

/// Wire shape of a field reference.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFieldReference {
    pub field_path: String,
}

/// Wire direction strings.
#[derive(Clone, Copy, Debug, Deserialize)]
pub enum WireDirection {
    #[serde(rename = "ASCENDING")]
    Ascending,
    #[serde(rename = "DESCENDING")]
    Descending,
}

impl WireFieldOrder {
    /// Converts the wire clause into a typed [`FieldOrder`].
    pub fn into_field_order(self) -> Result<FieldOrder> {
        let field = FieldPath::parse(&self.field.field_path)?;
        let direction = match self.direction {
            WireDirection::Ascending => Direction::Ascending,
            WireDirection::Descending => Direction::Descending,
        };
        Ok(FieldOrder::new(field, direction))
    }
}
