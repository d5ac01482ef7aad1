//! Query-side ordering, cursors, and partitions for the Cascade
//! client.
//!
//! Builds on the core value model: [`OrderingSpec`] resolves the
//! implied tiebreakers of a range query, [`CursorBuilder`] turns
//! documents or explicit values into boundary cursors,
//! [`DocumentComparator`] re-sorts result documents exactly as the
//! backend would, and [`split_into_ranges`] chains partition
//! boundaries into contiguous sub-ranges. Everything here is pure and
//! synchronous; the transport layer that issues the underlying
//! requests lives elsewhere.

pub mod cursor;
pub mod doc_order;
pub mod document;
pub mod error;
pub mod order;
pub mod partition;

pub use cursor::{Cursor, CursorBuilder, QueryScope, WireCursor};
pub use doc_order::DocumentComparator;
pub use document::Document;
pub use error::{QueryError, Result};
pub use order::{Direction, FieldOrder, OrderingSpec, WireFieldOrder};
pub use partition::{
    from_wire_fragments, split_into_ranges, PartitionRange, WirePartitionFragment,
};

/// Common imports for building and ordering queries.
pub mod prelude {
    pub use crate::cursor::{Cursor, CursorBuilder, QueryScope};
    pub use crate::doc_order::DocumentComparator;
    pub use crate::document::Document;
    pub use crate::error::{QueryError, Result};
    pub use crate::order::{Direction, FieldOrder, OrderingSpec};
    pub use crate::partition::{split_into_ranges, PartitionRange};
}
