//! Client-side document ordering.
//!
//! Streams that get re-sorted on the client (watch snapshots, merged
//! partition reads) must agree exactly with the backend's result
//! order. The comparator walks the resolved ordering, comparing data
//! fields through the value comparator and the key position through
//! path order, flipping the sign for descending fields.

use std::cmp::Ordering;

use tracing::debug;

use cascade_client_core::{compare_values, FieldPath, Value};

use crate::document::Document;
use crate::error::{QueryError, Result};
use crate::order::OrderingSpec;

/// Orders documents under a resolved [`OrderingSpec`].
pub struct DocumentComparator<'a> {
    ordering: &'a OrderingSpec,
}

impl<'a> DocumentComparator<'a> {
    pub fn new(ordering: &'a OrderingSpec) -> Self {
        DocumentComparator { ordering }
    }

    /// Compares two documents field by field; the first difference
    /// wins. Every ordered field must be present in both documents: a
    /// projection that drops an ordered field makes results
    /// unsortable.
    pub fn compare(&self, a: &Document, b: &Document) -> Result<Ordering> {
        for order in self.ordering.orders() {
            let ord = if order.field.is_document_key() {
                a.path().cmp(b.path())
            } else {
                let left = self.ordered_field(a, &order.field)?;
                let right = self.ordered_field(b, &order.field)?;
                compare_values(left, right)
            };
            let ord = order.direction.apply(ord);
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Sorts `documents` in place under the ordering.
    ///
    /// Every document is validated up front so the sort itself cannot
    /// fail midway through.
    pub fn sort(&self, documents: &mut [Document]) -> Result<()> {
        for document in documents.iter() {
            self.ensure_orderable(document)?;
        }
        debug!(documents = documents.len(), "sorting documents client-side");
        documents.sort_by(|a, b| self.compare(a, b).unwrap_or(Ordering::Equal));
        Ok(())
    }

    fn ensure_orderable(&self, document: &Document) -> Result<()> {
        for order in self.ordering.orders() {
            if !order.field.is_document_key() && document.field(&order.field).is_none() {
                return Err(QueryError::incomparable_ordering(order.field.to_string()));
            }
        }
        Ok(())
    }

    fn ordered_field<'d>(&self, document: &'d Document, field: &FieldPath) -> Result<&'d Value> {
        document
            .field(field)
            .ok_or_else(|| QueryError::incomparable_ordering(field.to_string()))
    }
}
