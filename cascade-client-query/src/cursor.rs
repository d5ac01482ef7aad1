//! Range cursors and their construction.
//!
//! A cursor bounds one end of a range query: an ordered list of
//! boundary values, one per ordered field (a shorter list binds a
//! prefix), plus the `before` flag. Cursors come from explicit caller
//! values or from a document the result stream already produced;
//! either way the key position must resolve to a document inside the
//! query's scope.

use serde::Deserialize;

use cascade_client_core::wire::WireValue;
use cascade_client_core::{classify, ResourcePath, Value};

use crate::document::Document;
use crate::error::{QueryError, Result};
use crate::order::OrderingSpec;

/// Boundary cursor for a range query.
///
/// `before = true` positions the boundary before the first matching
/// position (inclusive as a lower bound, exclusive as an upper bound);
/// `false` positions it after.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub values: Vec<Value>,
    pub before: bool,
}

impl Cursor {
    pub fn new(values: Vec<Value>, before: bool) -> Self {
        Cursor { values, before }
    }
}

/// The collection scope a query runs against.
#[derive(Clone, Debug)]
pub struct QueryScope {
    parent: ResourcePath,
    all_descendants: bool,
}

impl QueryScope {
    pub fn new(parent: ResourcePath, all_descendants: bool) -> Self {
        QueryScope {
            parent,
            all_descendants,
        }
    }

    /// Scope of a single-collection query: key boundaries must be
    /// direct children of `collection`.
    pub fn collection(collection: ResourcePath) -> Self {
        QueryScope::new(collection, false)
    }

    /// Scope of a collection-group query: key boundaries may live
    /// anywhere at or below `root`.
    pub fn collection_group(root: ResourcePath) -> Self {
        QueryScope::new(root, true)
    }

    pub fn parent(&self) -> &ResourcePath {
        &self.parent
    }

    pub fn all_descendants(&self) -> bool {
        self.all_descendants
    }
}

/// Builds boundary cursors for one resolved ordering and query scope.
pub struct CursorBuilder<'a> {
    ordering: &'a OrderingSpec,
    scope: &'a QueryScope,
}

impl<'a> CursorBuilder<'a> {
    pub fn new(ordering: &'a OrderingSpec, scope: &'a QueryScope) -> Self {
        CursorBuilder { ordering, scope }
    }

    /// Builds a cursor from explicit boundary values, positionally
    /// matched against the ordering.
    pub fn build_from_values(&self, values: Vec<Value>, before: bool) -> Result<Cursor> {
        if values.len() > self.ordering.len() {
            return Err(QueryError::too_many_cursor_values(
                values.len(),
                self.ordering.len(),
            ));
        }
        let mut out = Vec::with_capacity(values.len());
        for (value, order) in values.into_iter().zip(self.ordering.orders()) {
            if order.field.is_document_key() {
                out.push(self.resolve_key_boundary(value)?);
            } else {
                out.push(value);
            }
        }
        Ok(Cursor::new(out, before))
    }

    /// Builds a full-length cursor positioned at `document`: one value
    /// per ordered field, extracted by field path, with the document's
    /// own path at the key position.
    pub fn build_from_document(&self, document: &Document, before: bool) -> Result<Cursor> {
        let mut values = Vec::with_capacity(self.ordering.len());
        for order in self.ordering.orders() {
            if order.field.is_document_key() {
                let path = document.path().clone();
                self.check_key_scope(&path)?;
                values.push(Value::Reference(Box::new(path)));
            } else {
                match document.field(&order.field) {
                    Some(value) => values.push(value.clone()),
                    None => {
                        return Err(QueryError::missing_ordered_field(
                            order.field.to_string(),
                            document.path().to_string(),
                        ))
                    }
                }
            }
        }
        Ok(Cursor::new(values, before))
    }

    /// A key-position value may be a reference or a relative path
    /// string; either way it must name a document inside the scope.
    fn resolve_key_boundary(&self, value: Value) -> Result<Value> {
        let path = match value {
            Value::Reference(path) => *path,
            Value::String(relative) => self
                .scope
                .parent()
                .append(&relative)
                .map_err(|err| QueryError::invalid_key_boundary(err.to_string()))?,
            other => {
                return Err(QueryError::invalid_key_boundary(format!(
                    "expected a reference or relative path at the key position, got {}",
                    other.type_name()
                )))
            }
        };
        self.check_key_scope(&path)?;
        Ok(Value::Reference(Box::new(path)))
    }

    fn check_key_scope(&self, path: &ResourcePath) -> Result<()> {
        if !path.is_document() {
            return Err(QueryError::invalid_key_boundary(format!(
                "{path} does not name a document"
            )));
        }
        if !self.scope.parent().is_prefix_of(path) {
            return Err(QueryError::invalid_key_boundary(format!(
                "{path} is outside the query scope {}",
                self.scope.parent()
            )));
        }
        if !self.scope.all_descendants()
            && path.segments().len() != self.scope.parent().segments().len() + 1
        {
            return Err(QueryError::invalid_key_boundary(format!(
                "{path} is not a direct child of {}",
                self.scope.parent()
            )));
        }
        Ok(())
    }
}

// === Wire shapes ===

/// Wire shape of a cursor; `before` is omitted on the wire when false.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WireCursor {
    #[serde(default)]
    pub values: Vec<WireValue>,
    #[serde(default)]
    pub before: bool,
}

impl WireCursor {
    /// Classifies the wire values into a typed [`Cursor`].
    pub fn into_cursor(self) -> Result<Cursor> {
        let mut values = Vec::with_capacity(self.values.len());
        for value in self.values {
            values.push(classify(value)?);
        }
        Ok(Cursor::new(values, self.before))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{FieldOrder, OrderingSpec};
    use cascade_client_core::FieldPath;

    fn collection() -> ResourcePath {
        ResourcePath::root("p", "(default)").append("rooms").unwrap()
    }

    fn ordering(fields: &[&str]) -> OrderingSpec {
        let explicit: Vec<FieldOrder> = fields
            .iter()
            .map(|raw| FieldOrder::asc(FieldPath::parse(raw).unwrap()))
            .collect();
        OrderingSpec::resolve(&explicit, &[])
    }

    #[test]
    fn test_explicit_values_pass_through() {
        let spec = ordering(&["score"]);
        let scope = QueryScope::collection(collection());
        let cursor = CursorBuilder::new(&spec, &scope)
            .build_from_values(vec![Value::Int64(10)], true)
            .unwrap();
        assert_eq!(cursor.values, vec![Value::Int64(10)]);
        assert!(cursor.before);
    }

    #[test]
    fn test_too_many_values() {
        let spec = ordering(&["score"]);
        let scope = QueryScope::collection(collection());
        let err = CursorBuilder::new(&spec, &scope)
            .build_from_values(
                vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
                true,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::TooManyCursorValues {
                given: 3,
                ordered: 2
            }
        ));
    }

    #[test]
    fn test_relative_path_resolves_against_scope() {
        let spec = ordering(&[]);
        let scope = QueryScope::collection(collection());
        let cursor = CursorBuilder::new(&spec, &scope)
            .build_from_values(vec![Value::from("eros")], true)
            .unwrap();
        let path = cursor.values[0].as_reference().unwrap();
        assert_eq!(path.relative_path(), "rooms/eros");
    }

    #[test]
    fn test_key_boundary_must_be_in_scope() {
        let spec = ordering(&[]);
        let scope = QueryScope::collection(collection());
        let builder = CursorBuilder::new(&spec, &scope);

        let outside = ResourcePath::root("p", "(default)")
            .append("users/u1")
            .unwrap();
        assert!(matches!(
            builder.build_from_values(vec![Value::from(outside)], true),
            Err(QueryError::InvalidKeyBoundary(_))
        ));

        // Grandchild of the collection: not a direct child.
        assert!(matches!(
            builder.build_from_values(vec![Value::from("eros/messages/m1")], true),
            Err(QueryError::InvalidKeyBoundary(_))
        ));

        // A collection path is not a document.
        let bare = collection();
        assert!(matches!(
            builder.build_from_values(vec![Value::from(bare)], true),
            Err(QueryError::InvalidKeyBoundary(_))
        ));

        // Wrong variant entirely.
        assert!(matches!(
            builder.build_from_values(vec![Value::Int64(4)], true),
            Err(QueryError::InvalidKeyBoundary(_))
        ));
    }

    #[test]
    fn test_collection_group_accepts_descendants() {
        let spec = ordering(&[]);
        let root = ResourcePath::root("p", "(default)");
        let scope = QueryScope::collection_group(root);
        let cursor = CursorBuilder::new(&spec, &scope)
            .build_from_values(vec![Value::from("rooms/eros/messages/m1")], false)
            .unwrap();
        let path = cursor.values[0].as_reference().unwrap();
        assert_eq!(path.relative_path(), "rooms/eros/messages/m1");
        assert!(!cursor.before);
    }

    #[test]
    fn test_document_cursor_extracts_ordered_fields() {
        let spec = ordering(&["score"]);
        let scope = QueryScope::collection(collection());
        let doc = Document::new(
            collection().child("eros"),
            vec![("score".to_string(), Value::Int64(42))],
        );
        let cursor = CursorBuilder::new(&spec, &scope)
            .build_from_document(&doc, true)
            .unwrap();
        assert_eq!(cursor.values.len(), 2);
        assert_eq!(cursor.values[0], Value::Int64(42));
        assert_eq!(
            cursor.values[1].as_reference().unwrap().relative_path(),
            "rooms/eros"
        );
    }

    #[test]
    fn test_document_cursor_requires_ordered_fields() {
        let spec = ordering(&["score"]);
        let scope = QueryScope::collection(collection());
        let doc = Document::new(collection().child("eros"), vec![]);
        assert!(matches!(
            CursorBuilder::new(&spec, &scope).build_from_document(&doc, true),
            Err(QueryError::MissingOrderedField { .. })
        ));
    }
}
