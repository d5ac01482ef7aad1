//! Minimal result-document view consumed by the cursor engine.

use cascade_client_core::{FieldPath, ResourcePath, Timestamp, Value};

/// One result document: its path, data fields in wire order, and the
/// read time reported by the backend. The full CRUD snapshot surface
/// lives with the transport collaborator; this view carries exactly
/// what cursor construction and client-side ordering need.
#[derive(Clone, Debug)]
pub struct Document {
    path: ResourcePath,
    fields: Vec<(String, Value)>,
    read_time: Option<Timestamp>,
}

impl Document {
    pub fn new(path: ResourcePath, fields: Vec<(String, Value)>) -> Self {
        Document {
            path,
            fields,
            read_time: None,
        }
    }

    pub fn with_read_time(mut self, read_time: Timestamp) -> Self {
        self.read_time = Some(read_time);
        self
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn read_time(&self) -> Option<Timestamp> {
        self.read_time
    }

    /// Looks up a field by path, walking nested maps segment by
    /// segment. The document-key sentinel is not a data field and
    /// always yields `None` here; callers order on the path instead.
    pub fn field(&self, path: &FieldPath) -> Option<&Value> {
        if path.is_document_key() {
            return None;
        }
        let (first, rest) = path.segments().split_first()?;
        let mut current = lookup(&self.fields, first)?;
        for segment in rest {
            match current {
                Value::Map(entries) => current = lookup(entries, segment)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}
