//! Resource and field paths.
//!
//! ## Ordering
//! `ResourcePath` orders by project, then database, then segments, each
//! component in UTF-8 byte order; a placeholder project/database compares
//! equal to any concrete one, since the concrete id is only resolved at
//! request time. `FieldPath` orders segment-wise in UTF-8 byte order with
//! a length tiebreak.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};
use crate::text_order::compare_utf8_order;

/// Project/database component used before project auto-detection has
/// resolved the concrete id.
pub const PROJECT_PLACEHOLDER: &str = "{{project_id}}";

/// Database id assumed when none is given.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Reserved ordering field that sorts by the document's own path.
pub const DOCUMENT_KEY_FIELD: &str = "__key__";

fn cmp_component(a: &str, b: &str) -> Ordering {
    if a == PROJECT_PLACEHOLDER || b == PROJECT_PLACEHOLDER {
        return Ordering::Equal;
    }
    compare_utf8_order(a, b)
}

fn cmp_segments(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = compare_utf8_order(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

// === ResourcePath ===

/// Absolute path to a document or collection inside one database.
///
/// `segments` is relative to the database's documents root: an odd
/// number of segments names a collection, an even nonzero number a
/// document, zero the root itself.
#[derive(Clone, Debug)]
pub struct ResourcePath {
    project: String,
    database: String,
    segments: Vec<String>,
}

impl ResourcePath {
    /// Root path of one database.
    pub fn root(project: impl Into<String>, database: impl Into<String>) -> Self {
        ResourcePath {
            project: project.into(),
            database: database.into(),
            segments: Vec::new(),
        }
    }

    /// Path with explicit segments below the documents root.
    pub fn with_segments(
        project: impl Into<String>,
        database: impl Into<String>,
        segments: Vec<String>,
    ) -> Self {
        ResourcePath {
            project: project.into(),
            database: database.into(),
            segments,
        }
    }

    /// Parses the wire's slash-separated absolute form:
    /// `projects/{p}/databases/{d}/documents/{seg...}` (the trailing
    /// `documents/...` part is optional for the database root).
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() < 4 || parts[0] != "projects" || parts[2] != "databases" {
            return Err(Error::invalid_path(format!(
                "{raw:?}: expected projects/{{id}}/databases/{{id}}/documents/..."
            )));
        }
        if parts[1].is_empty() || parts[3].is_empty() {
            return Err(Error::invalid_path(format!(
                "{raw:?}: empty project or database id"
            )));
        }
        let segments = match &parts[4..] {
            [] => Vec::new(),
            ["documents", rest @ ..] => {
                if rest.iter().any(|s| s.is_empty()) {
                    return Err(Error::invalid_path(format!("{raw:?}: empty path segment")));
                }
                rest.iter().map(|s| s.to_string()).collect()
            }
            _ => {
                return Err(Error::invalid_path(format!(
                    "{raw:?}: expected documents/ after the database id"
                )))
            }
        };
        Ok(ResourcePath {
            project: parts[1].to_string(),
            database: parts[3].to_string(),
            segments,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, if any.
    pub fn id(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn is_document(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    pub fn is_collection(&self) -> bool {
        self.segments.len() % 2 == 1
    }

    /// Appends one segment.
    pub fn child(&self, segment: impl Into<String>) -> ResourcePath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        ResourcePath {
            project: self.project.clone(),
            database: self.database.clone(),
            segments,
        }
    }

    /// Appends a slash-separated relative path.
    pub fn append(&self, relative: &str) -> Result<ResourcePath> {
        let mut segments = self.segments.clone();
        for segment in relative.split('/') {
            if segment.is_empty() {
                return Err(Error::invalid_path(format!(
                    "{relative:?}: empty path segment"
                )));
            }
            segments.push(segment.to_string());
        }
        Ok(ResourcePath {
            project: self.project.clone(),
            database: self.database.clone(),
            segments,
        })
    }

    /// Path with the last segment removed; `None` at the root.
    pub fn parent(&self) -> Option<ResourcePath> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(ResourcePath {
            project: self.project.clone(),
            database: self.database.clone(),
            segments,
        })
    }

    /// Whether `other` lives at or below this path. Projects and
    /// databases match under the placeholder rule.
    pub fn is_prefix_of(&self, other: &ResourcePath) -> bool {
        cmp_component(&self.project, &other.project) == Ordering::Equal
            && cmp_component(&self.database, &other.database) == Ordering::Equal
            && self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }

    /// Segments rendered relative to the documents root.
    pub fn relative_path(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/databases/{}/documents",
            self.project, self.database
        )?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_component(&self.project, &other.project)
            .then_with(|| cmp_component(&self.database, &other.database))
            .then_with(|| cmp_segments(&self.segments, &other.segments))
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Placeholder components make equality non-structural, so PartialEq
// follows Ord rather than a derive. No Hash impl for the same reason.
impl PartialEq for ResourcePath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ResourcePath {}

// === FieldPath ===

/// Dotted path to a field inside document data, or the document-key
/// sentinel ordering by the document's own path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Field path from explicit segments.
    pub fn new(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::invalid_path("field path segments must be nonempty"));
        }
        Ok(FieldPath { segments })
    }

    /// Parses the wire's dotted form. `__key__` parses to the
    /// document-key sentinel.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_path("empty field path"));
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::invalid_path(format!("{raw:?}: empty field segment")));
        }
        Ok(FieldPath { segments })
    }

    /// The document-key sentinel path.
    pub fn document_key() -> Self {
        FieldPath {
            segments: vec![DOCUMENT_KEY_FIELD.to_string()],
        }
    }

    pub fn is_document_key(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == DOCUMENT_KEY_FIELD
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_segments(&self.segments, &other.segments)
    }
}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str) -> ResourcePath {
        ResourcePath::root("p", "(default)").append(path).unwrap()
    }

    #[test]
    fn test_parse_round_trip() {
        let raw = "projects/p/databases/(default)/documents/rooms/eros/messages/m1";
        let path = ResourcePath::parse(raw).unwrap();
        assert_eq!(path.project(), "p");
        assert_eq!(path.database(), "(default)");
        assert_eq!(path.segments().len(), 4);
        assert!(path.is_document());
        assert_eq!(path.to_string(), raw);
    }

    #[test]
    fn test_parse_database_root() {
        let with_suffix = ResourcePath::parse("projects/p/databases/d/documents").unwrap();
        let without = ResourcePath::parse("projects/p/databases/d").unwrap();
        assert_eq!(with_suffix, without);
        assert!(with_suffix.segments().is_empty());
        assert!(!with_suffix.is_document());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ResourcePath::parse("rooms/eros").is_err());
        assert!(ResourcePath::parse("projects/p/databanks/d/documents/x").is_err());
        assert!(ResourcePath::parse("projects//databases/d").is_err());
        assert!(ResourcePath::parse("projects/p/databases/d/documents/a//b").is_err());
        assert!(ResourcePath::parse("projects/p/databases/d/docs/a").is_err());
    }

    #[test]
    fn test_segment_order() {
        assert!(doc("rooms/a") < doc("rooms/b"));
        assert!(doc("rooms") < doc("rooms/a"));
        assert!(doc("rooms/a/msgs/m") > doc("rooms/a"));
    }

    #[test]
    fn test_placeholder_matches_any_project() {
        let concrete = doc("rooms/a");
        let deferred = ResourcePath::root(PROJECT_PLACEHOLDER, "(default)")
            .append("rooms/a")
            .unwrap();
        assert_eq!(concrete.cmp(&deferred), Ordering::Equal);
        assert_eq!(concrete, deferred);
    }

    #[test]
    fn test_prefix_and_children() {
        let collection = doc("rooms");
        let document = doc("rooms/eros");
        assert!(collection.is_prefix_of(&document));
        assert!(!document.is_prefix_of(&collection));
        assert_eq!(collection.child("eros"), document);
        assert_eq!(document.parent().unwrap(), collection);
        assert_eq!(document.id(), Some("eros"));
        assert_eq!(document.relative_path(), "rooms/eros");
    }

    #[test]
    fn test_field_path_parse_and_render() {
        let path = FieldPath::parse("address.city").unwrap();
        assert_eq!(path.segments(), ["address", "city"]);
        assert_eq!(path.to_string(), "address.city");
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
    }

    #[test]
    fn test_field_path_document_key() {
        let key = FieldPath::document_key();
        assert!(key.is_document_key());
        assert_eq!(key.to_string(), "__key__");
        assert_eq!(FieldPath::parse("__key__").unwrap(), key);
        assert!(!FieldPath::parse("data.__key__").unwrap().is_document_key());
    }

    #[test]
    fn test_field_path_order_is_segment_wise() {
        let a = FieldPath::parse("a.b").unwrap();
        let ab = FieldPath::parse("ab").unwrap();
        // "a" < "ab" at the first segment, before any dot rendering.
        assert!(a < ab);
        assert!(FieldPath::parse("a").unwrap() < a);
    }
}
