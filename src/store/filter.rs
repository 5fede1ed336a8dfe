//! Equality filters
//!
//! A filter is a conjunction of exact field matches. Numbers compare by value
//! across int32, int64 and double, the way the document database does.
//! Two integers compare exactly; a double on either side compares as f64.

use bson::{Bson, Document};

/// Exact-match conjunction over document fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Bson)>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Single-field equality
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::all().and(field, value)
    }

    /// Add another equality clause
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether a document satisfies every clause
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|(field, expected)| {
            doc.get(field)
                .map(|actual| values_equal(actual, expected))
                .unwrap_or(false)
        })
    }

    /// Query document for backends that take one
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (field, value) in &self.clauses {
            doc.insert(field.clone(), value.clone());
        }
        doc
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    if let (Some(x), Some(y)) = (as_integer(a), as_integer(b)) {
        return x == y;
    }
    match (as_float(a), as_float(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        _ => None,
    }
}

fn as_float(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(f) => Some(*f),
        other => as_integer(other).map(|i| i as f64),
    }
}
