//! Exists query - matches documents holding any value in a field

use serde_json::{json, Value as Json};

/// Query that matches documents with at least one indexed value in a field
///
/// Every other leaf on the same field implies this one, so it absorbs them
/// under union and yields to them under intersect.
#[derive(Clone, Debug, PartialEq)]
pub struct ExistsQuery {
    /// Field that must be present
    pub field: String,
    pub filter: bool,
}

impl ExistsQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            filter: false,
        }
    }

    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    pub fn render(&self) -> Json {
        json!({ "exists": { "field": self.field } })
    }
}
