//! Prefix query - matches terms starting with a prefix
//!
//! A prefix query matches all terms that begin with the specified prefix.
//!
//! # Example
//!
//! ```rust
//! use boolq::query::nodes::PrefixQuery;
//! use boolq::query::types::ValueType;
//! use boolq::schema::FieldType;
//!
//! // Match terms starting with "prog" (programming, progress, etc.)
//! let query = PrefixQuery::new("tags", "prog", ValueType::new(FieldType::Keyword));
//! ```

use crate::query::nodes::pattern::TermMatcher;
use crate::query::types::ValueType;
use crate::Result;
use serde_json::{json, Map, Value as Json};

/// Query that matches terms starting with a prefix
#[derive(Clone, Debug, PartialEq)]
pub struct PrefixQuery {
    /// Field to search in
    pub field: String,
    /// Prefix to match
    pub prefix: String,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    /// Multi-term rewrite method
    pub rewrite: Option<String>,
}

impl PrefixQuery {
    /// Create a new prefix query
    pub fn new(field: impl Into<String>, prefix: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            prefix: prefix.into(),
            value_type,
            boost: 1.0,
            filter: false,
            rewrite: None,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.rewrite = Some(rewrite.into());
        self
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        body.insert("value".to_string(), json!(self.prefix));
        body.insert("boost".to_string(), json!(self.boost));
        if let Some(rewrite) = &self.rewrite {
            body.insert("rewrite".to_string(), json!(rewrite));
        }
        json!({ "prefix": { self.field.clone(): body } })
    }
}

impl TermMatcher for PrefixQuery {
    fn field(&self) -> &str {
        &self.field
    }

    fn boost(&self) -> f64 {
        self.boost
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn matches(&self, term: &str) -> Result<bool> {
        Ok(term.starts_with(&self.prefix))
    }
}
