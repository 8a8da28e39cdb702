//! Term query - exact match on a field

use crate::error::BoolqError;
use crate::query::ast::QueryNode;
use crate::query::merge::{and_pair, check_boost};
use crate::query::nodes::TermsQuery;
use crate::query::types::ValueType;
use crate::query::value::{values_equal, Value};
use crate::Result;
use serde_json::{json, Value as Json};

/// Query that matches documents holding an exact value in a field
///
/// The value is not analyzed: on text fields it is compared against the
/// indexed tokens as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct TermQuery {
    /// Field to search in
    pub field: String,
    /// Exact value to match
    pub value: Value,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    /// Evaluate without scoring
    pub filter: bool,
}

impl TermQuery {
    /// Create a new term query
    pub fn new(field: impl Into<String>, value: impl Into<Value>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            value_type,
            boost: 1.0,
            filter: false,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    /// Evaluate in filter context
    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Whether this term matches the given value under the field's type
    pub fn matches(&self, value: &Value) -> bool {
        values_equal(&self.value, value, self.value_type.field_type)
    }

    /// Union with another term on the same field
    ///
    /// Distinct values widen into a `terms` query.
    pub fn union_join(self, other: TermQuery) -> Result<QueryNode> {
        check_boost(&self.field, self.boost, other.boost)?;
        if self.matches(&other.value) {
            return Ok(QueryNode::Term(self));
        }
        let values = vec![self.value, other.value];
        Ok(TermsQuery::new(self.field, values, self.value_type)
            .with_boost(self.boost)
            .with_filter(self.filter)
            .into_node())
    }

    /// Intersection with another term on the same field
    ///
    /// A single-valued field cannot hold two distinct values; an array field
    /// can, so distinct values are kept side by side.
    pub fn intersect(self, other: TermQuery) -> Result<QueryNode> {
        if self.matches(&other.value) {
            check_boost(&self.field, self.boost, other.boost)?;
            return Ok(QueryNode::Term(self));
        }
        if self.value_type.is_array {
            return Ok(and_pair(QueryNode::Term(self), QueryNode::Term(other)));
        }
        Err(BoolqError::ValueConflict {
            field: self.field,
            left: self.value.to_string(),
            right: other.value.to_string(),
        })
    }

    pub fn render(&self) -> Json {
        json!({
            "term": {
                self.field.clone(): {
                    "value": self.value.to_json(),
                    "boost": self.boost,
                }
            }
        })
    }
}
