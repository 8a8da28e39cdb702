//! Ids query - matches documents by identifier

use crate::error::BoolqError;
use crate::query::ast::{QueryNode, IDS_FIELD};
use crate::query::merge::check_boost;
use crate::Result;
use serde_json::{json, Value as Json};
use std::collections::BTreeSet;

/// Query that matches documents whose id is in a set
#[derive(Clone, Debug, PartialEq)]
pub struct IdsQuery {
    /// Document ids, sorted and unique
    pub values: Vec<String>,
    /// Boost factor for scoring
    pub boost: f64,
}

impl IdsQuery {
    pub fn new(values: Vec<String>) -> Self {
        let values: BTreeSet<String> = values.into_iter().collect();
        Self {
            values: values.into_iter().collect(),
            boost: 1.0,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.binary_search_by(|v| v.as_str().cmp(id)).is_ok()
    }

    /// Union of two id sets
    pub fn union_join(self, other: IdsQuery) -> Result<QueryNode> {
        check_boost(IDS_FIELD, self.boost, other.boost)?;
        let mut values = self.values;
        values.extend(other.values);
        Ok(QueryNode::Ids(IdsQuery::new(values).with_boost(self.boost)))
    }

    /// Intersection of two id sets
    ///
    /// A document has exactly one id, so disjoint sets cannot both match.
    pub fn intersect(self, other: IdsQuery) -> Result<QueryNode> {
        let common: Vec<String> = self
            .values
            .iter()
            .filter(|id| other.contains(id))
            .cloned()
            .collect();
        if common.is_empty() {
            return Err(BoolqError::ValueConflict {
                field: IDS_FIELD.to_string(),
                left: self.values.join(","),
                right: other.values.join(","),
            });
        }
        check_boost(IDS_FIELD, self.boost, other.boost)?;
        Ok(QueryNode::Ids(IdsQuery::new(common).with_boost(self.boost)))
    }

    pub fn render(&self) -> Json {
        json!({ "ids": { "values": self.values } })
    }
}
