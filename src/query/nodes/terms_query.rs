//! Terms query - matches documents containing any of the specified values

use crate::error::BoolqError;
use crate::query::ast::QueryNode;
use crate::query::merge::{and_pair, check_boost};
use crate::query::nodes::{BoolQuery, TermQuery};
use crate::query::types::ValueType;
use crate::query::value::{compare, Value};
use crate::Result;
use serde_json::{json, Value as Json};
use std::cmp::Ordering;

/// Query that matches documents containing any of the specified values in a field
///
/// Values are kept sorted under the field type and free of duplicates, so
/// two queries over the same value set compare equal.
#[derive(Clone, Debug, PartialEq)]
pub struct TermsQuery {
    /// Field to search in
    pub field: String,
    /// Values to match (document must contain at least one)
    pub values: Vec<Value>,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
}

impl TermsQuery {
    /// Create a new terms query
    pub fn new(field: impl Into<String>, values: Vec<Value>, value_type: ValueType) -> Self {
        let mut query = Self {
            field: field.into(),
            values,
            value_type,
            boost: 1.0,
            filter: false,
        };
        query.normalize();
        query
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

    /// Add a value to the query
    pub fn add_value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        let field_type = self.value_type.field_type;
        self.values.sort_by(|a, b| compare(a, b, field_type));
        self.values
            .dedup_by(|a, b| compare(a, b, field_type) == Ordering::Equal);
    }

    /// Check whether a value is one of this query's values
    pub fn contains(&self, value: &Value) -> bool {
        let field_type = self.value_type.field_type;
        self.values
            .binary_search_by(|probe| compare(probe, value, field_type))
            .is_ok()
    }

    fn is_subset_of(&self, other: &TermsQuery) -> bool {
        self.values.iter().all(|v| other.contains(v))
    }

    fn with_values(&self, values: Vec<Value>) -> TermsQuery {
        TermsQuery::new(self.field.clone(), values, self.value_type)
            .with_boost(self.boost)
            .with_filter(self.filter)
    }

    /// Collapse to the smallest node expressing the same condition
    ///
    /// No values yields `Empty`; a single value yields a `term` query.
    pub fn into_node(self) -> QueryNode {
        match self.values.len() {
            0 => QueryNode::Empty,
            1 => {
                let TermsQuery {
                    field,
                    mut values,
                    value_type,
                    boost,
                    filter,
                } = self;
                let value = values.remove(0);
                QueryNode::Term(
                    TermQuery::new(field, value, value_type)
                        .with_boost(boost)
                        .with_filter(filter),
                )
            }
            _ => QueryNode::Terms(self),
        }
    }

    /// Union of two value sets
    pub fn union_join(mut self, other: TermsQuery) -> Result<QueryNode> {
        check_boost(&self.field, self.boost, other.boost)?;
        self.values.extend(other.values);
        self.normalize();
        Ok(self.into_node())
    }

    /// Union with a single term
    pub fn union_join_term(mut self, term: TermQuery) -> Result<QueryNode> {
        check_boost(&self.field, self.boost, term.boost)?;
        if !self.contains(&term.value) {
            self.values.push(term.value);
            self.normalize();
        }
        Ok(self.into_node())
    }

    /// Intersection of two value sets
    ///
    /// On a single-valued field this is the set intersection. On an array
    /// field a document may match each side through a different value, so
    /// only a subset relation collapses.
    pub fn intersect(self, other: TermsQuery) -> Result<QueryNode> {
        if self.value_type.is_array {
            return if self.is_subset_of(&other) {
                check_boost(&self.field, self.boost, other.boost)?;
                Ok(self.into_node())
            } else if other.is_subset_of(&self) {
                check_boost(&self.field, self.boost, other.boost)?;
                Ok(other.into_node())
            } else {
                Ok(and_pair(QueryNode::Terms(self), QueryNode::Terms(other)))
            };
        }

        let common: Vec<Value> = self
            .values
            .iter()
            .filter(|v| other.contains(v))
            .cloned()
            .collect();
        if common.is_empty() {
            return Err(BoolqError::ValueConflict {
                field: self.field.clone(),
                left: self.describe(),
                right: other.describe(),
            });
        }
        check_boost(&self.field, self.boost, other.boost)?;
        Ok(self.with_values(common).into_node())
    }

    /// Intersection with a single term
    pub fn intersect_term(self, term: TermQuery) -> Result<QueryNode> {
        if self.contains(&term.value) {
            check_boost(&self.field, self.boost, term.boost)?;
            return Ok(QueryNode::Term(term));
        }
        if self.value_type.is_array {
            return Ok(and_pair(QueryNode::Terms(self), QueryNode::Term(term)));
        }
        Err(BoolqError::ValueConflict {
            field: self.field.clone(),
            left: self.describe(),
            right: term.value.to_string(),
        })
    }

    /// Negate: none of the values may match
    pub fn inverse(self) -> QueryNode {
        let TermsQuery {
            field,
            values,
            value_type,
            boost,
            filter,
        } = self;
        let inverted = values.into_iter().fold(BoolQuery::not(), |acc, value| {
            acc.must_not(
                TermQuery::new(field.clone(), value, value_type)
                    .with_boost(boost)
                    .with_filter(filter),
            )
        });
        QueryNode::Bool(inverted)
    }

    fn describe(&self) -> String {
        let values: Vec<String> = self.values.iter().map(Value::to_string).collect();
        format!("[{}]", values.join(", "))
    }

    pub fn render(&self) -> Json {
        let values: Vec<Json> = self.values.iter().map(Value::to_json).collect();
        json!({
            "terms": {
                self.field.clone(): values,
                "boost": self.boost,
            }
        })
    }
}

impl From<TermQuery> for TermsQuery {
    fn from(term: TermQuery) -> Self {
        TermsQuery::new(term.field, vec![term.value], term.value_type)
            .with_boost(term.boost)
            .with_filter(term.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn keyword() -> ValueType {
        ValueType::new(FieldType::Keyword)
    }

    fn terms(values: &[&str]) -> TermsQuery {
        TermsQuery::new(
            "category",
            values.iter().map(|v| Value::string(*v)).collect(),
            keyword(),
        )
    }

    #[test]
    fn test_terms_query_creation() {
        let query = terms(&["tech", "news", "tech"]);
        assert_eq!(
            query.values,
            vec![Value::string("news"), Value::string("tech")]
        );
        assert!(query.contains(&Value::string("tech")));
        assert!(!query.contains(&Value::string("sports")));
    }

    #[test]
    fn test_add_value() {
        let query = terms(&["tech"]).add_value("ai").add_value("tech");
        assert_eq!(query.values.len(), 2);
    }

    #[test]
    fn test_into_node_collapses() {
        assert_eq!(terms(&[]).into_node(), QueryNode::Empty);
        assert_eq!(
            terms(&["tech"]).into_node(),
            QueryNode::Term(TermQuery::new("category", "tech", keyword()))
        );
        assert_eq!(terms(&["a", "b"]).into_node().kind(), "terms");
    }

    #[test]
    fn test_numeric_values_sorted_by_type() {
        let query = TermsQuery::new(
            "rank",
            vec![Value::Int(10), Value::Int(9), Value::Int(100)],
            ValueType::new(FieldType::Long),
        );
        assert_eq!(
            query.values,
            vec![Value::Int(9), Value::Int(10), Value::Int(100)]
        );
    }

    #[test]
    fn test_union_is_set_union() {
        let merged = terms(&["a", "b"]).union_join(terms(&["b", "c"])).unwrap();
        assert_eq!(merged, QueryNode::Terms(terms(&["a", "b", "c"])));
    }

    #[test]
    fn test_intersect_is_set_intersection() {
        let merged = terms(&["a", "b", "c"]).intersect(terms(&["b", "c", "d"])).unwrap();
        assert_eq!(merged, QueryNode::Terms(terms(&["b", "c"])));

        let merged = terms(&["a", "b"]).intersect(terms(&["b", "c"])).unwrap();
        assert_eq!(merged.kind(), "term");
    }

    #[test]
    fn test_intersect_disjoint_conflicts() {
        let err = terms(&["a", "b"]).intersect(terms(&["c"])).unwrap_err();
        assert!(matches!(err, BoolqError::ValueConflict { .. }));
    }

    #[test]
    fn test_intersect_array_field_uses_subset() {
        let tags = ValueType::array(FieldType::Keyword);
        let small = TermsQuery::new("tags", vec!["a".into(), "b".into()], tags);
        let large = TermsQuery::new("tags", vec!["a".into(), "b".into(), "c".into()], tags);
        let merged = large.clone().intersect(small.clone()).unwrap();
        assert_eq!(merged, QueryNode::Terms(small));

        let other = TermsQuery::new("tags", vec!["c".into(), "d".into()], tags);
        assert!(large.intersect(other).unwrap().is_operator());
    }

    #[test]
    fn test_intersect_term() {
        let term = TermQuery::new("category", "b", keyword());
        let merged = terms(&["a", "b"]).intersect_term(term.clone()).unwrap();
        assert_eq!(merged, QueryNode::Term(term));
    }

    #[test]
    fn test_inverse_negates_each_value() {
        match terms(&["a", "b"]).inverse() {
            QueryNode::Bool(b) => {
                assert_eq!(b.must_not_clauses().count(), 2);
                assert!(b.must_not_clauses().all(|n| n.kind() == "term"));
            }
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(
            terms(&["b", "a"]).render(),
            json!({"terms": {"category": ["a", "b"], "boost": 1.0}})
        );
    }
}
