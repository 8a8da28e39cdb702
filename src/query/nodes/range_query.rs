//! Range query - matches documents with field values in a range
//!
//! A range is a pair of optional bounds, each with its own comparator.
//! A missing bound is unbounded on that side. Bound arithmetic is done
//! under the field type's order; an exclusive bound touching an equal
//! bound on the other range means the two ranges share no value.

use crate::error::BoolqError;
use crate::query::ast::QueryNode;
use crate::query::merge::{and_pair, check_boost, or_pair};
use crate::query::nodes::{BoolQuery, ExistsQuery, TermQuery, TermsQuery};
use crate::query::types::{LowerCmp, UpperCmp, ValueType};
use crate::query::value::{compare, Value};
use crate::schema::{FieldType, TypeFamily};
use crate::Result;
use serde_json::{json, Map, Value as Json};
use std::cmp::Ordering;

/// Query that matches documents with field values within a specified range
#[derive(Clone, Debug, PartialEq)]
pub struct RangeQuery {
    /// Field to search in
    pub field: String,
    pub value_type: ValueType,
    /// Lower bound; `None` is unbounded
    pub lower: Option<Value>,
    pub lower_cmp: LowerCmp,
    /// Upper bound; `None` is unbounded
    pub upper: Option<Value>,
    pub upper_cmp: UpperCmp,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    /// Relation for range fields (`intersects`, `contains`, `within`)
    pub relation: Option<String>,
    /// Time zone applied to date bounds
    pub time_zone: Option<String>,
}

impl RangeQuery {
    /// Create a new range query, unbounded on both sides
    pub fn new(field: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            value_type,
            lower: None,
            lower_cmp: LowerCmp::Gte,
            upper: None,
            upper_cmp: UpperCmp::Lte,
            boost: 1.0,
            filter: false,
            relation: None,
            time_zone: None,
        }
    }

    /// Set the greater-than bound
    pub fn gt(self, value: impl Into<Value>) -> Self {
        self.with_lower(value.into(), LowerCmp::Gt)
    }

    /// Set the greater-than-or-equal bound
    pub fn gte(self, value: impl Into<Value>) -> Self {
        self.with_lower(value.into(), LowerCmp::Gte)
    }

    /// Set the less-than bound
    pub fn lt(self, value: impl Into<Value>) -> Self {
        self.with_upper(value.into(), UpperCmp::Lt)
    }

    /// Set the less-than-or-equal bound
    pub fn lte(self, value: impl Into<Value>) -> Self {
        self.with_upper(value.into(), UpperCmp::Lte)
    }

    /// Set the lower bound; the type's minimum sentinel leaves it unbounded
    pub fn with_lower(mut self, value: Value, cmp: LowerCmp) -> Self {
        if value.is_min_infinity() {
            self.lower = None;
            self.lower_cmp = LowerCmp::Gte;
        } else {
            self.lower = Some(value);
            self.lower_cmp = cmp;
        }
        self
    }

    /// Set the upper bound; the type's maximum sentinel leaves it unbounded
    pub fn with_upper(mut self, value: Value, cmp: UpperCmp) -> Self {
        if value.is_max_infinity() {
            self.upper = None;
            self.upper_cmp = UpperCmp::Lte;
        } else {
            self.upper = Some(value);
            self.upper_cmp = cmp;
        }
        self
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

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    fn field_type(&self) -> FieldType {
        self.value_type.field_type
    }

    /// Check if this range is unbounded on the lower end
    pub fn is_unbounded_lower(&self) -> bool {
        self.lower.is_none()
    }

    /// Check if this range is unbounded on the upper end
    pub fn is_unbounded_upper(&self) -> bool {
        self.upper.is_none()
    }

    /// Check if this is a point query (`[v, v]`)
    pub fn is_point_query(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(l), Some(u)) => {
                self.lower_cmp.is_inclusive()
                    && self.upper_cmp.is_inclusive()
                    && compare(l, u, self.field_type()) == Ordering::Equal
            }
            _ => false,
        }
    }

    /// Check whether two ranges share at least one value
    pub fn check_overlap(&self, other: &RangeQuery) -> bool {
        let field_type = self.field_type();
        lower_reaches_upper(
            (&self.lower, self.lower_cmp),
            (&other.upper, other.upper_cmp),
            field_type,
        ) && lower_reaches_upper(
            (&other.lower, other.lower_cmp),
            (&self.upper, self.upper_cmp),
            field_type,
        )
    }

    /// Check whether a value lies within this range
    pub fn check_include(&self, value: &Value) -> bool {
        let field_type = self.field_type();
        let above_lower = match &self.lower {
            None => true,
            Some(l) => match compare(l, value, field_type) {
                Ordering::Less => true,
                Ordering::Equal => self.lower_cmp.is_inclusive(),
                Ordering::Greater => false,
            },
        };
        let below_upper = match &self.upper {
            None => true,
            Some(u) => match compare(value, u, field_type) {
                Ordering::Less => true,
                Ordering::Equal => self.upper_cmp.is_inclusive(),
                Ordering::Greater => false,
            },
        };
        above_lower && below_upper
    }

    /// Check whether every value of `other` lies within this range
    pub fn contains_range(&self, other: &RangeQuery) -> bool {
        let field_type = self.field_type();
        cmp_lower(
            (&self.lower, self.lower_cmp),
            (&other.lower, other.lower_cmp),
            field_type,
        ) != Ordering::Greater
            && cmp_upper(
                (&self.upper, self.upper_cmp),
                (&other.upper, other.upper_cmp),
                field_type,
            ) != Ordering::Less
    }

    /// Check that at least one value lies between the bounds
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(BoolqError::EmptyIntersection {
                field: self.field.clone(),
            });
        }
        Ok(())
    }

    /// Whether the bounds admit no value
    pub fn is_empty(&self) -> bool {
        !lower_reaches_upper(
            (&self.lower, self.lower_cmp),
            (&self.upper, self.upper_cmp),
            self.field_type(),
        )
    }

    /// Whether two ranges agree on everything but their bounds and boost
    fn same_options(&self, other: &RangeQuery) -> bool {
        self.filter == other.filter
            && self.relation == other.relation
            && self.time_zone == other.time_zone
    }

    /// Make an exclusive bound equal to `value` inclusive
    ///
    /// Returns whether a bound was widened.
    fn widen_boundary(&mut self, value: &Value) -> bool {
        let field_type = self.field_type();
        if self.lower_cmp == LowerCmp::Gt {
            if let Some(l) = &self.lower {
                if compare(l, value, field_type) == Ordering::Equal {
                    self.lower_cmp = LowerCmp::Gte;
                    return true;
                }
            }
        }
        if self.upper_cmp == UpperCmp::Lt {
            if let Some(u) = &self.upper {
                if compare(u, value, field_type) == Ordering::Equal {
                    self.upper_cmp = UpperCmp::Lte;
                    return true;
                }
            }
        }
        false
    }

    /// Union with another range on the same field
    ///
    /// Overlapping ranges join into their outer envelope; disjoint ranges,
    /// or ranges differing in time zone, relation or filter context, are
    /// kept side by side under `should`.
    pub fn union_join(self, other: RangeQuery) -> Result<QueryNode> {
        if !self.check_overlap(&other) || !self.same_options(&other) {
            return Ok(or_pair(QueryNode::Range(self), QueryNode::Range(other)));
        }
        check_boost(&self.field, self.boost, other.boost)?;
        let field_type = self.field_type();

        let (lower, lower_cmp) = match cmp_lower(
            (&self.lower, self.lower_cmp),
            (&other.lower, other.lower_cmp),
            field_type,
        ) {
            Ordering::Greater => (other.lower, other.lower_cmp),
            _ => (self.lower.clone(), self.lower_cmp),
        };
        let (upper, upper_cmp) = match cmp_upper(
            (&self.upper, self.upper_cmp),
            (&other.upper, other.upper_cmp),
            field_type,
        ) {
            Ordering::Less => (other.upper, other.upper_cmp),
            _ => (self.upper.clone(), self.upper_cmp),
        };

        Ok(QueryNode::Range(RangeQuery {
            lower,
            lower_cmp,
            upper,
            upper_cmp,
            ..self
        }))
    }

    /// Intersection with another range on the same field
    ///
    /// On a single-valued field the result is the inner envelope, and
    /// disjoint ranges fail with `EmptyIntersection`. On an array field
    /// each range may be met by a different element, so only containment
    /// collapses. Ranges differing in time zone, relation or filter
    /// context stay paired under `must`.
    pub fn intersect(self, other: RangeQuery) -> Result<QueryNode> {
        if !self.same_options(&other) {
            return Ok(and_pair(QueryNode::Range(self), QueryNode::Range(other)));
        }
        if self.value_type.is_array {
            return if other.contains_range(&self) {
                check_boost(&self.field, self.boost, other.boost)?;
                Ok(QueryNode::Range(self))
            } else if self.contains_range(&other) {
                check_boost(&self.field, self.boost, other.boost)?;
                Ok(QueryNode::Range(other))
            } else {
                Ok(and_pair(QueryNode::Range(self), QueryNode::Range(other)))
            };
        }

        if !self.check_overlap(&other) {
            return Err(BoolqError::EmptyIntersection { field: self.field });
        }
        check_boost(&self.field, self.boost, other.boost)?;
        let field_type = self.field_type();

        let (lower, lower_cmp) = match cmp_lower(
            (&self.lower, self.lower_cmp),
            (&other.lower, other.lower_cmp),
            field_type,
        ) {
            Ordering::Less => (other.lower, other.lower_cmp),
            _ => (self.lower.clone(), self.lower_cmp),
        };
        let (upper, upper_cmp) = match cmp_upper(
            (&self.upper, self.upper_cmp),
            (&other.upper, other.upper_cmp),
            field_type,
        ) {
            Ordering::Greater => (other.upper, other.upper_cmp),
            _ => (self.upper.clone(), self.upper_cmp),
        };

        Ok(QueryNode::Range(RangeQuery {
            lower,
            lower_cmp,
            upper,
            upper_cmp,
            ..self
        }))
    }

    /// Union with a single term
    ///
    /// A term inside the range is absorbed; a term sitting on an exclusive
    /// bound makes that bound inclusive.
    pub fn union_join_term(mut self, term: TermQuery) -> Result<QueryNode> {
        if self.check_include(&term.value) || self.widen_boundary(&term.value) {
            check_boost(&self.field, self.boost, term.boost)?;
            return Ok(QueryNode::Range(self));
        }
        Ok(or_pair(QueryNode::Range(self), QueryNode::Term(term)))
    }

    /// Intersection with a single term
    pub fn intersect_term(self, term: TermQuery) -> Result<QueryNode> {
        if self.check_include(&term.value) {
            check_boost(&self.field, self.boost, term.boost)?;
            return Ok(QueryNode::Term(term));
        }
        Ok(and_pair(QueryNode::Range(self), QueryNode::Term(term)))
    }

    /// Union with a value set
    ///
    /// Values inside the range, or on one of its exclusive bounds, are
    /// absorbed; the rest stay beside the range under `should`.
    pub fn union_join_terms(mut self, terms: TermsQuery) -> Result<QueryNode> {
        let mut outside = Vec::new();
        let mut absorbed = false;
        for value in &terms.values {
            if self.check_include(value) || self.widen_boundary(value) {
                absorbed = true;
            } else {
                outside.push(value.clone());
            }
        }
        if absorbed {
            check_boost(&self.field, self.boost, terms.boost)?;
        }
        if outside.len() == terms.values.len() {
            return Ok(or_pair(QueryNode::Range(self), QueryNode::Terms(terms)));
        }
        let residual = TermsQuery::new(terms.field, outside, terms.value_type)
            .with_boost(terms.boost)
            .with_filter(terms.filter)
            .into_node();
        match residual {
            QueryNode::Empty => Ok(QueryNode::Range(self)),
            residual => Ok(or_pair(QueryNode::Range(self), residual)),
        }
    }

    /// Intersection with a value set
    pub fn intersect_terms(self, terms: TermsQuery) -> Result<QueryNode> {
        let inside: Vec<Value> = terms
            .values
            .iter()
            .filter(|v| self.check_include(v))
            .cloned()
            .collect();

        // On an array field the matching element need not be the one in range
        let collapses = if self.value_type.is_array {
            inside.len() == terms.values.len()
        } else {
            !inside.is_empty()
        };
        if !collapses {
            return Ok(and_pair(QueryNode::Range(self), QueryNode::Terms(terms)));
        }
        check_boost(&self.field, self.boost, terms.boost)?;
        Ok(TermsQuery::new(terms.field, inside, terms.value_type)
            .with_boost(terms.boost)
            .with_filter(terms.filter)
            .into_node())
    }

    /// Compute the complement of this range
    ///
    /// A bounded range inverts into up to two open ranges under `should`.
    /// A range without bounds only asserts the field exists, so its
    /// complement is a missing field.
    pub fn inverse(self) -> Result<QueryNode> {
        if self.value_type.is_array {
            return Ok(QueryNode::Bool(BoolQuery::not().must_not(self)));
        }

        let below = self.lower.clone().map(|l| RangeQuery {
            lower: None,
            lower_cmp: LowerCmp::Gte,
            upper: Some(l),
            upper_cmp: self.lower_cmp.complement(),
            ..self.clone()
        });
        let above = self.upper.clone().map(|u| RangeQuery {
            lower: Some(u),
            lower_cmp: self.upper_cmp.complement(),
            upper: None,
            upper_cmp: UpperCmp::Lte,
            ..self.clone()
        });

        match (below, above) {
            (Some(below), Some(above)) => Ok(or_pair(below.into(), above.into())),
            (Some(half), None) | (None, Some(half)) => Ok(QueryNode::Range(half)),
            (None, None) => Ok(QueryNode::Bool(BoolQuery::not().must_not(
                ExistsQuery::new(self.field).with_filter(self.filter),
            ))),
        }
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        if let Some(lower) = &self.lower {
            body.insert(self.lower_cmp.key().to_string(), lower.to_json());
        }
        if let Some(upper) = &self.upper {
            body.insert(self.upper_cmp.key().to_string(), upper.to_json());
        }
        body.insert("boost".to_string(), json!(self.boost));
        if let Some(relation) = &self.relation {
            body.insert("relation".to_string(), json!(relation));
        }
        if self.field_type().family() == TypeFamily::Date {
            body.insert("format".to_string(), json!("epoch_millis"));
        }
        if let Some(time_zone) = &self.time_zone {
            body.insert("time_zone".to_string(), json!(time_zone));
        }
        json!({ "range": { self.field.clone(): body } })
    }
}

/// Order two lower bounds; `Less` starts earlier
fn cmp_lower(
    a: (&Option<Value>, LowerCmp),
    b: (&Option<Value>, LowerCmp),
    field_type: FieldType,
) -> Ordering {
    match (a.0, b.0) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare(x, y, field_type)
            .then_with(|| b.1.is_inclusive().cmp(&a.1.is_inclusive())),
    }
}

/// Order two upper bounds; `Greater` extends further
fn cmp_upper(
    a: (&Option<Value>, UpperCmp),
    b: (&Option<Value>, UpperCmp),
    field_type: FieldType,
) -> Ordering {
    match (a.0, b.0) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare(x, y, field_type)
            .then_with(|| a.1.is_inclusive().cmp(&b.1.is_inclusive())),
    }
}

/// Whether some value is both above `lower` and below `upper`
fn lower_reaches_upper(
    lower: (&Option<Value>, LowerCmp),
    upper: (&Option<Value>, UpperCmp),
    field_type: FieldType,
) -> bool {
    match (lower.0, upper.0) {
        (Some(l), Some(u)) => match compare(l, u, field_type) {
            Ordering::Less => true,
            Ordering::Equal => lower.1.is_inclusive() && upper.1.is_inclusive(),
            Ordering::Greater => false,
        },
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn int() -> ValueType {
        ValueType::new(FieldType::Integer)
    }

    fn range() -> RangeQuery {
        RangeQuery::new("x", int())
    }

    #[test]
    fn test_range_query_builder() {
        let query = RangeQuery::new("age", int()).gt(18i64).lt(65i64).with_boost(2.0);
        assert_eq!(query.lower, Some(Value::Int(18)));
        assert_eq!(query.lower_cmp, LowerCmp::Gt);
        assert_eq!(query.upper, Some(Value::Int(65)));
        assert_eq!(query.upper_cmp, UpperCmp::Lt);
        assert_eq!(query.boost, 2.0);
    }

    #[test]
    fn test_range_query_unbounded() {
        let query = range().lte(100i64);
        assert!(query.is_unbounded_lower());
        assert!(!query.is_unbounded_upper());

        let query = range().gte(100i64).lt(i64::MAX);
        assert!(query.is_unbounded_upper());
    }

    #[test]
    fn test_range_query_point() {
        assert!(range().gte(2024i64).lte(2024i64).is_point_query());
        assert!(!range().gte(2024i64).lt(2025i64).is_point_query());
    }

    #[test]
    fn test_overlap_exclusive_touch() {
        let a = range().gte(1i64).lt(3i64);
        let b = range().gte(3i64).lte(5i64);
        assert!(!a.check_overlap(&b));
        assert!(!b.check_overlap(&a));
    }

    #[test]
    fn test_overlap_inclusive_touch() {
        let a = range().gte(1i64).lte(3i64);
        let b = range().gte(3i64).lte(5i64);
        assert!(a.check_overlap(&b));

        let merged = a.clone().union_join(b.clone()).unwrap();
        assert_eq!(merged, QueryNode::Range(range().gte(1i64).lte(5i64)));

        let merged = a.intersect(b).unwrap();
        assert_eq!(merged, QueryNode::Range(range().gte(3i64).lte(3i64)));
    }

    #[test]
    fn test_union_disjoint_pairs_up() {
        let a = range().gte(1i64).lt(3i64);
        let b = range().gte(3i64).lte(5i64);
        match a.union_join(b).unwrap() {
            QueryNode::Bool(b) => {
                assert_eq!(b.should_clauses().count(), 2);
                assert_eq!(b.minimum_should_match(), 1);
            }
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_intersect_disjoint_fails() {
        let a = range().gte(1i64).lt(3i64);
        let b = range().gte(3i64).lte(5i64);
        assert_eq!(
            a.intersect(b).unwrap_err(),
            BoolqError::EmptyIntersection {
                field: "x".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_comparator_ties() {
        let a = range().gt(1i64).lt(5i64);
        let b = range().gte(1i64).lte(5i64);

        // union keeps the more inclusive comparator
        assert_eq!(
            a.clone().union_join(b.clone()).unwrap(),
            QueryNode::Range(range().gte(1i64).lte(5i64))
        );
        // intersect keeps the more exclusive comparator
        assert_eq!(
            b.intersect(a).unwrap(),
            QueryNode::Range(range().gt(1i64).lt(5i64))
        );
    }

    #[test]
    fn test_unbounded_envelope() {
        let a = range().lt(10i64);
        let b = range().gte(5i64).lte(20i64);
        assert_eq!(
            a.clone().union_join(b.clone()).unwrap(),
            QueryNode::Range(range().lte(20i64))
        );
        assert_eq!(
            a.intersect(b).unwrap(),
            QueryNode::Range(range().gte(5i64).lt(10i64))
        );
    }

    #[test]
    fn test_array_intersect_keeps_both() {
        let tags = ValueType::array(FieldType::Integer);
        let a = RangeQuery::new("x", tags).gte(1i64).lt(3i64);
        let b = RangeQuery::new("x", tags).gte(5i64).lte(9i64);
        assert!(a.intersect(b).unwrap().is_operator());

        let outer = RangeQuery::new("x", tags).gte(1i64).lte(9i64);
        let inner = RangeQuery::new("x", tags).gte(2i64).lte(3i64);
        assert_eq!(
            outer.intersect(inner.clone()).unwrap(),
            QueryNode::Range(inner)
        );
    }

    #[test]
    fn test_validate_bounds() {
        assert!(range().gte(10i64).lte(5i64).validate().is_err());
        assert!(range().gte(7i64).lt(7i64).validate().is_err());
        assert!(range().gte(7i64).lte(7i64).validate().is_ok());
        assert!(range().gt(7i64).validate().is_ok());
        assert_eq!(
            range().gt(3i64).lt(1i64).validate().unwrap_err(),
            BoolqError::EmptyIntersection {
                field: "x".to_string()
            }
        );
    }

    #[test]
    fn test_differing_time_zones_stay_apart() {
        let date = ValueType::new(FieldType::Date);
        let day = |d| Value::Date(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());
        let utc = RangeQuery::new("created", date)
            .gte(day(1))
            .lte(day(10))
            .with_time_zone("UTC");
        let paris = RangeQuery::new("created", date)
            .gte(day(5))
            .lte(day(20))
            .with_time_zone("+01:00");

        match utc.clone().union_join(paris.clone()).unwrap() {
            QueryNode::Bool(b) => assert_eq!(b.should_clauses().count(), 2),
            other => panic!("expected bool, got {:?}", other),
        }
        match utc.clone().intersect(paris).unwrap() {
            QueryNode::Bool(b) => assert_eq!(b.must_clauses().count(), 2),
            other => panic!("expected bool, got {:?}", other),
        }

        let filtered = range().gte(1i64).lte(5i64).with_filter(true);
        assert!(range()
            .gte(3i64)
            .lte(9i64)
            .union_join(filtered)
            .unwrap()
            .is_operator());
    }

    #[test]
    fn test_term_absorption() {
        let r = range().gt(1i64).lt(3i64);
        let one = TermQuery::new("x", 1i64, int());
        assert_eq!(
            r.clone().union_join_term(one).unwrap(),
            QueryNode::Range(range().gte(1i64).lt(3i64))
        );

        let two = TermQuery::new("x", 2i64, int());
        assert_eq!(
            r.clone().intersect_term(two.clone()).unwrap(),
            QueryNode::Term(two)
        );

        let five = TermQuery::new("x", 5i64, int());
        assert!(r.intersect_term(five).unwrap().is_operator());
    }

    #[test]
    fn test_terms_partition() {
        let r = range().gte(10i64).lt(20i64);
        let terms = TermsQuery::new(
            "x",
            vec![Value::Int(5), Value::Int(15), Value::Int(20)],
            int(),
        );
        // 15 inside, 20 on the exclusive bound, 5 left over
        match r.clone().union_join_terms(terms.clone()).unwrap() {
            QueryNode::Bool(b) => {
                let children: Vec<_> = b.should_clauses().cloned().collect();
                assert_eq!(children[0], QueryNode::Range(range().gte(10i64).lte(20i64)));
                assert_eq!(
                    children[1],
                    QueryNode::Term(TermQuery::new("x", 5i64, int()))
                );
            }
            other => panic!("expected bool, got {:?}", other),
        }

        assert_eq!(
            r.intersect_terms(terms).unwrap(),
            QueryNode::Term(TermQuery::new("x", 15i64, int()))
        );
    }

    #[test]
    fn test_inverse_bounded() {
        let r = range().gt(1i64).lte(3i64);
        match r.inverse().unwrap() {
            QueryNode::Bool(b) => {
                let children: Vec<_> = b.should_clauses().cloned().collect();
                assert_eq!(children[0], QueryNode::Range(range().lte(1i64)));
                assert_eq!(children[1], QueryNode::Range(range().gt(3i64)));
            }
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_inverse_half_open() {
        assert_eq!(
            range().gte(5i64).inverse().unwrap(),
            QueryNode::Range(range().lt(5i64))
        );
        assert_eq!(
            range().lt(5i64).inverse().unwrap(),
            QueryNode::Range(range().gte(5i64))
        );
    }

    #[test]
    fn test_inverse_unbounded_is_missing() {
        match range().inverse().unwrap() {
            QueryNode::Bool(b) => {
                assert_eq!(
                    b.must_not_clauses().next(),
                    Some(&QueryNode::Exists(ExistsQuery::new("x")))
                );
            }
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_inverse_partitions_values() {
        let r = range().gt(1i64).lte(3i64);
        let inverted = match r.clone().inverse().unwrap() {
            QueryNode::Bool(b) => b
                .should_clauses()
                .filter_map(|n| match n {
                    QueryNode::Range(r) => Some(r.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>(),
            other => panic!("expected bool, got {:?}", other),
        };
        for v in -2..7 {
            let value = Value::Int(v);
            let in_inverse = inverted.iter().any(|r| r.check_include(&value));
            assert_ne!(r.check_include(&value), in_inverse, "value {}", v);
        }
    }

    #[test]
    fn test_render() {
        let query = range().gt(1i64).lte(3i64);
        assert_eq!(
            query.render(),
            json!({"range": {"x": {"gt": 1, "lte": 3, "boost": 1.0}}})
        );
    }

    #[test]
    fn test_render_date() {
        let day = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let query = RangeQuery::new("created", ValueType::new(FieldType::Date))
            .gte(Value::Date(day))
            .with_time_zone("+01:00");
        assert_eq!(
            query.render(),
            json!({"range": {"created": {
                "gte": day.timestamp_millis(),
                "boost": 1.0,
                "format": "epoch_millis",
                "time_zone": "+01:00",
            }}})
        );
    }
}
