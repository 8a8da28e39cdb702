//! Merging pattern leaves with exact terms
//!
//! Prefix, wildcard, regexp and fuzzy queries each describe a set of terms.
//! On an unanalyzed string field, an exact term on the same field either
//! falls in that set or it does not, which is enough to absorb it under
//! union or keep it under intersect. Analyzed fields are matched against
//! tokens the compiler never sees, so nothing is merged there.

use crate::query::ast::QueryNode;
use crate::query::merge::{and_pair, check_boost, or_pair};
use crate::query::nodes::TermsQuery;
use crate::query::types::ValueType;
use crate::query::value::Value;
use crate::schema::TypeFamily;
use crate::Result;

/// A leaf that matches a set of terms
pub trait TermMatcher {
    fn field(&self) -> &str;

    fn boost(&self) -> f64;

    fn value_type(&self) -> ValueType;

    /// Check whether a single term belongs to the matched set
    fn matches(&self, term: &str) -> Result<bool>;

    /// Check a batch of terms, paying any pattern compilation once
    fn matches_each(&self, terms: &[&str]) -> Result<Vec<bool>> {
        terms.iter().map(|term| self.matches(term)).collect()
    }
}

/// Values of a term-like node split by whether the pattern matches them
struct Partition {
    field: String,
    boost: f64,
    matched: Vec<Value>,
    unmatched: Vec<Value>,
}

fn partition(pattern: &QueryNode, terms: &QueryNode) -> Result<Option<Partition>> {
    let Some(matcher) = pattern.as_matcher() else {
        return Ok(None);
    };
    let value_type = matcher.value_type();
    if value_type.field_type.family() != TypeFamily::String || value_type.field_type.is_analyzed() {
        return Ok(None);
    }

    let values = match terms {
        QueryNode::Term(t) => vec![t.value.clone()],
        QueryNode::Terms(t) => t.values.clone(),
        _ => return Ok(None),
    };

    let strings: Vec<&str> = values.iter().filter_map(Value::as_str).collect();
    let mut hits = matcher.matches_each(&strings)?.into_iter();

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for value in values {
        let hit = match value.as_str() {
            Some(_) => hits.next().unwrap_or(false),
            None => false,
        };
        if hit {
            matched.push(value);
        } else {
            unmatched.push(value);
        }
    }

    Ok(Some(Partition {
        field: matcher.field().to_string(),
        boost: matcher.boost(),
        matched,
        unmatched,
    }))
}

fn rebuild(terms: &QueryNode, values: Vec<Value>) -> QueryNode {
    match terms {
        QueryNode::Term(t) => TermsQuery::new(t.field.clone(), values, t.value_type)
            .with_boost(t.boost)
            .with_filter(t.filter)
            .into_node(),
        QueryNode::Terms(t) => TermsQuery::new(t.field.clone(), values, t.value_type)
            .with_boost(t.boost)
            .with_filter(t.filter)
            .into_node(),
        _ => QueryNode::Empty,
    }
}

/// Union of a pattern leaf and a term-like leaf
///
/// Matched values are absorbed by the pattern; the remainder stays beside
/// it under `should`.
pub fn union_join(pattern: QueryNode, terms: QueryNode) -> Result<QueryNode> {
    let Some(split) = partition(&pattern, &terms)? else {
        return Ok(or_pair(pattern, terms));
    };
    if split.matched.is_empty() {
        return Ok(or_pair(pattern, terms));
    }
    check_boost(&split.field, split.boost, terms.boost())?;
    if split.unmatched.is_empty() {
        return Ok(pattern);
    }
    let residual = rebuild(&terms, split.unmatched);
    Ok(or_pair(pattern, residual))
}

/// Intersection of a pattern leaf and a term-like leaf
///
/// The pattern is implied by any value it matches, so the matched values
/// replace both operands. On an array field this only holds when every
/// value matches.
pub fn intersect(pattern: QueryNode, terms: QueryNode) -> Result<QueryNode> {
    let Some(split) = partition(&pattern, &terms)? else {
        return Ok(and_pair(pattern, terms));
    };
    let is_array = pattern
        .as_matcher()
        .map(|m| m.value_type().is_array)
        .unwrap_or(false);
    let collapses = if is_array {
        split.unmatched.is_empty()
    } else {
        !split.matched.is_empty()
    };
    if !collapses {
        return Ok(and_pair(pattern, terms));
    }
    check_boost(&split.field, split.boost, terms.boost())?;
    Ok(rebuild(&terms, split.matched))
}
