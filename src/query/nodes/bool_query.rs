//! Boolean query - combines multiple clauses with AND, OR, NOT semantics

use crate::error::BoolqError;
use crate::query::ast::QueryNode;
use crate::query::merge::{and_pair, or_pair, reduce_nodes, MergeOp};
use crate::query::types::{MergeKey, Operators};
use crate::Result;
use indexmap::IndexMap;
use serde_json::{json, Map, Value as Json};
use tracing::debug;

/// Children of one clause kind, grouped by merge key in insertion order
pub type Bucket = IndexMap<MergeKey, Vec<QueryNode>>;

/// Clause kind of a bool query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occur {
    Must,
    Filter,
    Should,
    MustNot,
}

impl Occur {
    pub const ALL: [Occur; 4] = [Occur::Must, Occur::Filter, Occur::Should, Occur::MustNot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Filter => "filter",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }

    fn operator(&self) -> Operators {
        match self {
            Occur::Must | Occur::Filter => Operators::AND,
            Occur::Should => Operators::OR,
            Occur::MustNot => Operators::NOT,
        }
    }
}

/// Boolean query combining multiple clauses
///
/// The boolean query supports four types of clauses:
/// - `must`: All clauses must match (AND). Contributes to score.
/// - `should`: At least `minimum_should_match` clauses should match (OR).
/// - `must_not`: No clause must match (NOT). Does not contribute to score.
/// - `filter`: All clauses must match (AND). Does not contribute to score.
///
/// Inside each clause kind, children are grouped by [`MergeKey`]: leaves by
/// field, nested bool queries under the reserved operator key. Union and
/// intersect merge new children into the matching group through the merge
/// engine, so conditions on one field stay coalesced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoolQuery {
    must: Bucket,
    filter: Bucket,
    should: Bucket,
    must_not: Bucket,
    operators: Operators,
    minimum_should_match: u32,
}

impl BoolQuery {
    /// Create a new empty boolean query
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an AND-rooted query (`minimum_should_match` 0)
    pub fn and() -> Self {
        Self {
            operators: Operators::AND,
            ..Self::default()
        }
    }

    /// Create an OR-rooted query (`minimum_should_match` 1)
    pub fn or() -> Self {
        Self {
            operators: Operators::OR,
            minimum_should_match: 1,
            ..Self::default()
        }
    }

    /// Create a NOT-rooted query
    pub fn not() -> Self {
        Self {
            operators: Operators::NOT,
            ..Self::default()
        }
    }

    /// Add a must clause
    pub fn must(mut self, query: impl Into<QueryNode>) -> Self {
        self.push(Occur::Must, query.into());
        self
    }

    /// Add a filter clause
    pub fn filter(mut self, query: impl Into<QueryNode>) -> Self {
        self.push(Occur::Filter, query.into());
        self
    }

    /// Add a should clause
    pub fn should(mut self, query: impl Into<QueryNode>) -> Self {
        self.push(Occur::Should, query.into());
        self
    }

    /// Add a must_not clause
    pub fn must_not(mut self, query: impl Into<QueryNode>) -> Self {
        self.push(Occur::MustNot, query.into());
        self
    }

    /// Add a must or filter clause, depending on the node's filter context
    pub fn conjunct(self, query: impl Into<QueryNode>) -> Self {
        let query = query.into();
        if query.is_filter() {
            self.filter(query)
        } else {
            self.must(query)
        }
    }

    /// Set minimum should match
    pub fn with_minimum_should_match(mut self, count: u32) -> Self {
        self.minimum_should_match = count;
        self
    }

    pub fn minimum_should_match(&self) -> u32 {
        self.minimum_should_match
    }

    /// Get the operators this node was built from
    pub fn operators(&self) -> Operators {
        self.operators
    }

    pub fn bucket(&self, occur: Occur) -> &Bucket {
        match occur {
            Occur::Must => &self.must,
            Occur::Filter => &self.filter,
            Occur::Should => &self.should,
            Occur::MustNot => &self.must_not,
        }
    }

    fn bucket_mut(&mut self, occur: Occur) -> &mut Bucket {
        match occur {
            Occur::Must => &mut self.must,
            Occur::Filter => &mut self.filter,
            Occur::Should => &mut self.should,
            Occur::MustNot => &mut self.must_not,
        }
    }

    /// Iterate the children of one clause kind in render order
    pub fn clauses(&self, occur: Occur) -> impl Iterator<Item = &QueryNode> {
        self.bucket(occur).values().flatten()
    }

    pub fn must_clauses(&self) -> impl Iterator<Item = &QueryNode> {
        self.clauses(Occur::Must)
    }

    pub fn filter_clauses(&self) -> impl Iterator<Item = &QueryNode> {
        self.clauses(Occur::Filter)
    }

    pub fn should_clauses(&self) -> impl Iterator<Item = &QueryNode> {
        self.clauses(Occur::Should)
    }

    pub fn must_not_clauses(&self) -> impl Iterator<Item = &QueryNode> {
        self.clauses(Occur::MustNot)
    }

    /// Check if this is an empty query
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
    }

    /// Get total number of clauses
    pub fn clause_count(&self) -> usize {
        Occur::ALL
            .iter()
            .map(|occur| self.bucket(*occur).values().map(Vec::len).sum::<usize>())
            .sum()
    }

    /// Append a child without merging
    fn push(&mut self, occur: Occur, node: QueryNode) {
        if matches!(node, QueryNode::Empty) {
            return;
        }
        self.bucket_mut(occur)
            .entry(node.key())
            .or_default()
            .push(node);
        self.mark(occur);
    }

    /// Merge a child into the group sharing its key
    fn merge_into(&mut self, occur: Occur, node: QueryNode, op: MergeOp) -> Result<()> {
        if node.is_empty() {
            return Ok(());
        }
        let key = node.key();
        let bucket = self.bucket_mut(occur);
        match bucket.get_mut(&key) {
            Some(siblings) => reduce_nodes(siblings, node, op)?,
            None => {
                bucket.insert(key, vec![node]);
            }
        }
        self.mark(occur);
        Ok(())
    }

    fn mark(&mut self, occur: Occur) {
        self.operators |= occur.operator();
        if occur == Occur::Should && self.minimum_should_match == 0 {
            self.minimum_should_match = 1;
        }
    }

    /// Only `should` clauses, at most one of which needs to match
    fn is_disjunctive(&self) -> bool {
        !self.should.is_empty()
            && self.must.is_empty()
            && self.filter.is_empty()
            && self.must_not.is_empty()
            && self.minimum_should_match <= 1
    }

    fn into_disjuncts(self) -> Vec<QueryNode> {
        if self.is_disjunctive() {
            self.should.into_values().flatten().collect()
        } else {
            vec![QueryNode::Bool(self)]
        }
    }

    /// Collapse a query holding a single positive clause into that clause
    pub fn into_node(self) -> QueryNode {
        let single = self.clause_count() == 1
            && self.must_not.is_empty()
            && self.minimum_should_match <= 1;
        if !single {
            return QueryNode::Bool(self);
        }
        let BoolQuery {
            must,
            filter,
            should,
            ..
        } = self;
        [must, filter, should]
            .into_iter()
            .flat_map(|bucket| bucket.into_values().flatten())
            .next()
            .unwrap_or(QueryNode::Empty)
    }

    /// Compute the logical OR of this query and another node
    pub fn union_join(self, other: QueryNode) -> Result<QueryNode> {
        if self.is_empty() {
            return Ok(other);
        }
        match other {
            QueryNode::Bool(other) if other.is_empty() => Ok(QueryNode::Bool(self)),
            QueryNode::Bool(other) => {
                if self.is_disjunctive() {
                    let operators = other.operators;
                    self.absorb_disjuncts(other.into_disjuncts(), operators)
                } else if other.is_disjunctive() {
                    let operators = self.operators;
                    other.absorb_disjuncts(vec![QueryNode::Bool(self)], operators)
                } else {
                    debug!("nesting bool operands under should");
                    Ok(or_pair(QueryNode::Bool(self), QueryNode::Bool(other)))
                }
            }
            leaf if self.is_disjunctive() => self.absorb_disjuncts(vec![leaf], Operators::NONE),
            leaf => Ok(or_pair(QueryNode::Bool(self), leaf)),
        }
    }

    fn absorb_disjuncts(mut self, nodes: Vec<QueryNode>, operators: Operators) -> Result<QueryNode> {
        for node in nodes {
            self.merge_into(Occur::Should, node, MergeOp::Union)?;
        }
        self.operators |= operators;
        Ok(self.into_node())
    }

    /// Compute the logical AND of this query and another node
    pub fn intersect(mut self, other: QueryNode) -> Result<QueryNode> {
        if self.is_empty() {
            return Ok(other);
        }
        match other {
            QueryNode::Bool(other) if other.is_empty() => Ok(QueryNode::Bool(self)),
            QueryNode::Bool(other) => {
                if self.should.is_empty() || other.should.is_empty() {
                    self.absorb_conjuncts(other)?;
                    Ok(self.into_node())
                } else {
                    debug!("nesting bool operands under must");
                    Ok(and_pair(QueryNode::Bool(self), QueryNode::Bool(other)))
                }
            }
            leaf => {
                let occur = if leaf.is_filter() {
                    Occur::Filter
                } else {
                    Occur::Must
                };
                self.merge_into(occur, leaf, MergeOp::Intersect)?;
                Ok(self.into_node())
            }
        }
    }

    /// Fold every clause of `other` into this query
    ///
    /// At most one side may carry `should` clauses.
    fn absorb_conjuncts(&mut self, other: BoolQuery) -> Result<()> {
        let BoolQuery {
            must,
            filter,
            should,
            must_not,
            operators,
            minimum_should_match,
        } = other;

        for node in must.into_values().flatten() {
            self.merge_into(Occur::Must, node, MergeOp::Intersect)?;
        }
        for node in filter.into_values().flatten() {
            self.merge_into(Occur::Filter, node, MergeOp::Intersect)?;
        }
        // NOT a AND NOT b == NOT (a OR b)
        for node in must_not.into_values().flatten() {
            self.merge_into(Occur::MustNot, node, MergeOp::Union)?;
        }
        if !should.is_empty() {
            self.should = should;
            self.minimum_should_match = minimum_should_match.max(1);
        }
        self.operators |= operators;
        Ok(())
    }

    /// Compute the logical NOT of this query
    pub fn inverse(self) -> Result<QueryNode> {
        if self.is_empty() {
            return Err(BoolqError::NilOperand("inverse"));
        }
        let has_and = !self.must.is_empty() || !self.filter.is_empty();
        let has_or = !self.should.is_empty();
        let has_not = !self.must_not.is_empty();

        match (has_and, has_or, has_not) {
            (true, false, false) if self.clause_count() == 1 => match self.into_node() {
                QueryNode::Bool(b) => Ok(QueryNode::Bool(BoolQuery::not().must_not(b))),
                child => child.inverse(),
            },
            (false, true, false) if self.minimum_should_match <= 1 => {
                // NOT (a OR b) == NOT a AND NOT b
                let inverted = self
                    .should
                    .into_values()
                    .flatten()
                    .fold(BoolQuery::not(), |acc, node| acc.must_not(node));
                Ok(QueryNode::Bool(inverted))
            }
            (false, false, true) => {
                let mut children: Vec<QueryNode> = self.must_not.into_values().flatten().collect();
                if children.len() == 1 {
                    return Ok(children.remove(0));
                }
                let inverted = children
                    .into_iter()
                    .fold(BoolQuery::or(), |acc, node| acc.should(node));
                Ok(QueryNode::Bool(inverted))
            }
            _ => Ok(QueryNode::Bool(BoolQuery::not().must_not(self))),
        }
    }

    /// Render to the `bool` query document
    ///
    /// A query holding a single must/filter clause renders as that clause.
    pub fn render(&self) -> Json {
        if self.is_empty() {
            return json!({});
        }
        if self.should.is_empty() && self.must_not.is_empty() && self.clause_count() == 1 {
            if let Some(child) = self.must_clauses().chain(self.filter_clauses()).next() {
                return child.render();
            }
        }

        let mut body = Map::new();
        for occur in Occur::ALL {
            let mut docs: Vec<Json> = self.clauses(occur).map(QueryNode::render).collect();
            match docs.len() {
                0 => {}
                1 => {
                    body.insert(occur.as_str().to_string(), docs.remove(0));
                }
                _ => {
                    body.insert(occur.as_str().to_string(), Json::Array(docs));
                }
            }
        }
        if !self.should.is_empty() {
            body.insert(
                "minimum_should_match".to_string(),
                json!(self.minimum_should_match),
            );
        }
        json!({ "bool": body })
    }
}
