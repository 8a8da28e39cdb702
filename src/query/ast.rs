//! Query node tree
//!
//! This module defines [`QueryNode`], the closed set of condition kinds a
//! compiled query is built from, and the pairwise dispatch of the node
//! algebra: union, intersection and inversion. Each pairwise rule lives on
//! the concrete node type; the `match` expressions here decide which rule
//! applies to a pair so that adding a new kind fails to compile until every
//! interaction is considered.

use crate::error::BoolqError;
use crate::query::merge::{and_pair, check_boost, or_pair};
use crate::query::nodes::{
    pattern, BoolQuery, ExistsQuery, FuzzyQuery, IdsQuery, MatchAllQuery, MatchQuery,
    PhraseQuery, PrefixQuery, QueryStringQuery, RangeQuery, RegexpQuery, TermQuery, TermsQuery,
    WildcardQuery,
};
use crate::query::types::MergeKey;
use crate::Result;
use tracing::trace;

/// Reserved merge key for `ids` conditions
pub const IDS_FIELD: &str = "_id";

/// Reserved merge key for `match_all` conditions
pub const MATCH_ALL_FIELD: &str = "*";

/// A node of the query tree
///
/// Nodes are owned values: every algebra operation consumes its operands and
/// returns the resulting node.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryNode {
    Term(TermQuery),
    Terms(TermsQuery),
    Range(RangeQuery),
    Match(MatchQuery),
    MatchPhrase(PhraseQuery),
    MatchPhrasePrefix(PhraseQuery),
    Prefix(PrefixQuery),
    Wildcard(WildcardQuery),
    Regexp(RegexpQuery),
    Fuzzy(FuzzyQuery),
    Exists(ExistsQuery),
    Ids(IdsQuery),
    QueryString(QueryStringQuery),
    MatchAll(MatchAllQuery),
    /// No condition at all; the neutral element of union and intersect
    Empty,
    Bool(BoolQuery),
}

impl QueryNode {
    /// Get the node kind name, as used in rendered documents
    pub fn kind(&self) -> &'static str {
        match self {
            QueryNode::Term(_) => "term",
            QueryNode::Terms(_) => "terms",
            QueryNode::Range(_) => "range",
            QueryNode::Match(_) => "match",
            QueryNode::MatchPhrase(_) => "match_phrase",
            QueryNode::MatchPhrasePrefix(_) => "match_phrase_prefix",
            QueryNode::Prefix(_) => "prefix",
            QueryNode::Wildcard(_) => "wildcard",
            QueryNode::Regexp(_) => "regexp",
            QueryNode::Fuzzy(_) => "fuzzy",
            QueryNode::Exists(_) => "exists",
            QueryNode::Ids(_) => "ids",
            QueryNode::QueryString(_) => "query_string",
            QueryNode::MatchAll(_) => "match_all",
            QueryNode::Empty => "empty",
            QueryNode::Bool(_) => "bool",
        }
    }

    /// Get the field this node constrains, if it is a field-level leaf
    pub fn field(&self) -> Option<&str> {
        match self {
            QueryNode::Term(q) => Some(&q.field),
            QueryNode::Terms(q) => Some(&q.field),
            QueryNode::Range(q) => Some(&q.field),
            QueryNode::Match(q) => Some(&q.field),
            QueryNode::MatchPhrase(q) | QueryNode::MatchPhrasePrefix(q) => Some(&q.field),
            QueryNode::Prefix(q) => Some(&q.field),
            QueryNode::Wildcard(q) => Some(&q.field),
            QueryNode::Regexp(q) => Some(&q.field),
            QueryNode::Fuzzy(q) => Some(&q.field),
            QueryNode::Exists(q) => Some(&q.field),
            QueryNode::QueryString(q) => q.default_field.as_deref(),
            QueryNode::Ids(_) | QueryNode::MatchAll(_) | QueryNode::Empty | QueryNode::Bool(_) => {
                None
            }
        }
    }

    /// Get the bucket key this node is grouped under inside a bool node
    pub fn key(&self) -> MergeKey {
        match self {
            QueryNode::Bool(_) => MergeKey::Operator,
            QueryNode::Ids(_) => MergeKey::field(IDS_FIELD),
            QueryNode::MatchAll(_) => MergeKey::field(MATCH_ALL_FIELD),
            QueryNode::QueryString(q) => MergeKey::field(q.default_field.clone().unwrap_or_default()),
            QueryNode::Empty => MergeKey::field(""),
            other => MergeKey::field(other.field().unwrap_or_default()),
        }
    }

    /// Whether this is an operator (bool) node
    pub fn is_operator(&self) -> bool {
        matches!(self, QueryNode::Bool(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            QueryNode::Empty => true,
            QueryNode::Bool(b) => b.is_empty(),
            _ => false,
        }
    }

    /// Get the boost factor of a leaf (1.0 for nodes without one)
    pub fn boost(&self) -> f64 {
        match self {
            QueryNode::Term(q) => q.boost,
            QueryNode::Terms(q) => q.boost,
            QueryNode::Range(q) => q.boost,
            QueryNode::Match(q) => q.boost,
            QueryNode::MatchPhrase(q) | QueryNode::MatchPhrasePrefix(q) => q.boost,
            QueryNode::Prefix(q) => q.boost,
            QueryNode::Wildcard(q) => q.boost,
            QueryNode::Regexp(q) => q.boost,
            QueryNode::Fuzzy(q) => q.boost,
            QueryNode::Ids(q) => q.boost,
            QueryNode::QueryString(q) => q.boost,
            QueryNode::MatchAll(q) => q.boost,
            QueryNode::Exists(_) | QueryNode::Empty | QueryNode::Bool(_) => 1.0,
        }
    }

    fn set_boost(&mut self, boost: f64) {
        match self {
            QueryNode::Term(q) => q.boost = boost,
            QueryNode::Terms(q) => q.boost = boost,
            QueryNode::Range(q) => q.boost = boost,
            QueryNode::Match(q) => q.boost = boost,
            QueryNode::MatchPhrase(q) | QueryNode::MatchPhrasePrefix(q) => q.boost = boost,
            QueryNode::Prefix(q) => q.boost = boost,
            QueryNode::Wildcard(q) => q.boost = boost,
            QueryNode::Regexp(q) => q.boost = boost,
            QueryNode::Fuzzy(q) => q.boost = boost,
            QueryNode::Ids(q) => q.boost = boost,
            QueryNode::QueryString(q) => q.boost = boost,
            QueryNode::MatchAll(q) => q.boost = boost,
            QueryNode::Exists(_) | QueryNode::Empty | QueryNode::Bool(_) => {}
        }
    }

    /// Whether the leaf participates in filter context (no scoring)
    pub fn is_filter(&self) -> bool {
        match self {
            QueryNode::Term(q) => q.filter,
            QueryNode::Terms(q) => q.filter,
            QueryNode::Range(q) => q.filter,
            QueryNode::Match(q) => q.filter,
            QueryNode::MatchPhrase(q) | QueryNode::MatchPhrasePrefix(q) => q.filter,
            QueryNode::Prefix(q) => q.filter,
            QueryNode::Wildcard(q) => q.filter,
            QueryNode::Regexp(q) => q.filter,
            QueryNode::Fuzzy(q) => q.filter,
            QueryNode::Exists(q) => q.filter,
            QueryNode::Ids(_)
            | QueryNode::QueryString(_)
            | QueryNode::MatchAll(_)
            | QueryNode::Empty
            | QueryNode::Bool(_) => false,
        }
    }

    /// Compute the logical OR of two nodes
    pub fn union_join(self, other: QueryNode) -> Result<QueryNode> {
        trace!(left = self.kind(), right = other.kind(), "union_join");
        if self == other {
            return Ok(self);
        }
        match (self, other) {
            (QueryNode::Empty, other) => Ok(other),
            (node, QueryNode::Empty) => Ok(node),
            (QueryNode::MatchAll(q), _) | (_, QueryNode::MatchAll(q)) => Ok(QueryNode::MatchAll(q)),
            (QueryNode::Bool(b), other) | (other, QueryNode::Bool(b)) => b.union_join(other),
            (a, b) if a.key() != b.key() => Ok(or_pair(a, b)),
            (a, b) => leaf_union(a, b),
        }
    }

    /// Compute the logical AND of two nodes
    pub fn intersect(self, other: QueryNode) -> Result<QueryNode> {
        trace!(left = self.kind(), right = other.kind(), "intersect");
        if self == other {
            return Ok(self);
        }
        match (self, other) {
            (QueryNode::Empty, other) => Ok(other),
            (node, QueryNode::Empty) => Ok(node),
            (QueryNode::MatchAll(_), other) | (other, QueryNode::MatchAll(_)) => Ok(other),
            (QueryNode::Bool(b), other) | (other, QueryNode::Bool(b)) => b.intersect(other),
            (a, b) if a.key() != b.key() => Ok(and_pair(a, b)),
            (a, b) => leaf_intersect(a, b),
        }
    }

    /// Compute the logical NOT of this node
    pub fn inverse(self) -> Result<QueryNode> {
        trace!(kind = self.kind(), "inverse");
        match self {
            QueryNode::Empty => Err(BoolqError::NilOperand("inverse")),
            QueryNode::Range(r) => r.inverse(),
            QueryNode::Terms(t) => Ok(t.inverse()),
            QueryNode::Bool(b) => b.inverse(),
            leaf => Ok(QueryNode::Bool(BoolQuery::not().must_not(leaf))),
        }
    }

    /// View a pattern leaf as a term matcher
    pub(crate) fn as_matcher(&self) -> Option<&dyn pattern::TermMatcher> {
        match self {
            QueryNode::Prefix(q) => Some(q),
            QueryNode::Wildcard(q) => Some(q),
            QueryNode::Regexp(q) => Some(q),
            QueryNode::Fuzzy(q) => Some(q),
            _ => None,
        }
    }
}

/// Whether two leaves express the same condition apart from boost and
/// scoring context
fn same_condition(a: &QueryNode, b: &QueryNode) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_boost(1.0);
    b.set_boost(1.0);
    strip_filter(&mut a);
    strip_filter(&mut b);
    a == b
}

fn strip_filter(node: &mut QueryNode) {
    match node {
        QueryNode::Term(q) => q.filter = false,
        QueryNode::Terms(q) => q.filter = false,
        QueryNode::Range(q) => q.filter = false,
        QueryNode::Match(q) => q.filter = false,
        QueryNode::MatchPhrase(q) | QueryNode::MatchPhrasePrefix(q) => q.filter = false,
        QueryNode::Prefix(q) => q.filter = false,
        QueryNode::Wildcard(q) => q.filter = false,
        QueryNode::Regexp(q) => q.filter = false,
        QueryNode::Fuzzy(q) => q.filter = false,
        QueryNode::Exists(q) => q.filter = false,
        _ => {}
    }
}

fn is_term_like(node: &QueryNode) -> bool {
    matches!(node, QueryNode::Term(_) | QueryNode::Terms(_))
}

/// Union of two leaves sharing a merge key
fn leaf_union(a: QueryNode, b: QueryNode) -> Result<QueryNode> {
    match (a, b) {
        (QueryNode::Exists(e), _) | (_, QueryNode::Exists(e)) => Ok(QueryNode::Exists(e)),
        (QueryNode::Ids(x), QueryNode::Ids(y)) => x.union_join(y),
        (QueryNode::Ids(_), other) | (other, QueryNode::Ids(_)) => Err(BoolqError::TypeMismatch {
            left: "ids",
            right: other.kind(),
        }),
        (QueryNode::Term(x), QueryNode::Term(y)) => x.union_join(y),
        (QueryNode::Terms(x), QueryNode::Term(y)) | (QueryNode::Term(y), QueryNode::Terms(x)) => {
            x.union_join_term(y)
        }
        (QueryNode::Terms(x), QueryNode::Terms(y)) => x.union_join(y),
        (QueryNode::Range(x), QueryNode::Range(y)) => x.union_join(y),
        (QueryNode::Range(r), QueryNode::Term(t)) | (QueryNode::Term(t), QueryNode::Range(r)) => {
            r.union_join_term(t)
        }
        (QueryNode::Range(r), QueryNode::Terms(t)) | (QueryNode::Terms(t), QueryNode::Range(r)) => {
            r.union_join_terms(t)
        }
        (p, t) if p.as_matcher().is_some() && is_term_like(&t) => pattern::union_join(p, t),
        (t, p) if p.as_matcher().is_some() && is_term_like(&t) => pattern::union_join(p, t),
        (a, b) if same_condition(&a, &b) => {
            check_boost(a.field().unwrap_or_default(), a.boost(), b.boost())?;
            Ok(a)
        }
        (a, b) => Ok(or_pair(a, b)),
    }
}

/// Intersection of two leaves sharing a merge key
fn leaf_intersect(a: QueryNode, b: QueryNode) -> Result<QueryNode> {
    match (a, b) {
        (QueryNode::Exists(_), other) | (other, QueryNode::Exists(_)) => Ok(other),
        (QueryNode::Ids(x), QueryNode::Ids(y)) => x.intersect(y),
        (QueryNode::Ids(_), other) | (other, QueryNode::Ids(_)) => Err(BoolqError::TypeMismatch {
            left: "ids",
            right: other.kind(),
        }),
        (QueryNode::Term(x), QueryNode::Term(y)) => x.intersect(y),
        (QueryNode::Terms(x), QueryNode::Term(y)) | (QueryNode::Term(y), QueryNode::Terms(x)) => {
            x.intersect_term(y)
        }
        (QueryNode::Terms(x), QueryNode::Terms(y)) => x.intersect(y),
        (QueryNode::Range(x), QueryNode::Range(y)) => x.intersect(y),
        (QueryNode::Range(r), QueryNode::Term(t)) | (QueryNode::Term(t), QueryNode::Range(r)) => {
            r.intersect_term(t)
        }
        (QueryNode::Range(r), QueryNode::Terms(t)) | (QueryNode::Terms(t), QueryNode::Range(r)) => {
            r.intersect_terms(t)
        }
        (p, t) if p.as_matcher().is_some() && is_term_like(&t) => pattern::intersect(p, t),
        (t, p) if p.as_matcher().is_some() && is_term_like(&t) => pattern::intersect(p, t),
        (a, b) if same_condition(&a, &b) => {
            check_boost(a.field().unwrap_or_default(), a.boost(), b.boost())?;
            Ok(a)
        }
        (a, b) => Ok(and_pair(a, b)),
    }
}

impl From<BoolQuery> for QueryNode {
    fn from(query: BoolQuery) -> Self {
        QueryNode::Bool(query)
    }
}

impl From<TermQuery> for QueryNode {
    fn from(query: TermQuery) -> Self {
        QueryNode::Term(query)
    }
}

impl From<TermsQuery> for QueryNode {
    fn from(query: TermsQuery) -> Self {
        query.into_node()
    }
}

impl From<RangeQuery> for QueryNode {
    fn from(query: RangeQuery) -> Self {
        QueryNode::Range(query)
    }
}

impl From<MatchQuery> for QueryNode {
    fn from(query: MatchQuery) -> Self {
        QueryNode::Match(query)
    }
}

impl From<PrefixQuery> for QueryNode {
    fn from(query: PrefixQuery) -> Self {
        QueryNode::Prefix(query)
    }
}

impl From<WildcardQuery> for QueryNode {
    fn from(query: WildcardQuery) -> Self {
        QueryNode::Wildcard(query)
    }
}

impl From<RegexpQuery> for QueryNode {
    fn from(query: RegexpQuery) -> Self {
        QueryNode::Regexp(query)
    }
}

impl From<FuzzyQuery> for QueryNode {
    fn from(query: FuzzyQuery) -> Self {
        QueryNode::Fuzzy(query)
    }
}

impl From<ExistsQuery> for QueryNode {
    fn from(query: ExistsQuery) -> Self {
        QueryNode::Exists(query)
    }
}

impl From<IdsQuery> for QueryNode {
    fn from(query: IdsQuery) -> Self {
        QueryNode::Ids(query)
    }
}

impl From<QueryStringQuery> for QueryNode {
    fn from(query: QueryStringQuery) -> Self {
        QueryNode::QueryString(query)
    }
}

impl From<MatchAllQuery> for QueryNode {
    fn from(query: MatchAllQuery) -> Self {
        QueryNode::MatchAll(query)
    }
}
