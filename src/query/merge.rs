//! Merge engine
//!
//! Reduces the children grouped under one bucket key to a short list of
//! pairwise-irreducible nodes. A new child is merged greedily left to right
//! against the existing ones; whenever a merge collapses into a single
//! non-operator node, that node replaces the earlier sibling and is tried
//! again against the rest. The reduction is order-sensitive: it reaches a
//! fixpoint, not a global minimum.

use crate::error::BoolqError;
use crate::query::ast::QueryNode;
use crate::query::nodes::BoolQuery;
use crate::Result;
use tracing::{debug, trace};

/// Logical operation applied by the merge engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOp {
    Union,
    Intersect,
}

impl MergeOp {
    /// Apply this operation to two nodes
    pub fn apply(self, left: QueryNode, right: QueryNode) -> Result<QueryNode> {
        match self {
            MergeOp::Union => left.union_join(right),
            MergeOp::Intersect => left.intersect(right),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MergeOp::Union => "union",
            MergeOp::Intersect => "intersect",
        }
    }
}

/// Merge `node` into a list of siblings sharing one bucket key
///
/// Operator nodes are appended without merge attempts. If no sibling merges
/// with `node` and every attempted merge failed, the last failure is
/// returned and the list is left untouched, including siblings that had
/// already collapsed into `node` before the failure.
pub fn reduce_nodes(nodes: &mut Vec<QueryNode>, node: QueryNode, op: MergeOp) -> Result<()> {
    if node.is_operator() {
        nodes.push(node);
        return Ok(());
    }

    // written back only once the merge succeeds
    let mut working = nodes.clone();
    let mut pending = node;
    let mut slot: Option<usize> = None;

    loop {
        let mut collapsed = None;
        let mut attempts = 0usize;
        let mut failures = 0usize;
        let mut last_error: Option<BoolqError> = None;

        for (i, existing) in working.iter().enumerate() {
            if existing.is_operator() {
                continue;
            }
            attempts += 1;
            match op.apply(existing.clone(), pending.clone()) {
                Ok(result) if !result.is_operator() => {
                    collapsed = Some((i, result));
                    break;
                }
                Ok(_) => {
                    trace!(op = op.name(), index = i, "merge kept both operands");
                }
                Err(err) => {
                    trace!(op = op.name(), index = i, error = %err, "merge failed");
                    failures += 1;
                    last_error = Some(err);
                }
            }
        }

        match collapsed {
            Some((i, result)) => {
                debug!(
                    op = op.name(),
                    key = %result.key(),
                    index = i,
                    kind = result.kind(),
                    "collapsed sibling"
                );
                working.remove(i);
                slot = Some(slot.map_or(i, |s| s.min(i)));
                pending = result;
            }
            None => {
                if attempts > 0 && failures == attempts {
                    if let Some(err) = last_error {
                        return Err(err);
                    }
                }
                debug!(op = op.name(), key = %pending.key(), "appended sibling");
                match slot {
                    Some(s) => working.insert(s, pending),
                    None => working.push(pending),
                }
                *nodes = working;
                return Ok(());
            }
        }
    }
}

/// Reduce a whole list of same-key nodes, folding them in order
pub fn reduce_all(nodes: Vec<QueryNode>, op: MergeOp) -> Result<Vec<QueryNode>> {
    let mut reduced = Vec::with_capacity(nodes.len());
    for node in nodes {
        reduce_nodes(&mut reduced, node, op)?;
    }
    Ok(reduced)
}

/// Fold any number of nodes with one operation
///
/// Fails with `NilOperand` when there is nothing to fold.
pub fn fold_nodes(nodes: impl IntoIterator<Item = QueryNode>, op: MergeOp) -> Result<QueryNode> {
    let mut iter = nodes.into_iter();
    let first = iter.next().ok_or(BoolqError::NilOperand(op.name()))?;
    iter.try_fold(first, |acc, node| op.apply(acc, node))
}

/// Fail with `BoostConflict` unless two boosts are identical
pub fn check_boost(field: &str, left: f64, right: f64) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(BoolqError::BoostConflict {
            field: field.to_string(),
            left,
            right,
        })
    }
}

/// Keep two nodes side by side under `should` (OR)
pub fn or_pair(left: QueryNode, right: QueryNode) -> QueryNode {
    QueryNode::Bool(BoolQuery::or().should(left).should(right))
}

/// Keep two nodes side by side under `must`/`filter` (AND)
pub fn and_pair(left: QueryNode, right: QueryNode) -> QueryNode {
    QueryNode::Bool(BoolQuery::and().conjunct(left).conjunct(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::nodes::{RangeQuery, TermQuery};
    use crate::query::types::ValueType;
    use crate::schema::FieldType;

    fn long() -> ValueType {
        ValueType::new(FieldType::Long)
    }

    fn range(lower: i64, upper: i64) -> QueryNode {
        RangeQuery::new("x", long()).gt(lower).lt(upper).into()
    }

    #[test]
    fn test_reduce_collapses_overlapping() {
        let mut nodes = vec![range(1, 5), range(10, 20)];
        reduce_nodes(&mut nodes, range(4, 12), MergeOp::Union).unwrap();

        // (4,12) joins (1,5) into (1,12), which then joins (10,20)
        assert_eq!(nodes, vec![range(1, 20)]);
    }

    #[test]
    fn test_reduce_appends_irreducible() {
        let mut nodes = vec![range(1, 5)];
        reduce_nodes(&mut nodes, range(10, 20), MergeOp::Union).unwrap();
        assert_eq!(nodes, vec![range(1, 5), range(10, 20)]);
    }

    #[test]
    fn test_reduce_keeps_slot_of_first_merge() {
        let mut nodes = vec![range(30, 40), range(1, 5), range(50, 60)];
        reduce_nodes(&mut nodes, range(2, 8), MergeOp::Union).unwrap();
        assert_eq!(nodes, vec![range(30, 40), range(1, 8), range(50, 60)]);
    }

    #[test]
    fn test_reduce_propagates_conflict() {
        let term = |v: i64| -> QueryNode { TermQuery::new("x", v, long()).into() };
        let mut nodes = vec![term(1)];
        let err = reduce_nodes(&mut nodes, term(2), MergeOp::Intersect).unwrap_err();
        assert!(matches!(err, BoolqError::ValueConflict { .. }));
        assert_eq!(nodes, vec![term(1)]);
    }

    #[test]
    fn test_reduce_restores_collapsed_siblings_on_conflict() {
        let term = |v: i64| -> QueryNode { TermQuery::new("x", v, long()).into() };
        let bounded: QueryNode = RangeQuery::new("x", long()).gte(0i64).lte(10i64).into();

        let mut nodes = Vec::new();
        reduce_nodes(&mut nodes, bounded.clone(), MergeOp::Intersect).unwrap();
        reduce_nodes(&mut nodes, term(20), MergeOp::Intersect).unwrap();
        assert_eq!(nodes, vec![bounded.clone(), term(20)]);

        // 5 collapses into the range first, then conflicts with 20
        let err = reduce_nodes(&mut nodes, term(5), MergeOp::Intersect).unwrap_err();
        assert!(matches!(err, BoolqError::ValueConflict { .. }));
        assert_eq!(nodes, vec![bounded, term(20)]);
    }

    #[test]
    fn test_fold_nodes() {
        let folded = fold_nodes(vec![range(1, 5), range(3, 9)], MergeOp::Intersect).unwrap();
        assert_eq!(folded, range(3, 5));

        let err = fold_nodes(Vec::new(), MergeOp::Union).unwrap_err();
        assert_eq!(err, BoolqError::NilOperand("union"));
    }

    #[test]
    fn test_check_boost() {
        assert!(check_boost("x", 1.0, 1.0).is_ok());
        assert!(matches!(
            check_boost("x", 1.0, 2.0),
            Err(BoolqError::BoostConflict { .. })
        ));
    }
}
