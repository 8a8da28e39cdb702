//! Query tree algebra
//!
//! This module provides the node types and the algebra that combines them:
//! - Leaf queries (term, terms, range, match, phrase, patterns, exists, ids)
//! - Boolean queries with must, filter, should and must_not buckets
//! - Union, intersection and inversion with in-place minimization
//! - Rendering to JSON query documents
//! - Compilation of typed conditions into minimal trees
//!
//! # Example
//!
//! ```json
//! {
//!   "bool": {
//!     "should": [
//!       { "range": { "x": { "gt": 78, "lt": 180, "boost": 1.0 } } },
//!       { "range": { "x": { "gt": 10, "lt": 50, "boost": 1.0 } } }
//!     ],
//!     "minimum_should_match": 1
//!   }
//! }
//! ```

pub mod ast;
pub mod compiler;
pub mod merge;
pub mod nodes;
pub mod render;
pub mod types;
pub mod value;

pub use ast::QueryNode;
pub use compiler::{Comparison, Condition, Expr, Modifiers, QueryCompiler};
pub use merge::{fold_nodes, reduce_nodes, MergeOp};
pub use nodes::{
    BoolQuery, ExistsQuery, FuzzyQuery, IdsQuery, MatchAllQuery, MatchQuery, Occur, PhraseQuery,
    PrefixQuery, QueryStringQuery, RangeQuery, RegexpQuery, TermQuery, TermsQuery, WildcardQuery,
};
pub use render::Document;
pub use types::*;
pub use value::Value;
