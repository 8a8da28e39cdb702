//! Rendering compiled nodes to query documents
//!
//! Rendering is a pure recursive walk. Every node renders to a JSON object;
//! an empty tree renders to `{}`.

use crate::query::ast::QueryNode;
use serde_json::{json, Value as Json};

/// A rendered query document
pub type Document = Json;

impl QueryNode {
    /// Render this node to its query document
    pub fn render(&self) -> Document {
        match self {
            QueryNode::Term(q) => q.render(),
            QueryNode::Terms(q) => q.render(),
            QueryNode::Range(q) => q.render(),
            QueryNode::Match(q) => q.render(),
            QueryNode::MatchPhrase(q) => q.render("match_phrase"),
            QueryNode::MatchPhrasePrefix(q) => q.render("match_phrase_prefix"),
            QueryNode::Prefix(q) => q.render(),
            QueryNode::Wildcard(q) => q.render(),
            QueryNode::Regexp(q) => q.render(),
            QueryNode::Fuzzy(q) => q.render(),
            QueryNode::Exists(q) => q.render(),
            QueryNode::Ids(q) => q.render(),
            QueryNode::QueryString(q) => q.render(),
            QueryNode::MatchAll(q) => q.render(),
            QueryNode::Empty => json!({}),
            QueryNode::Bool(q) => q.render(),
        }
    }

    /// Render wrapped in a top-level `{"query": ...}` request body
    pub fn to_request(&self) -> Document {
        json!({ "query": self.render() })
    }
}
