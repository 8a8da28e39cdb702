//! Match all query - matches every document in the index

use serde_json::{json, Map, Value as Json};

/// Query that matches all documents
///
/// Absorbs any other node under union and is neutral under intersect.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchAllQuery {
    /// Boost factor for scoring
    pub boost: f64,
}

impl Default for MatchAllQuery {
    fn default() -> Self {
        Self { boost: 1.0 }
    }
}

impl MatchAllQuery {
    /// Create a new match all query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        if self.boost != 1.0 {
            body.insert("boost".to_string(), json!(self.boost));
        }
        json!({ "match_all": body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all_query_creation() {
        let query = MatchAllQuery::new();
        assert_eq!(query.boost, 1.0);
    }

    #[test]
    fn test_render() {
        assert_eq!(MatchAllQuery::new().render(), json!({"match_all": {}}));
        assert_eq!(
            MatchAllQuery::new().with_boost(2.0).render(),
            json!({"match_all": {"boost": 2.0}})
        );
    }
}
