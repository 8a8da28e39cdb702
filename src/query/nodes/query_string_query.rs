//! Query string query - a raw search-engine query string passed through
//!
//! The string is not parsed here; it only merges with an identical copy.

use serde_json::{json, Map, Value as Json};

/// Query holding a raw query-string expression
#[derive(Clone, Debug, PartialEq)]
pub struct QueryStringQuery {
    pub query: String,
    /// Field searched by terms without an explicit field
    pub default_field: Option<String>,
    /// Boost factor for scoring
    pub boost: f64,
}

impl QueryStringQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            default_field: None,
            boost: 1.0,
        }
    }

    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        body.insert("query".to_string(), json!(self.query));
        if let Some(field) = &self.default_field {
            body.insert("default_field".to_string(), json!(field));
        }
        body.insert("boost".to_string(), json!(self.boost));
        json!({ "query_string": body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let query = QueryStringQuery::new("rust AND (search OR index)").with_default_field("body");
        assert_eq!(
            query.render(),
            json!({"query_string": {
                "query": "rust AND (search OR index)",
                "default_field": "body",
                "boost": 1.0,
            }})
        );
    }
}
