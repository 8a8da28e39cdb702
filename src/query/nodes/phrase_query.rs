//! Phrase query - matches exact phrases with optional proximity/slop
//!
//! The same body backs both `match_phrase` and `match_phrase_prefix`; the
//! node variant decides which one is rendered.
//!
//! # Example
//!
//! ```rust
//! use boolq::query::nodes::PhraseQuery;
//! use boolq::query::types::ValueType;
//! use boolq::schema::FieldType;
//!
//! // Phrase with slop (allows 2 terms between)
//! let query = PhraseQuery::new("content", "rust programming", ValueType::new(FieldType::Text))
//!     .with_slop(2);
//! ```

use crate::query::types::ValueType;
use serde_json::{json, Map, Value as Json};

/// Query that matches an ordered phrase of terms
#[derive(Clone, Debug, PartialEq)]
pub struct PhraseQuery {
    /// Field to search in
    pub field: String,
    /// The phrase to match (will be analyzed)
    pub phrase: String,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    pub analyzer: Option<String>,
    /// Maximum number of positions between terms
    pub slop: Option<u32>,
    /// Expansions of the last term, for prefix phrases
    pub max_expansions: Option<usize>,
}

impl PhraseQuery {
    /// Create a new phrase query
    pub fn new(field: impl Into<String>, phrase: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            phrase: phrase.into(),
            value_type,
            boost: 1.0,
            filter: false,
            analyzer: None,
            slop: None,
            max_expansions: None,
        }
    }

    /// Set the slop (maximum positions between terms)
    ///
    /// - slop=0: exact phrase match (terms must be adjacent)
    /// - slop=1: one term can appear between phrase terms
    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
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

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    /// Get the phrase words, split on whitespace
    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    /// Render under the given query kind
    pub fn render(&self, kind: &str) -> Json {
        let mut body = Map::new();
        body.insert("query".to_string(), json!(self.phrase));
        body.insert("boost".to_string(), json!(self.boost));
        if let Some(analyzer) = &self.analyzer {
            body.insert("analyzer".to_string(), json!(analyzer));
        }
        if let Some(slop) = self.slop {
            body.insert("slop".to_string(), json!(slop));
        }
        if let Some(max_expansions) = self.max_expansions {
            body.insert("max_expansions".to_string(), json!(max_expansions));
        }
        json!({ kind: { self.field.clone(): body } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn phrase(text: &str) -> PhraseQuery {
        PhraseQuery::new("content", text, ValueType::new(FieldType::Text))
    }

    #[test]
    fn test_phrase_query_creation() {
        let query = phrase("rust programming");
        assert_eq!(query.field, "content");
        assert_eq!(query.phrase, "rust programming");
        assert_eq!(query.slop, None);
        assert_eq!(query.boost, 1.0);
    }

    #[test]
    fn test_phrase_query_with_slop() {
        let query = phrase("rust programming").with_slop(2);
        assert_eq!(query.slop, Some(2));
    }

    #[test]
    fn test_words() {
        let query = phrase("  the quick   brown fox ");
        assert_eq!(query.words(), vec!["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_render() {
        let query = phrase("rust lang").with_slop(1).with_analyzer("standard");
        assert_eq!(
            query.render("match_phrase"),
            json!({"match_phrase": {"content": {
                "query": "rust lang",
                "boost": 1.0,
                "analyzer": "standard",
                "slop": 1,
            }}})
        );

        let rendered = phrase("rust la").with_max_expansions(20).render("match_phrase_prefix");
        assert_eq!(
            rendered["match_phrase_prefix"]["content"]["max_expansions"],
            json!(20)
        );
    }
}
