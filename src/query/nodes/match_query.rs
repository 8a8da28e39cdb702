//! Match query - full-text search with analysis

use crate::query::types::{Fuzziness, MatchOperator, ValueType};
use serde_json::{json, Map, Value as Json};

/// Query that performs full-text search on a field
///
/// The query text is analyzed by the search engine. Two match queries on
/// one field only merge when they carry the same text and options.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchQuery {
    /// Field to search in
    pub field: String,
    /// Text to search for (will be analyzed)
    pub query: String,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    /// Analyzer to use (if not specified, uses field's default analyzer)
    pub analyzer: Option<String>,
    /// How to combine terms (AND/OR)
    pub operator: Option<MatchOperator>,
    pub fuzziness: Option<Fuzziness>,
    pub max_expansions: Option<usize>,
}

impl MatchQuery {
    /// Create a new match query
    pub fn new(field: impl Into<String>, query: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
            value_type,
            boost: 1.0,
            filter: false,
            analyzer: None,
            operator: None,
            fuzziness: None,
            max_expansions: None,
        }
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

    /// Set the analyzer
    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Set the operator to AND (all terms must match)
    pub fn with_and_operator(mut self) -> Self {
        self.operator = Some(MatchOperator::And);
        self
    }

    /// Set the operator to OR (at least one term must match)
    pub fn with_or_operator(mut self) -> Self {
        self.operator = Some(MatchOperator::Or);
        self
    }

    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = Some(fuzziness);
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        body.insert("query".to_string(), json!(self.query));
        body.insert("boost".to_string(), json!(self.boost));
        if let Some(analyzer) = &self.analyzer {
            body.insert("analyzer".to_string(), json!(analyzer));
        }
        if let Some(operator) = self.operator {
            body.insert("operator".to_string(), json!(operator.as_str()));
        }
        if let Some(fuzziness) = &self.fuzziness {
            body.insert("fuzziness".to_string(), fuzziness.to_json());
        }
        if let Some(max_expansions) = self.max_expansions {
            body.insert("max_expansions".to_string(), json!(max_expansions));
        }
        json!({ "match": { self.field.clone(): body } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn text() -> ValueType {
        ValueType::new(FieldType::Text)
    }

    #[test]
    fn test_match_query_creation() {
        let query = MatchQuery::new("title", "rust programming", text());
        assert_eq!(query.field, "title");
        assert_eq!(query.query, "rust programming");
        assert_eq!(query.operator, None);
        assert_eq!(query.boost, 1.0);
    }

    #[test]
    fn test_match_query_builder() {
        let query = MatchQuery::new("title", "rust", text())
            .with_and_operator()
            .with_boost(2.0)
            .with_analyzer("english");

        assert_eq!(query.operator, Some(MatchOperator::And));
        assert_eq!(query.boost, 2.0);
        assert_eq!(query.analyzer.as_deref(), Some("english"));
    }

    #[test]
    fn test_render_minimal() {
        let query = MatchQuery::new("title", "rust", text());
        assert_eq!(
            query.render(),
            json!({"match": {"title": {"query": "rust", "boost": 1.0}}})
        );
    }

    #[test]
    fn test_render_modifiers() {
        let query = MatchQuery::new("title", "rust", text())
            .with_or_operator()
            .with_fuzziness(Fuzziness::Distance(1))
            .with_max_expansions(10);
        let rendered = query.render();
        assert_eq!(rendered["match"]["title"]["operator"], json!("or"));
        assert_eq!(rendered["match"]["title"]["fuzziness"], json!(1));
        assert_eq!(rendered["match"]["title"]["max_expansions"], json!(10));
    }
}
