//! Regexp query - matches terms against a regular expression
//!
//! The expression must match the whole term, as if anchored at both ends.

use crate::error::BoolqError;
use crate::query::nodes::pattern::TermMatcher;
use crate::query::types::ValueType;
use crate::Result;
use regex::Regex;
use serde_json::{json, Map, Value as Json};

/// Query that matches terms against a regular expression
#[derive(Clone, Debug, PartialEq)]
pub struct RegexpQuery {
    /// Field to search in
    pub field: String,
    pub pattern: String,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    pub rewrite: Option<String>,
}

impl RegexpQuery {
    /// Create a new regexp query
    pub fn new(field: impl Into<String>, pattern: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            pattern: pattern.into(),
            value_type,
            boost: 1.0,
            filter: false,
            rewrite: None,
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

    pub fn with_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.rewrite = Some(rewrite.into());
        self
    }

    /// Compile the expression, anchored to whole terms
    pub fn to_regex(&self) -> Result<Regex> {
        Regex::new(&format!("^(?:{})$", self.pattern)).map_err(|e| {
            BoolqError::InvalidPattern(format!("regexp '{}': {}", self.pattern, e))
        })
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        body.insert("value".to_string(), json!(self.pattern));
        body.insert("boost".to_string(), json!(self.boost));
        if let Some(rewrite) = &self.rewrite {
            body.insert("rewrite".to_string(), json!(rewrite));
        }
        json!({ "regexp": { self.field.clone(): body } })
    }
}

impl TermMatcher for RegexpQuery {
    fn field(&self) -> &str {
        &self.field
    }

    fn boost(&self) -> f64 {
        self.boost
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn matches(&self, term: &str) -> Result<bool> {
        Ok(self.to_regex()?.is_match(term))
    }

    fn matches_each(&self, terms: &[&str]) -> Result<Vec<bool>> {
        let regex = self.to_regex()?;
        Ok(terms.iter().map(|term| regex.is_match(term)).collect())
    }
}
