//! Wildcard query - matches terms using wildcards
//!
//! Supports:
//! - `*` - matches any sequence of characters
//! - `?` - matches any single character

use crate::error::BoolqError;
use crate::query::nodes::pattern::TermMatcher;
use crate::query::types::ValueType;
use crate::Result;
use regex::Regex;
use serde_json::{json, Map, Value as Json};

/// Query that matches terms using wildcard patterns
#[derive(Clone, Debug, PartialEq)]
pub struct WildcardQuery {
    /// Field to search in
    pub field: String,
    /// Wildcard pattern
    pub pattern: String,
    pub value_type: ValueType,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    pub rewrite: Option<String>,
}

impl WildcardQuery {
    /// Create a new wildcard query
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

    /// Convert the wildcard pattern to an anchored regex
    pub fn to_regex(&self) -> Result<Regex> {
        let mut regex_pattern = String::with_capacity(self.pattern.len() + 2);
        regex_pattern.push('^');
        let mut literal = String::new();
        for ch in self.pattern.chars() {
            match ch {
                '*' | '?' => {
                    regex_pattern.push_str(&regex::escape(&literal));
                    literal.clear();
                    regex_pattern.push_str(if ch == '*' { ".*" } else { "." });
                }
                _ => literal.push(ch),
            }
        }
        regex_pattern.push_str(&regex::escape(&literal));
        regex_pattern.push('$');

        Regex::new(&regex_pattern).map_err(|e| {
            BoolqError::InvalidPattern(format!("wildcard '{}': {}", self.pattern, e))
        })
    }

    /// Extract the literal prefix from the pattern
    ///
    /// Returns the longest prefix before the first wildcard character.
    pub fn extract_prefix(&self) -> Option<&str> {
        let end = self.pattern.find(['*', '?']).unwrap_or(self.pattern.len());
        if end == 0 {
            None
        } else {
            Some(&self.pattern[..end])
        }
    }

    /// Check if the pattern has any wildcards
    pub fn has_wildcards(&self) -> bool {
        self.pattern.contains(['*', '?'])
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        body.insert("value".to_string(), json!(self.pattern));
        body.insert("boost".to_string(), json!(self.boost));
        if let Some(rewrite) = &self.rewrite {
            body.insert("rewrite".to_string(), json!(rewrite));
        }
        json!({ "wildcard": { self.field.clone(): body } })
    }
}

impl TermMatcher for WildcardQuery {
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
        if !self.has_wildcards() {
            return Ok(term == self.pattern);
        }
        Ok(self.to_regex()?.is_match(term))
    }

    fn matches_each(&self, terms: &[&str]) -> Result<Vec<bool>> {
        if !self.has_wildcards() {
            return Ok(terms.iter().map(|term| *term == self.pattern).collect());
        }
        let regex = self.to_regex()?;
        Ok(terms.iter().map(|term| regex.is_match(term)).collect())
    }
}
