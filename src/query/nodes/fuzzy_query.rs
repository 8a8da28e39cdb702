//! Fuzzy query - matches terms within an edit distance
//!
//! # Example
//!
//! ```rust
//! use boolq::query::nodes::FuzzyQuery;
//! use boolq::query::types::{Fuzziness, ValueType};
//! use boolq::schema::FieldType;
//!
//! // Find terms within edit distance 2 of "roust" (matches "rust")
//! let query = FuzzyQuery::new("tags", "roust", ValueType::new(FieldType::Keyword))
//!     .with_fuzziness(Fuzziness::Distance(2));
//! ```

use crate::query::nodes::pattern::TermMatcher;
use crate::query::types::{Fuzziness, ValueType};
use crate::Result;
use serde_json::{json, Map, Value as Json};

/// Query that matches terms within an edit distance of the query term
///
/// The edit distance counts insertions, deletions and substitutions, plus
/// adjacent transpositions unless those are disabled.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyQuery {
    /// Field to search in
    pub field: String,
    /// Term to match approximately
    pub term: String,
    pub value_type: ValueType,
    pub fuzziness: Fuzziness,
    /// Number of initial characters that must match exactly
    pub prefix_length: usize,
    /// Maximum number of terms the engine expands to
    pub max_expansions: usize,
    /// Count a swap of two adjacent characters as one edit
    pub transpositions: bool,
    /// Boost factor for scoring
    pub boost: f64,
    pub filter: bool,
    pub rewrite: Option<String>,
}

impl FuzzyQuery {
    /// Create a new fuzzy query with `AUTO` fuzziness
    pub fn new(field: impl Into<String>, term: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            value_type,
            fuzziness: Fuzziness::default(),
            prefix_length: 0,
            max_expansions: 50,
            transpositions: true,
            boost: 1.0,
            filter: false,
            rewrite: None,
        }
    }

    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    /// Set the number of initial characters that must match exactly
    pub fn with_prefix_length(mut self, prefix_length: usize) -> Self {
        self.prefix_length = prefix_length;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_transpositions(mut self, transpositions: bool) -> Self {
        self.transpositions = transpositions;
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

    pub fn with_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.rewrite = Some(rewrite.into());
        self
    }

    /// Get the prefix that must match exactly
    pub fn required_prefix(&self) -> &str {
        match self.term.char_indices().nth(self.prefix_length) {
            Some((end, _)) => &self.term[..end],
            None => &self.term,
        }
    }

    /// Edit distance allowed for this query's term
    pub fn max_distance(&self) -> usize {
        self.fuzziness.distance_for(self.term.chars().count()) as usize
    }

    pub fn render(&self) -> Json {
        let mut body = Map::new();
        body.insert("value".to_string(), json!(self.term));
        body.insert("boost".to_string(), json!(self.boost));
        body.insert("fuzziness".to_string(), self.fuzziness.to_json());
        body.insert("prefix_length".to_string(), json!(self.prefix_length));
        body.insert("max_expansions".to_string(), json!(self.max_expansions));
        body.insert("transpositions".to_string(), json!(self.transpositions));
        if let Some(rewrite) = &self.rewrite {
            body.insert("rewrite".to_string(), json!(rewrite));
        }
        json!({ "fuzzy": { self.field.clone(): body } })
    }
}

impl TermMatcher for FuzzyQuery {
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
        if !term.starts_with(self.required_prefix()) {
            return Ok(false);
        }
        let distance = if self.transpositions {
            damerau_levenshtein_distance(&self.term, term)
        } else {
            levenshtein_distance(&self.term, term)
        };
        Ok(distance <= self.max_distance())
    }
}

/// Calculate Levenshtein distance between two strings
///
/// Uses dynamic programming with O(m*n) time and O(min(m,n)) space.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Calculate Damerau-Levenshtein distance (optimal string alignment)
///
/// Adjacent character swaps count as a single operation.
pub fn damerau_levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut d = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        d[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(d[i - 2][j - 2] + cost);
            }
            d[i][j] = best;
        }
    }

    d[a.len()][b.len()]
}
