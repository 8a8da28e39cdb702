//! Condition compiler
//!
//! Turns typed conditions emitted by a query-language front end into query
//! nodes, and folds boolean expressions over them with the node algebra.
//!
//! # Example
//!
//! ```rust
//! use boolq::query::compiler::{Comparison, Condition, Expr, QueryCompiler};
//! use boolq::schema::{FieldMapping, IndexMapping};
//!
//! let mapping = IndexMapping::new().field("year", FieldMapping::long());
//! let compiler = QueryCompiler::new(mapping);
//!
//! let expr = Expr::and(vec![
//!     Condition::new("year", Comparison::Gte, ["2020"]).into(),
//!     Condition::new("year", Comparison::Lt, ["2024"]).into(),
//! ]);
//! let document = compiler.compile_to_document(&expr).unwrap();
//! assert_eq!(document["range"]["year"]["gte"], 2020);
//! ```

use crate::config::CompilerConfig;
use crate::error::BoolqError;
use crate::query::ast::QueryNode;
use crate::query::merge::{fold_nodes, MergeOp};
use crate::query::nodes::{
    ExistsQuery, FuzzyQuery, IdsQuery, MatchAllQuery, MatchQuery, PhraseQuery, PrefixQuery,
    QueryStringQuery, RangeQuery, RegexpQuery, TermsQuery, WildcardQuery,
};
use crate::query::render::Document;
use crate::query::types::{Fuzziness, LowerCmp, UpperCmp, ValueType};
use crate::query::value::Value;
use crate::schema::{FieldSchema, FieldType};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw value standing for an unbounded range side, or for "any value"
pub const WILDCARD_VALUE: &str = "*";

/// Comparison requested by a condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Two-sided range; takes a lower and an upper value
    Between {
        left_inclusive: bool,
        right_inclusive: bool,
    },
    Phrase,
    PhrasePrefix,
    Prefix,
    Wildcard,
    Regexp,
    Fuzzy,
    Exists,
    Ids,
    QueryString,
    MatchAll,
}

/// Optional per-condition modifiers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub boost: Option<f64>,
    pub analyzer: Option<String>,
    pub slop: Option<u32>,
    pub rewrite: Option<String>,
    pub max_expansions: Option<usize>,
    pub fuzziness: Option<Fuzziness>,
    pub prefix_length: Option<usize>,
}

/// A single typed condition from the front end
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub comparison: Comparison,
    /// Raw values, coerced under the field's type at compile time
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl Condition {
    pub fn new<I, V>(field: impl Into<String>, comparison: Comparison, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            field: field.into(),
            comparison,
            values: values.into_iter().map(Into::into).collect(),
            modifiers: Modifiers::default(),
        }
    }

    /// Equality condition on one value
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Comparison::Eq, [value.into()])
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.modifiers.boost = Some(boost);
        self
    }
}

/// Boolean expression over conditions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Condition(Condition),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn and(children: Vec<Expr>) -> Self {
        Expr::And(children)
    }

    pub fn or(children: Vec<Expr>) -> Self {
        Expr::Or(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Expr) -> Self {
        Expr::Not(Box::new(child))
    }
}

impl From<Condition> for Expr {
    fn from(condition: Condition) -> Self {
        Expr::Condition(condition)
    }
}

/// Compiles expressions into minimal query trees
pub struct QueryCompiler<S> {
    schema: S,
    config: CompilerConfig,
}

impl<S: FieldSchema> QueryCompiler<S> {
    /// Create a compiler with the default configuration
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            config: CompilerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Compile an expression bottom-up
    ///
    /// `And` children are folded with intersect, `Or` children with union,
    /// and `Not` inverts its child. The first merge conflict aborts the
    /// whole compile.
    pub fn compile(&self, expr: &Expr) -> Result<QueryNode> {
        match expr {
            Expr::Condition(condition) => self.compile_condition(condition),
            Expr::And(children) => self.fold(children, MergeOp::Intersect),
            Expr::Or(children) => self.fold(children, MergeOp::Union),
            Expr::Not(child) => self.compile(child)?.inverse(),
        }
    }

    /// Compile and render an expression
    pub fn compile_to_document(&self, expr: &Expr) -> Result<Document> {
        Ok(self.compile(expr)?.render())
    }

    fn fold(&self, children: &[Expr], op: MergeOp) -> Result<QueryNode> {
        let nodes = children
            .iter()
            .map(|child| self.compile(child))
            .collect::<Result<Vec<_>>>()?;
        fold_nodes(nodes, op)
    }

    /// Compile a single condition into a leaf node
    pub fn compile_condition(&self, condition: &Condition) -> Result<QueryNode> {
        let boost = self.boost(condition)?;
        let node = match condition.comparison {
            Comparison::MatchAll => MatchAllQuery::new().with_boost(boost).into(),
            Comparison::Ids => {
                if condition.values.is_empty() {
                    return Err(invalid_request(condition, "ids require at least one value"));
                }
                IdsQuery::new(condition.values.clone())
                    .with_boost(boost)
                    .into()
            }
            Comparison::QueryString => {
                let field = if condition.field.is_empty() {
                    self.config.default_field.clone()
                } else {
                    condition.field.clone()
                };
                QueryStringQuery::new(single(condition)?)
                    .with_default_field(field)
                    .with_boost(boost)
                    .into()
            }
            _ => self.compile_field_condition(condition, boost)?,
        };

        debug!(
            field = %condition.field,
            comparison = ?condition.comparison,
            kind = node.kind(),
            "compiled condition"
        );
        Ok(node)
    }

    fn compile_field_condition(&self, condition: &Condition, boost: f64) -> Result<QueryNode> {
        let dynamic = self.config.dynamic.unwrap_or_else(|| self.schema.dynamic());
        let value_type = self.schema.resolve(&condition.field, dynamic)?;
        let field = condition.field.as_str();
        let filter = self.config.filter_context;
        let modifiers = &condition.modifiers;

        let node = match condition.comparison {
            Comparison::Exists => ExistsQuery::new(field).with_filter(filter).into(),
            Comparison::Eq => self.compile_eq(condition, value_type, boost)?,
            Comparison::Gt | Comparison::Gte | Comparison::Lt | Comparison::Lte => {
                let raw = single(condition)?;
                let range = self.range(condition, value_type, boost)?;
                let range = match condition.comparison {
                    Comparison::Gt => self.lower_bound(range, field, raw, LowerCmp::Gt)?,
                    Comparison::Gte => self.lower_bound(range, field, raw, LowerCmp::Gte)?,
                    Comparison::Lt => self.upper_bound(range, field, raw, UpperCmp::Lt)?,
                    _ => self.upper_bound(range, field, raw, UpperCmp::Lte)?,
                };
                range.into()
            }
            Comparison::Between {
                left_inclusive,
                right_inclusive,
            } => {
                let [low, high] = condition.values.as_slice() else {
                    return Err(invalid_request(condition, "range needs a lower and an upper value"));
                };
                let lower_cmp = if left_inclusive { LowerCmp::Gte } else { LowerCmp::Gt };
                let upper_cmp = if right_inclusive { UpperCmp::Lte } else { UpperCmp::Lt };
                let range = self.range(condition, value_type, boost)?;
                let range = self.lower_bound(range, field, low, lower_cmp)?;
                let range = self.upper_bound(range, field, high, upper_cmp)?;
                range.validate()?;
                range.into()
            }
            Comparison::Phrase | Comparison::PhrasePrefix => {
                let mut phrase = PhraseQuery::new(field, single(condition)?, value_type)
                    .with_boost(boost)
                    .with_filter(filter);
                phrase.analyzer = modifiers.analyzer.clone();
                phrase.slop = modifiers.slop;
                if condition.comparison == Comparison::PhrasePrefix {
                    phrase.max_expansions = modifiers.max_expansions;
                    QueryNode::MatchPhrasePrefix(phrase)
                } else {
                    QueryNode::MatchPhrase(phrase)
                }
            }
            Comparison::Prefix => {
                let mut prefix = PrefixQuery::new(field, single(condition)?, value_type)
                    .with_boost(boost)
                    .with_filter(filter);
                prefix.rewrite = self.rewrite(modifiers);
                prefix.into()
            }
            Comparison::Wildcard => {
                let mut wildcard = WildcardQuery::new(field, single(condition)?, value_type)
                    .with_boost(boost)
                    .with_filter(filter);
                wildcard.rewrite = self.rewrite(modifiers);
                wildcard.to_regex()?;
                wildcard.into()
            }
            Comparison::Regexp => {
                let mut regexp = RegexpQuery::new(field, single(condition)?, value_type)
                    .with_boost(boost)
                    .with_filter(filter);
                regexp.rewrite = self.rewrite(modifiers);
                regexp.to_regex()?;
                regexp.into()
            }
            Comparison::Fuzzy => {
                let mut fuzzy = FuzzyQuery::new(field, single(condition)?, value_type)
                    .with_boost(boost)
                    .with_filter(filter)
                    .with_fuzziness(modifiers.fuzziness.unwrap_or(self.config.default_fuzziness))
                    .with_max_expansions(
                        modifiers
                            .max_expansions
                            .unwrap_or(self.config.default_max_expansions),
                    )
                    .with_prefix_length(modifiers.prefix_length.unwrap_or(0));
                fuzzy.rewrite = self.rewrite(modifiers);
                fuzzy.into()
            }
            Comparison::MatchAll | Comparison::Ids | Comparison::QueryString => {
                return Err(invalid_request(condition, "comparison does not target a field"));
            }
        };
        Ok(node)
    }

    /// Equality: presence for `*`, full-text match on analyzed fields,
    /// exact terms elsewhere
    fn compile_eq(&self, condition: &Condition, value_type: ValueType, boost: f64) -> Result<QueryNode> {
        let field = condition.field.as_str();
        let filter = self.config.filter_context;
        let modifiers = &condition.modifiers;

        if condition.values.is_empty() {
            return Err(invalid_request(condition, "equality needs a value"));
        }
        if condition.values.iter().any(|v| v == WILDCARD_VALUE) {
            return Ok(ExistsQuery::new(field).with_filter(filter).into());
        }

        if value_type.field_type.is_analyzed() {
            let matches = condition.values.iter().map(|text| {
                let mut query = MatchQuery::new(field, text.as_str(), value_type)
                    .with_boost(boost)
                    .with_filter(filter);
                query.analyzer = modifiers.analyzer.clone();
                query.fuzziness = modifiers.fuzziness;
                query.max_expansions = modifiers.max_expansions;
                QueryNode::Match(query)
            });
            return fold_nodes(matches, MergeOp::Union);
        }

        let values = condition
            .values
            .iter()
            .map(|raw| self.schema.coerce(field, raw))
            .collect::<Result<Vec<Value>>>()?;
        Ok(TermsQuery::new(field, values, value_type)
            .with_boost(boost)
            .with_filter(filter)
            .into_node())
    }

    fn range(&self, condition: &Condition, value_type: ValueType, boost: f64) -> Result<RangeQuery> {
        if !value_type.field_type.supports_range() {
            return Err(BoolqError::InvalidRequest(format!(
                "range on {} field '{}'",
                value_type.field_type.name(),
                condition.field
            )));
        }
        let mut range = RangeQuery::new(condition.field.as_str(), value_type)
            .with_boost(boost)
            .with_filter(self.config.filter_context);
        if value_type.field_type == FieldType::Date {
            range.time_zone = self.config.date_time_zone.clone();
        }
        Ok(range)
    }

    fn lower_bound(&self, range: RangeQuery, field: &str, raw: &str, cmp: LowerCmp) -> Result<RangeQuery> {
        if raw == WILDCARD_VALUE {
            return Ok(range);
        }
        Ok(range.with_lower(self.schema.coerce(field, raw)?, cmp))
    }

    fn upper_bound(&self, range: RangeQuery, field: &str, raw: &str, cmp: UpperCmp) -> Result<RangeQuery> {
        if raw == WILDCARD_VALUE {
            return Ok(range);
        }
        Ok(range.with_upper(self.schema.coerce(field, raw)?, cmp))
    }

    fn rewrite(&self, modifiers: &Modifiers) -> Option<String> {
        modifiers
            .rewrite
            .clone()
            .or_else(|| self.config.default_rewrite.clone())
    }

    fn boost(&self, condition: &Condition) -> Result<f64> {
        let boost = condition.modifiers.boost.unwrap_or(1.0);
        if !boost.is_finite() || boost < 0.0 {
            return Err(BoolqError::InvalidValue {
                field: condition.field.clone(),
                value: boost.to_string(),
                reason: "boost must be a non-negative number".to_string(),
            });
        }
        Ok(boost)
    }
}

fn single(condition: &Condition) -> Result<&str> {
    match condition.values.as_slice() {
        [value] => Ok(value.as_str()),
        _ => Err(invalid_request(condition, "expected exactly one value")),
    }
}

fn invalid_request(condition: &Condition, reason: &str) -> BoolqError {
    BoolqError::InvalidRequest(format!(
        "{:?} on '{}': {}",
        condition.comparison, condition.field, reason
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DynamicMapping, FieldMapping, IndexMapping};
    use serde_json::json;

    fn compiler() -> QueryCompiler<IndexMapping> {
        let mapping = IndexMapping::new()
            .field("title", FieldMapping::text())
            .field("status", FieldMapping::keyword())
            .field("tags", FieldMapping::keyword().with_array(true))
            .field("price", FieldMapping::double())
            .field("x", FieldMapping::new(FieldType::Integer))
            .field("created_at", FieldMapping::date());
        QueryCompiler::new(mapping)
    }

    fn cond(field: &str, comparison: Comparison, values: &[&str]) -> Expr {
        Condition::new(field, comparison, values.iter().copied()).into()
    }

    #[test]
    fn test_eq_on_keyword_is_term() {
        let node = compiler().compile(&cond("status", Comparison::Eq, &["active"])).unwrap();
        assert_eq!(node.kind(), "term");
    }

    #[test]
    fn test_eq_many_values_is_terms() {
        let node = compiler()
            .compile(&cond("status", Comparison::Eq, &["b", "a", "b"]))
            .unwrap();
        assert_eq!(
            node.render(),
            json!({"terms": {"status": ["a", "b"], "boost": 1.0}})
        );
    }

    #[test]
    fn test_eq_on_text_is_match() {
        let node = compiler().compile(&cond("title", Comparison::Eq, &["rust"])).unwrap();
        assert_eq!(node.kind(), "match");
    }

    #[test]
    fn test_eq_star_is_exists() {
        let node = compiler().compile(&cond("status", Comparison::Eq, &["*"])).unwrap();
        assert_eq!(node.render(), json!({"exists": {"field": "status"}}));
    }

    #[test]
    fn test_between_with_open_side() {
        let expr = cond(
            "price",
            Comparison::Between {
                left_inclusive: true,
                right_inclusive: false,
            },
            &["*", "100"],
        );
        let document = compiler().compile_to_document(&expr).unwrap();
        assert_eq!(
            document,
            json!({"range": {"price": {"lt": 100.0, "boost": 1.0}}})
        );
    }

    #[test]
    fn test_between_inverted_bounds_fail() {
        let inclusive = Comparison::Between {
            left_inclusive: true,
            right_inclusive: true,
        };
        let err = compiler()
            .compile(&cond("x", inclusive, &["10", "5"]))
            .unwrap_err();
        assert_eq!(
            err,
            BoolqError::EmptyIntersection {
                field: "x".to_string()
            }
        );

        // same outcome as spelling the bounds as a conjunction
        let conjunction = Expr::and(vec![
            cond("x", Comparison::Gte, &["10"]),
            cond("x", Comparison::Lte, &["5"]),
        ]);
        assert_eq!(compiler().compile(&conjunction).unwrap_err(), err);

        let negated = Expr::not(cond("x", inclusive, &["10", "5"]));
        assert!(compiler().compile(&negated).is_err());
    }

    #[test]
    fn test_between_equal_bounds() {
        let half_open = Comparison::Between {
            left_inclusive: true,
            right_inclusive: false,
        };
        let err = compiler()
            .compile(&cond("x", half_open, &["7", "7"]))
            .unwrap_err();
        assert!(matches!(err, BoolqError::EmptyIntersection { .. }));

        let closed = Comparison::Between {
            left_inclusive: true,
            right_inclusive: true,
        };
        let document = compiler()
            .compile_to_document(&cond("x", closed, &["7", "7"]))
            .unwrap();
        assert_eq!(
            document,
            json!({"range": {"x": {"gte": 7, "lte": 7, "boost": 1.0}}})
        );
    }

    #[test]
    fn test_and_coalesces_ranges() {
        let expr = Expr::and(vec![
            cond("x", Comparison::Gt, &["78"]),
            cond("x", Comparison::Lt, &["100"]),
        ]);
        let document = compiler().compile_to_document(&expr).unwrap();
        assert_eq!(
            document,
            json!({"range": {"x": {"gt": 78, "lt": 100, "boost": 1.0}}})
        );
    }

    #[test]
    fn test_not_inverts() {
        let expr = Expr::not(cond("x", Comparison::Gte, &["5"]));
        let document = compiler().compile_to_document(&expr).unwrap();
        assert_eq!(document, json!({"range": {"x": {"lt": 5, "boost": 1.0}}}));
    }

    #[test]
    fn test_empty_and_is_nil_operand() {
        let err = compiler().compile(&Expr::and(Vec::new())).unwrap_err();
        assert_eq!(err, BoolqError::NilOperand("intersect"));
        let err = compiler().compile(&Expr::or(Vec::new())).unwrap_err();
        assert_eq!(err, BoolqError::NilOperand("union"));
    }

    #[test]
    fn test_invalid_value() {
        let err = compiler()
            .compile(&cond("x", Comparison::Gt, &["abc"]))
            .unwrap_err();
        assert!(matches!(err, BoolqError::InvalidValue { .. }));
    }

    #[test]
    fn test_range_on_text_rejected() {
        let err = compiler()
            .compile(&cond("title", Comparison::Gt, &["a"]))
            .unwrap_err();
        assert!(matches!(err, BoolqError::InvalidRequest(_)));
    }

    #[test]
    fn test_strict_mapping_rejects_unknown() {
        let compiler = compiler().with_config(CompilerConfig::new().with_dynamic(DynamicMapping::Strict));
        let err = compiler
            .compile(&cond("nope", Comparison::Eq, &["1"]))
            .unwrap_err();
        assert_eq!(err, BoolqError::UnknownField("nope".to_string()));
    }

    #[test]
    fn test_invalid_regexp_rejected_early() {
        let err = compiler()
            .compile(&cond("status", Comparison::Regexp, &["a("]))
            .unwrap_err();
        assert!(matches!(err, BoolqError::InvalidPattern(_)));
    }

    #[test]
    fn test_fuzzy_defaults_from_config() {
        let config = CompilerConfig::new()
            .with_default_fuzziness(Fuzziness::Distance(1))
            .with_default_rewrite("constant_score");
        let node = compiler()
            .with_config(config)
            .compile(&cond("status", Comparison::Fuzzy, &["actve"]))
            .unwrap();
        match node {
            QueryNode::Fuzzy(q) => {
                assert_eq!(q.fuzziness, Fuzziness::Distance(1));
                assert_eq!(q.rewrite.as_deref(), Some("constant_score"));
            }
            other => panic!("expected fuzzy, got {:?}", other),
        }
    }

    #[test]
    fn test_query_string_default_field() {
        let node = compiler()
            .compile(&cond("", Comparison::QueryString, &["rust OR go"]))
            .unwrap();
        assert_eq!(
            node.render()["query_string"]["default_field"],
            json!("content")
        );
    }

    #[test]
    fn test_filter_context() {
        let node = compiler()
            .with_config(CompilerConfig::new().with_filter_context(true))
            .compile(&Expr::and(vec![
                cond("status", Comparison::Eq, &["a"]),
                cond("price", Comparison::Gt, &["1"]),
            ]))
            .unwrap();
        let document = node.render();
        assert_eq!(document["bool"]["filter"].as_array().map(Vec::len), Some(2));
        assert!(document["bool"].get("must").is_none());
    }

    #[test]
    fn test_date_range_time_zone() {
        let config = CompilerConfig::new().with_date_time_zone("+02:00");
        let document = compiler()
            .with_config(config)
            .compile_to_document(&cond("created_at", Comparison::Gte, &["2024-01-01"]))
            .unwrap();
        assert_eq!(
            document,
            json!({"range": {"created_at": {
                "gte": 1704067200000i64,
                "boost": 1.0,
                "format": "epoch_millis",
                "time_zone": "+02:00",
            }}})
        );
    }

    #[test]
    fn test_expr_deserialize() {
        let expr: Expr = serde_json::from_value(json!({
            "or": [
                {"condition": {"field": "status", "comparison": "eq", "values": ["a"]}},
                {"not": {"condition": {"field": "x", "comparison": "exists"}}}
            ]
        }))
        .unwrap();
        assert!(matches!(expr, Expr::Or(ref children) if children.len() == 2));
    }
}
