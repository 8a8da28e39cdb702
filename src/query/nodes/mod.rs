//! Concrete query node implementations
//!
//! One struct per condition kind. Each carries its pairwise merge rules
//! with the kinds it interacts with and renders its own document.

mod all_docs;
mod bool_query;
mod exists_query;
mod fuzzy_query;
mod ids_query;
mod match_query;
pub mod pattern;
mod phrase_query;
mod prefix_query;
mod query_string_query;
mod range_query;
mod regexp_query;
mod term_query;
mod terms_query;
mod wildcard_query;

pub use all_docs::MatchAllQuery;
pub use bool_query::{BoolQuery, Bucket, Occur};
pub use exists_query::ExistsQuery;
pub use fuzzy_query::{damerau_levenshtein_distance, levenshtein_distance, FuzzyQuery};
pub use ids_query::IdsQuery;
pub use match_query::MatchQuery;
pub use phrase_query::PhraseQuery;
pub use prefix_query::PrefixQuery;
pub use query_string_query::QueryStringQuery;
pub use range_query::RangeQuery;
pub use regexp_query::RegexpQuery;
pub use term_query::TermQuery;
pub use terms_query::TermsQuery;
pub use wildcard_query::WildcardQuery;
