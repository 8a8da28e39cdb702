pub mod config;
pub mod error;
pub mod query;
pub mod schema;

pub use config::CompilerConfig;
pub use error::{BoolqError, Result};
pub use query::{Comparison, Condition, Expr, MergeOp, QueryCompiler, QueryNode, Value};
pub use schema::{DynamicMapping, FieldMapping, FieldSchema, FieldType, IndexMapping};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
