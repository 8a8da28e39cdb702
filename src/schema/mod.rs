//! Schema and field type system
//!
//! This module defines what the compiler knows about fields:
//! - Field types and their comparison families
//! - Index mappings (field type and array-ness per dot path)
//! - Dynamic mapping behavior for unmapped fields

mod field_type;
mod mapping;

pub use field_type::{FieldType, TypeFamily};
pub use mapping::{DynamicMapping, FieldMapping, FieldSchema, IndexMapping};
