//! Index mapping definitions
//!
//! A mapping tells the compiler the type and array-ness of each field a
//! condition may target. Nested object fields are addressed with dot paths.

use super::field_type::FieldType;
use crate::error::BoolqError;
use crate::query::types::ValueType;
use crate::query::value::Value;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Behavior for fields missing from the mapping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicMapping {
    /// Unmapped fields are treated as single-valued keywords (default)
    #[default]
    True,
    /// Conditions on unmapped fields are rejected
    Strict,
}

/// Type information a compiler needs about the fields of an index
pub trait FieldSchema {
    /// Get the declared type of a field, if it is mapped
    fn field_type(&self, field: &str) -> Option<FieldType>;

    /// Check whether a field may hold several values per document
    fn is_array(&self, field: &str) -> bool;

    /// Behavior for unmapped fields
    fn dynamic(&self) -> DynamicMapping {
        DynamicMapping::True
    }

    /// Resolve the value type of a field under the given dynamic behavior
    fn resolve(&self, field: &str, dynamic: DynamicMapping) -> Result<ValueType> {
        match self.field_type(field) {
            Some(field_type) => Ok(ValueType {
                field_type,
                is_array: self.is_array(field),
            }),
            None => match dynamic {
                DynamicMapping::True => Ok(ValueType::new(FieldType::Keyword)),
                DynamicMapping::Strict => Err(BoolqError::UnknownField(field.to_string())),
            },
        }
    }

    /// Parse a raw value for a field
    fn coerce(&self, field: &str, raw: &str) -> Result<Value> {
        let field_type = self.field_type(field).unwrap_or(FieldType::Keyword);
        Value::parse(raw, field_type).map_err(|reason| BoolqError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason,
        })
    }
}

/// Field mapping configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether documents may hold several values for this field
    #[serde(default)]
    pub array: bool,

    /// Nested field mappings (for object fields)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, FieldMapping>>,
}

impl FieldMapping {
    /// Create a new field mapping with the given type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Default::default()
        }
    }

    /// Create a text field mapping
    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    /// Create a keyword field mapping
    pub fn keyword() -> Self {
        Self::new(FieldType::Keyword)
    }

    /// Create a long field mapping
    pub fn long() -> Self {
        Self::new(FieldType::Long)
    }

    /// Create a double field mapping
    pub fn double() -> Self {
        Self::new(FieldType::Double)
    }

    /// Create a date field mapping
    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    /// Mark the field as multi-valued
    pub fn with_array(mut self, array: bool) -> Self {
        self.array = array;
        self
    }

    /// Set nested field properties (for object fields)
    pub fn with_properties(mut self, properties: HashMap<String, FieldMapping>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn value_type(&self) -> ValueType {
        ValueType {
            field_type: self.field_type,
            is_array: self.array,
        }
    }
}

/// Index mapping (schema) definition
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMapping {
    /// Field mappings
    #[serde(default)]
    pub properties: HashMap<String, FieldMapping>,

    /// Dynamic mapping behavior
    #[serde(default)]
    pub dynamic: DynamicMapping,
}

impl IndexMapping {
    /// Create a new empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping that rejects unmapped fields
    pub fn strict() -> Self {
        Self {
            dynamic: DynamicMapping::Strict,
            ..Default::default()
        }
    }

    /// Add a field mapping
    pub fn field(mut self, name: impl Into<String>, mapping: FieldMapping) -> Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    /// Set dynamic mapping behavior
    pub fn with_dynamic(mut self, dynamic: DynamicMapping) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Get a field mapping by path (supports dot notation)
    pub fn get_field(&self, path: &str) -> Option<&FieldMapping> {
        let mut parts = path.split('.');
        let mut field = self.properties.get(parts.next()?)?;
        for part in parts {
            field = field.properties.as_ref()?.get(part)?;
        }
        Some(field)
    }

    /// Check if a field exists
    pub fn has_field(&self, path: &str) -> bool {
        self.get_field(path).is_some()
    }

    /// Get all field names (flattened with dot notation), sorted
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_field_names(&self.properties, "", &mut names);
        names.sort();
        names
    }
}

fn collect_field_names(props: &HashMap<String, FieldMapping>, prefix: &str, names: &mut Vec<String>) {
    for (name, mapping) in props {
        let full_name = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        if let Some(nested) = &mapping.properties {
            collect_field_names(nested, &full_name, names);
        }
        names.push(full_name);
    }
}

impl FieldSchema for IndexMapping {
    fn field_type(&self, field: &str) -> Option<FieldType> {
        self.get_field(field).map(|m| m.field_type)
    }

    fn is_array(&self, field: &str) -> bool {
        self.get_field(field).map(|m| m.array).unwrap_or(false)
    }

    fn dynamic(&self) -> DynamicMapping {
        self.dynamic
    }
}
